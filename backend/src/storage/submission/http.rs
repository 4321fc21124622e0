//! Submits finished bookings to a remote endpoint as JSON.
//!
//! `POST <endpoint>` with `{"booking": <draft>}`. Any 2xx response carrying a
//! `SubmissionAck` body is a success; every other outcome is reported as a
//! `SubmissionError` so the wizard can stay on the review step.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use shared::{BookingDraft, SubmissionAck, SubmitBookingRequest};
use std::time::Duration;

use crate::storage::traits::{SubmissionError, SubmissionService};

#[derive(Debug, Clone)]
pub struct HttpSubmissionService {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSubmissionService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for booking submission")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> SubmissionError {
        if err.is_timeout() {
            SubmissionError::Timeout(self.timeout)
        } else {
            SubmissionError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl SubmissionService for HttpSubmissionService {
    async fn submit(&self, draft: &BookingDraft) -> Result<SubmissionAck, SubmissionError> {
        info!("📨 POST {} ({} tier)", self.endpoint, draft.tier);

        let body = SubmitBookingRequest {
            booking: draft.clone(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!("Submission rejected with {}: {}", status, message);
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<SubmissionAck>()
            .await
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use shared::TierId;

    fn complete_draft() -> BookingDraft {
        BookingDraft {
            date: NaiveDate::from_ymd_opt(2025, 6, 16),
            time: Some("10:30".to_string()),
            tier: TierId::Premium,
            first_name: "Anna".to_string(),
            last_name: "Meier".to_string(),
            email: "anna@example.com".to_string(),
            phone: "+41 76 123 45 67".to_string(),
            ..BookingDraft::default()
        }
    }

    #[tokio::test]
    async fn test_submit_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bookings")
                    .header("content-type", "application/json")
                    .body_contains("\"tier\":\"premium\"")
                    .body_contains("\"date\":\"2025-06-16\"");
                then.status(201)
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({ "reference": "BK-42" }));
            })
            .await;

        let service =
            HttpSubmissionService::new(server.url("/bookings"), Duration::from_secs(5)).unwrap();
        let ack = service.submit(&complete_draft()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(ack.reference, "BK-42");
        assert!(ack.message.is_none());
    }

    #[tokio::test]
    async fn test_submit_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bookings");
                then.status(409).body("slot already taken");
            })
            .await;

        let service =
            HttpSubmissionService::new(server.url("/bookings"), Duration::from_secs(5)).unwrap();
        let error = service.submit(&complete_draft()).await.unwrap_err();

        assert_eq!(
            error,
            SubmissionError::Rejected {
                status: 409,
                message: "slot already taken".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_submit_invalid_ack() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bookings");
                then.status(200).body("ok");
            })
            .await;

        let service =
            HttpSubmissionService::new(server.url("/bookings"), Duration::from_secs(5)).unwrap();
        let error = service.submit(&complete_draft()).await.unwrap_err();
        assert!(matches!(error, SubmissionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_submit_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bookings");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(serde_json::json!({ "reference": "BK-late" }));
            })
            .await;

        let timeout = Duration::from_millis(50);
        let service = HttpSubmissionService::new(server.url("/bookings"), timeout).unwrap();
        let error = service.submit(&complete_draft()).await.unwrap_err();
        assert_eq!(error, SubmissionError::Timeout(timeout));
    }

    #[tokio::test]
    async fn test_submit_unreachable_endpoint() {
        let service =
            HttpSubmissionService::new("http://127.0.0.1:1/bookings", Duration::from_secs(2))
                .unwrap();
        let error = service.submit(&complete_draft()).await.unwrap_err();
        assert!(matches!(error, SubmissionError::Transport(_)));
    }
}
