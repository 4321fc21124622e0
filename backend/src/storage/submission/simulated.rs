//! Local stand-in for the booking backend. Accepts every booking after a
//! fixed delay, the way the booking page behaves before a real endpoint is
//! wired up.

use async_trait::async_trait;
use log::info;
use shared::{BookingDraft, SubmissionAck};
use std::time::Duration;
use uuid::Uuid;

use crate::storage::traits::{SubmissionError, SubmissionService};

#[derive(Debug, Clone)]
pub struct SimulatedSubmissionService {
    latency: Duration,
}

impl SimulatedSubmissionService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// No artificial delay
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl SubmissionService for SimulatedSubmissionService {
    async fn submit(&self, draft: &BookingDraft) -> Result<SubmissionAck, SubmissionError> {
        info!(
            "📨 Simulating submission for {:?} {:?} ({} tier)",
            draft.date, draft.time, draft.tier
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let id = Uuid::new_v4().simple().to_string();
        Ok(SubmissionAck {
            reference: format!("BK-{}", id[..8].to_uppercase()),
            message: Some(format!(
                "A confirmation email will be sent to {}",
                draft.email.trim()
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TierId;

    #[tokio::test]
    async fn test_simulated_submission_acknowledges() {
        let service = SimulatedSubmissionService::instant();
        let mut draft = BookingDraft::new(TierId::Premium);
        draft.email = "anna@example.com".to_string();

        let ack = service.submit(&draft).await.unwrap();
        assert!(ack.reference.starts_with("BK-"));
        assert_eq!(ack.reference.len(), 11);
        assert!(ack.message.unwrap().contains("anna@example.com"));
    }

    #[tokio::test]
    async fn test_simulated_submission_references_are_unique() {
        let service = SimulatedSubmissionService::instant();
        let draft = BookingDraft::default();

        let first = service.submit(&draft).await.unwrap();
        let second = service.submit(&draft).await.unwrap();
        assert_ne!(first.reference, second.reference);
    }

    #[tokio::test]
    async fn test_simulated_submission_waits_for_latency() {
        let service = SimulatedSubmissionService::new(Duration::from_millis(30));
        let started = tokio::time::Instant::now();

        service.submit(&BookingDraft::default()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
