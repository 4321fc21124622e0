//! Booking sessions for the REST layer.
//!
//! Each session owns one [`BookingWizard`] behind its own async mutex.
//! Confirming releases that mutex while the submission is in flight, so a
//! second confirm on the same session finds `submitting` set and becomes a
//! no-op instead of waiting for the first to finish. The submission runs on
//! its own task and always records its outcome, even when the request that
//! started it goes away.
//!
//! Sessions idle for longer than the configured TTL are evicted whenever a
//! new session is created, or on demand through
//! [`BookingSessionService::evict_idle`].

use chrono::NaiveDate;
use log::{error, info};
use shared::{BookingSessionView, BookingSummary, ContactDetailsUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::domain::calendar::CalendarService;
use crate::domain::errors::BookingError;
use crate::domain::wizard::{BookingWizard, SubmitOutcome};
use crate::storage::{BookingCatalog, SubmissionError, SubmissionService};

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Session {
    wizard: BookingWizard,
    last_touched: Instant,
}

type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct BookingSessionService {
    catalog: Arc<dyn BookingCatalog>,
    calendar: CalendarService,
    submission: Arc<dyn SubmissionService>,
    idle_ttl: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl BookingSessionService {
    pub fn new(
        catalog: Arc<dyn BookingCatalog>,
        calendar: CalendarService,
        submission: Arc<dyn SubmissionService>,
    ) -> Self {
        Self {
            catalog,
            calendar,
            submission,
            idle_ttl: DEFAULT_IDLE_TTL,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replace the idle TTL
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    pub async fn create_session(&self) -> Result<BookingSessionView, BookingError> {
        self.evict_idle().await;

        let id = Uuid::new_v4();
        let wizard = BookingWizard::new(self.catalog.clone(), self.calendar.clone());
        let view = session_view(id, &wizard)?;

        let session = Session {
            wizard,
            last_touched: Instant::now(),
        };
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!("🆕 Created booking session {}", id);
        Ok(view)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<BookingSessionView, BookingError> {
        let session = self.lock(id).await?;
        session_view(id, &session.wizard)
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<(), BookingError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("🗑️ Deleted booking session {}", id);
                Ok(())
            }
            None => Err(BookingError::SessionNotFound(id)),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions nobody has touched within the idle TTL. Sessions that
    /// are locked or mid-submission are kept. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let idle_ttl = self.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => {
                session.wizard.is_submitting() || session.last_touched.elapsed() < idle_ttl
            }
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("🧹 Evicted {} idle booking sessions", evicted);
        }
        evicted
    }

    pub async fn select_date(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<BookingSessionView, BookingError> {
        self.apply(id, |wizard| wizard.select_date(date)).await
    }

    pub async fn select_slot(&self, id: Uuid, time: &str) -> Result<BookingSessionView, BookingError> {
        self.apply(id, |wizard| wizard.select_slot(time)).await
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        update: ContactDetailsUpdate,
    ) -> Result<BookingSessionView, BookingError> {
        self.apply(id, |wizard| wizard.update_details(update)).await
    }

    pub async fn advance(&self, id: Uuid) -> Result<BookingSessionView, BookingError> {
        self.apply(id, |wizard| wizard.advance().map(|_| ())).await
    }

    pub async fn retreat(&self, id: Uuid) -> Result<BookingSessionView, BookingError> {
        self.apply(id, |wizard| wizard.retreat().map(|_| ())).await
    }

    pub async fn reset(&self, id: Uuid) -> Result<BookingSessionView, BookingError> {
        self.apply(id, BookingWizard::reset).await
    }

    pub async fn summary(&self, id: Uuid) -> Result<BookingSummary, BookingError> {
        let session = self.lock(id).await?;
        session.wizard.summary()
    }

    /// Submit the session's booking. The wizard lock is not held while the
    /// submission service runs.
    pub async fn confirm(
        &self,
        id: Uuid,
    ) -> Result<(SubmitOutcome, BookingSessionView), BookingError> {
        let shared = self.session(id).await?;

        let draft = {
            let mut session = shared.clone().lock_owned().await;
            session.last_touched = Instant::now();
            match session.wizard.begin_submission()? {
                Some(draft) => draft,
                None => {
                    let view = session_view(id, &session.wizard)?;
                    return Ok((SubmitOutcome::AlreadySubmitting, view));
                }
            }
        };

        let submission = self.submission.clone();
        let pending = shared.clone();
        let task = tokio::spawn(async move {
            let result = submission.submit(&draft).await;
            let mut session = pending.lock_owned().await;
            session.last_touched = Instant::now();
            let ack = session.wizard.finish_submission(result)?;
            let view = session_view(id, &session.wizard)?;
            Ok::<_, BookingError>((SubmitOutcome::Confirmed(ack), view))
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                error!("Submission task for session {} failed: {}", id, join_error);
                let mut session = shared.lock_owned().await;
                if session.wizard.is_submitting() {
                    session.wizard.finish_submission(Err(SubmissionError::Cancelled))?;
                }
                Err(BookingError::SubmissionFailed(SubmissionError::Cancelled))
            }
        }
    }

    async fn session(&self, id: Uuid) -> Result<SharedSession, BookingError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookingError::SessionNotFound(id))
    }

    /// Lock a session and mark it as used
    async fn lock(&self, id: Uuid) -> Result<OwnedMutexGuard<Session>, BookingError> {
        let mut session = self.session(id).await?.lock_owned().await;
        session.last_touched = Instant::now();
        Ok(session)
    }

    async fn apply<F>(&self, id: Uuid, action: F) -> Result<BookingSessionView, BookingError>
    where
        F: FnOnce(&mut BookingWizard) -> Result<(), BookingError>,
    {
        let mut session = self.lock(id).await?;
        action(&mut session.wizard)?;
        session_view(id, &session.wizard)
    }
}

/// Snapshot of a wizard for API responses
pub fn session_view(id: Uuid, wizard: &BookingWizard) -> Result<BookingSessionView, BookingError> {
    Ok(BookingSessionView {
        session_id: id.to_string(),
        step: wizard.step(),
        step_number: wizard.step().number(),
        submitting: wizard.is_submitting(),
        draft: wizard.draft().clone(),
        available_slots: wizard.available_slots(),
        progress: wizard.progress(),
        last_error: wizard.last_error().map(|e| e.to_string()),
        confirmation: wizard.confirmation()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::{SimulatedSubmissionService, StaticCatalog, SubmissionError};
    use async_trait::async_trait;
    use shared::{BookingDraft, SubmissionAck, TierId, WizardStep};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service_with(submission: Arc<dyn SubmissionService>) -> BookingSessionService {
        let calendar = CalendarService::new(Arc::new(FixedClock::on(date(2025, 6, 11))));
        BookingSessionService::new(Arc::new(StaticCatalog::default()), calendar, submission)
    }

    fn service() -> BookingSessionService {
        service_with(Arc::new(SimulatedSubmissionService::instant()))
    }

    fn details() -> ContactDetailsUpdate {
        ContactDetailsUpdate {
            first_name: Some("Anna".to_string()),
            last_name: Some("Meier".to_string()),
            email: Some("anna@example.com".to_string()),
            phone: Some("+41 76 123 45 67".to_string()),
            ..ContactDetailsUpdate::default()
        }
    }

    async fn reviewing_session(service: &BookingSessionService) -> Uuid {
        let view = service.create_session().await.unwrap();
        let id = Uuid::parse_str(&view.session_id).unwrap();
        service.select_date(id, date(2025, 6, 16)).await.unwrap();
        service.select_slot(id, "10:30").await.unwrap();
        service.advance(id).await.unwrap();
        service.update_details(id, details()).await.unwrap();
        service.advance(id).await.unwrap();
        id
    }

    /// Sleeps before acknowledging and counts calls
    struct SlowSubmission {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SubmissionService for SlowSubmission {
        async fn submit(&self, _draft: &BookingDraft) -> Result<SubmissionAck, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(SubmissionAck {
                reference: "BK-SLOW".to_string(),
                message: None,
            })
        }
    }

    struct RejectingSubmission;

    #[async_trait]
    impl SubmissionService for RejectingSubmission {
        async fn submit(&self, _draft: &BookingDraft) -> Result<SubmissionAck, SubmissionError> {
            Err(SubmissionError::Rejected {
                status: 409,
                message: "slot taken".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let service = service();
        let created = service.create_session().await.unwrap();
        let id = Uuid::parse_str(&created.session_id).unwrap();

        assert_eq!(created.step, WizardStep::SelectingSlot);
        assert_eq!(created.step_number, 1);
        assert!(created.available_slots.is_empty());
        assert_eq!(created.progress.len(), 3);

        let fetched = service.get_session(id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(service.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let service = service();
        let id = Uuid::new_v4();

        assert_eq!(
            service.get_session(id).await.unwrap_err(),
            BookingError::SessionNotFound(id)
        );
        assert_eq!(
            service.delete_session(id).await.unwrap_err(),
            BookingError::SessionNotFound(id)
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let service = service();
        let first = reviewing_session(&service).await;
        let second = Uuid::parse_str(&service.create_session().await.unwrap().session_id).unwrap();

        let view = service.get_session(second).await.unwrap();
        assert_eq!(view.step, WizardStep::SelectingSlot);
        assert!(view.draft.date.is_none());

        let view = service.get_session(first).await.unwrap();
        assert_eq!(view.step, WizardStep::Reviewing);
    }

    #[tokio::test]
    async fn test_confirm_happy_path() {
        let service = service();
        let id = reviewing_session(&service).await;

        let (outcome, view) = service.confirm(id).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));
        assert_eq!(view.step, WizardStep::Confirmed);
        assert_eq!(view.draft.tier, TierId::Premium);
        let confirmation = view.confirmation.unwrap();
        assert!(confirmation.reference.starts_with("BK-"));
    }

    #[tokio::test]
    async fn test_concurrent_confirm_submits_once() {
        let slow = Arc::new(SlowSubmission {
            calls: AtomicUsize::new(0),
        });
        let service = service_with(slow.clone());
        let id = reviewing_session(&service).await;

        let (first, second) = tokio::join!(service.confirm(id), service.confirm(id));

        let outcomes = [first.unwrap().0, second.unwrap().0];
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| **outcome == SubmitOutcome::AlreadySubmitting)
                .count(),
            1
        );
        assert_eq!(service.get_session(id).await.unwrap().step, WizardStep::Confirmed);
    }

    #[tokio::test]
    async fn test_rejected_submission_is_recorded() {
        let service = service_with(Arc::new(RejectingSubmission));
        let id = reviewing_session(&service).await;

        let error = service.confirm(id).await.unwrap_err();
        assert_eq!(error.kind(), "submission_failed");

        let view = service.get_session(id).await.unwrap();
        assert_eq!(view.step, WizardStep::Reviewing);
        assert!(!view.submitting);
        assert!(view.last_error.unwrap().contains("slot taken"));
    }

    #[tokio::test]
    async fn test_abandoned_confirm_still_records_outcome() {
        let service = service_with(Arc::new(SimulatedSubmissionService::new(
            Duration::from_millis(150),
        )));
        let id = reviewing_session(&service).await;

        let request = tokio::spawn({
            let service = service.clone();
            async move { service.confirm(id).await }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(service.get_session(id).await.unwrap().submitting);

        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let view = service.get_session(id).await.unwrap();
        assert!(!view.submitting);
        assert_eq!(view.step, WizardStep::Confirmed);
        assert!(view.confirmation.is_some());

        let view = service.reset(id).await.unwrap();
        assert_eq!(view.step, WizardStep::SelectingSlot);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let service = service().with_idle_ttl(Duration::from_millis(50));
        let idle = reviewing_session(&service).await;
        let active = Uuid::parse_str(&service.create_session().await.unwrap().session_id).unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;
        service.get_session(active).await.unwrap();

        assert_eq!(service.evict_idle().await, 1);
        assert_eq!(
            service.get_session(idle).await.unwrap_err(),
            BookingError::SessionNotFound(idle)
        );
        assert!(service.get_session(active).await.is_ok());
    }

    #[tokio::test]
    async fn test_creating_a_session_sweeps_idle_ones() {
        let service = service().with_idle_ttl(Duration::from_millis(20));
        service.create_session().await.unwrap();
        service.create_session().await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        service.create_session().await.unwrap();
        assert_eq!(service.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_submitting_session_is_not_evicted() {
        let service = service_with(Arc::new(SimulatedSubmissionService::new(
            Duration::from_millis(150),
        )))
        .with_idle_ttl(Duration::from_millis(10));
        let id = reviewing_session(&service).await;

        let request = tokio::spawn({
            let service = service.clone();
            async move { service.confirm(id).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(service.evict_idle().await, 0);
        let (outcome, _) = request.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));
    }

    #[tokio::test]
    async fn test_delete_session() {
        let service = service();
        let id = reviewing_session(&service).await;

        service.delete_session(id).await.unwrap();
        assert_eq!(service.session_count().await, 0);
        assert!(service.summary(id).await.is_err());
    }
}
