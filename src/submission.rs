//! Submission flow: turns the finished draft into a profile on the server.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::api::{CreateProfileRequest, Profile, ProfileApi};
use crate::draft::DraftStore;
use crate::error::{ApiError, SubmissionError};
use crate::in_flight::InFlight;
use crate::session::Session;

/// Shown when the server gives no reason for a failed creation.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to create profile. Please try again.";

/// Where the UI should go after a submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Profile created; the draft has been reset. Carries the success view data.
    Created(Box<Profile>),
    /// No usable credential; the draft is kept for after login.
    LoginRequired,
}

pub struct SubmissionFlow {
    store: Arc<DraftStore>,
    api: Arc<dyn ProfileApi>,
    session: Session,
    in_flight: AtomicBool,
}

impl SubmissionFlow {
    pub fn new(store: Arc<DraftStore>, api: Arc<dyn ProfileApi>, session: Session) -> Self {
        Self {
            store,
            api,
            session,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Build the creation request from the current draft.
    pub async fn build_request(&self) -> CreateProfileRequest {
        CreateProfileRequest::from(&self.store.snapshot().await)
    }

    /// Create the profile. One attempt; no retry.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmissionError> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return Err(SubmissionError::InFlight);
        };
        self.submit_once().await
    }

    async fn submit_once(&self) -> Result<SubmitOutcome, SubmissionError> {
        let Some(token) = self.session.token().await else {
            info!("No session token; login required before submitting");
            return Ok(SubmitOutcome::LoginRequired);
        };

        let request = self.build_request().await;
        match self.api.create_profile(&token, &request).await {
            Ok(profile) => {
                info!(slug = %profile.slug, "Profile created");
                self.store.reset_wizard().await;
                Ok(SubmitOutcome::Created(Box::new(profile)))
            }
            Err(ApiError::Unauthorized) => {
                warn!("Session rejected while submitting; clearing token");
                self.session.clear_token().await;
                Ok(SubmitOutcome::LoginRequired)
            }
            Err(source) => {
                let message = source
                    .server_message()
                    .unwrap_or(DEFAULT_FAILURE_MESSAGE)
                    .to_string();
                warn!(error = %source, "Profile creation failed");
                Err(SubmissionError::Api { message, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::RecordingApi;
    use crate::draft::{DraftLimits, Experience, PersonalInfo, Platform, SocialLink};
    use crate::store::MemoryStore;
    use std::time::Duration;

    use secrecy::SecretString;

    async fn flow(api: Arc<RecordingApi>, logged_in: bool) -> (SubmissionFlow, Arc<DraftStore>, Session) {
        let backend = Arc::new(MemoryStore::new());
        let session = Session::new(backend.clone());
        if logged_in {
            session.login(&SecretString::from("tok"), None).await.unwrap();
        }
        let (store, _) = DraftStore::open(backend, DraftLimits::default()).await.unwrap();
        let store = Arc::new(store);
        store
            .set_personal_info(PersonalInfo {
                full_name: "Jane Doe".into(),
                title: "Engineer".into(),
                email: "jane@example.com".into(),
                phone: "0123456789".into(),
                address: String::new(),
            })
            .await;
        for company in ["Acme", "Globex"] {
            store
                .add_work_experience(Experience {
                    company: company.into(),
                    position: "Engineer".into(),
                    start_date: "2020-01".into(),
                    is_current: true,
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        store
            .add_social_link(SocialLink::new(Platform::Github, "https://github.com/jane"))
            .await
            .unwrap();
        let flow = SubmissionFlow::new(store.clone(), api, session.clone());
        (flow, store, session)
    }

    #[tokio::test]
    async fn success_resets_draft() {
        let api = Arc::new(RecordingApi::default());
        let (flow, store, _) = flow(api.clone(), true).await;
        store.move_work_experience(1, 0).await.unwrap();

        let outcome = flow.submit().await.unwrap();
        let SubmitOutcome::Created(profile) = outcome else {
            panic!("expected created profile");
        };
        assert_eq!(profile.full_name, "Jane Doe");
        assert!(store.snapshot().await.is_empty());

        let created = api.created.lock().unwrap();
        let companies: Vec<_> = created[0]
            .work_experiences
            .iter()
            .map(|e| e.company.as_str())
            .collect();
        assert_eq!(companies, vec!["Globex", "Acme"]);
        assert!(created[0].work_experiences[0].end_date.is_none());
    }

    #[tokio::test]
    async fn missing_token_requires_login() {
        let api = Arc::new(RecordingApi::default());
        let (flow, store, _) = flow(api.clone(), false).await;
        assert_eq!(flow.submit().await.unwrap(), SubmitOutcome::LoginRequired);
        assert!(api.created.lock().unwrap().is_empty());
        assert!(!store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_clears_token_keeps_draft() {
        let api = Arc::new(RecordingApi::failing(401, "jwt expired"));
        let (flow, store, session) = flow(api, true).await;
        assert_eq!(flow.submit().await.unwrap(), SubmitOutcome::LoginRequired);
        assert!(!session.is_logged_in().await);
        assert_eq!(store.work_experiences().await.len(), 2);
    }

    #[tokio::test]
    async fn failure_keeps_draft_and_reports_message() {
        let api = Arc::new(RecordingApi::failing(400, "Slug already taken"));
        let (flow, store, _) = flow(api.clone(), true).await;
        let err = flow.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Slug already taken");
        assert!(!store.snapshot().await.is_empty());
        assert!(!flow.is_submitting());

        api.set_failure(500, "");
        let err = flow.submit().await.unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn dropped_submit_releases_flag() {
        let api = Arc::new(RecordingApi::default());
        let (flow, store, _) = flow(api.clone(), true).await;

        api.set_stalled(true);
        let pending = tokio::time::timeout(Duration::from_millis(20), flow.submit()).await;
        assert!(pending.is_err(), "stalled submit should still be pending");
        assert!(!flow.is_submitting());
        assert!(!store.snapshot().await.is_empty());

        api.set_stalled(false);
        assert!(matches!(flow.submit().await, Ok(SubmitOutcome::Created(_))));
        assert_eq!(api.created.lock().unwrap().len(), 1);
    }
}
