//! Public profile page: fetch by slug and record the visit.

use std::sync::Arc;

use tracing::debug;

use crate::api::{Profile, ProfileApi, TrackViewRequest};
use crate::error::{ApiError, ProfileError};

/// `"{name} - {title} | Smart Card"`, or without the title when there is none.
pub fn page_title(profile: &Profile) -> String {
    format!("{} | Smart Card", display_heading(profile))
}

/// `"{name} - {title}"` used for social share titles.
pub fn display_heading(profile: &Profile) -> String {
    match profile.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => format!("{} - {}", profile.full_name, title),
        None => profile.full_name.clone(),
    }
}

pub fn meta_description(profile: &Profile) -> String {
    match profile.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => format!(
            "{}, {}. View professional profile and connect.",
            profile.full_name, title
        ),
        None => format!(
            "{}. View professional profile and connect.",
            profile.full_name
        ),
    }
}

pub struct PublicProfilePage {
    api: Arc<dyn ProfileApi>,
}

impl PublicProfilePage {
    pub fn new(api: Arc<dyn ProfileApi>) -> Self {
        Self { api }
    }

    /// Fetch the profile behind `slug`.
    pub async fn fetch(&self, slug: &str) -> Result<Profile, ProfileError> {
        match self.api.get_public_profile(slug).await {
            Ok(profile) => Ok(profile),
            Err(ApiError::NotFound) => Err(ProfileError::NotFound),
            Err(e) => Err(ProfileError::Api {
                message: "Failed to load profile".to_string(),
                source: e,
            }),
        }
    }

    /// Record a direct visit. Failures are logged and dropped.
    pub async fn track_view(&self, profile_id: &str, referrer: Option<&str>) {
        let request = TrackViewRequest::direct(profile_id, referrer);
        if let Err(e) = self.api.track_view(&request).await {
            debug!(profile_id, "View tracking failed: {}", e);
        }
    }

    /// Fetch the profile and fire the view beacon in the background.
    pub async fn load(&self, slug: &str, referrer: Option<&str>) -> Result<Profile, ProfileError> {
        let profile = self.fetch(slug).await?;
        let api = self.api.clone();
        let request = TrackViewRequest::direct(profile.id.clone(), referrer);
        tokio::spawn(async move {
            if let Err(e) = api.track_view(&request).await {
                debug!(profile_id = %request.profile_id, "View tracking failed: {}", e);
            }
        });
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ViewSource;
    use crate::api::testing::RecordingApi;

    fn profile(title: Option<&str>) -> Profile {
        Profile {
            id: "p1".into(),
            slug: "jane".into(),
            full_name: "Jane Doe".into(),
            title: title.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn titles() {
        assert_eq!(page_title(&profile(Some("Engineer"))), "Jane Doe - Engineer | Smart Card");
        assert_eq!(page_title(&profile(None)), "Jane Doe | Smart Card");
        assert_eq!(
            meta_description(&profile(Some("Engineer"))),
            "Jane Doe, Engineer. View professional profile and connect."
        );
    }

    #[tokio::test]
    async fn not_found_and_generic_failure() {
        let page = PublicProfilePage::new(Arc::new(RecordingApi::failing(404, "")));
        assert_eq!(page.fetch("nobody").await.unwrap_err().to_string(), "Profile not found");

        let page = PublicProfilePage::new(Arc::new(RecordingApi::failing(500, "boom")));
        assert_eq!(
            page.fetch("jane").await.unwrap_err().to_string(),
            "Failed to load profile"
        );
    }

    #[tokio::test]
    async fn track_view_defaults_and_swallows() {
        let api = Arc::new(RecordingApi::default());
        let page = PublicProfilePage::new(api.clone());
        page.track_view("p1", None).await;
        let tracked = api.tracked.lock().unwrap().clone();
        assert_eq!(tracked[0].source, ViewSource::Direct);
        assert_eq!(tracked[0].referrer, "direct");

        api.set_failure(500, "");
        // Must not panic or surface the error
        page.track_view("p1", Some("https://google.com")).await;
    }

    #[tokio::test]
    async fn load_returns_profile() {
        let api = Arc::new(RecordingApi::default());
        *api.profile.lock().unwrap() = profile(Some("Engineer"));
        let page = PublicProfilePage::new(api);
        let loaded = page.load("jane", Some("https://t.co")).await.unwrap();
        assert_eq!(loaded.full_name, "Jane Doe");
    }
}
