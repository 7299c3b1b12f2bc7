//! `reqwest`-backed implementation of [`ProfileApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{ProfileEnvelope, ProfileListEnvelope};
use super::{
    Analytics, AvatarUpload, AvatarUploadResponse, CreateProfileRequest, Profile, ProfileApi,
    ProfileSummary, TrackViewRequest, UpdateProfileRequest,
};
use crate::config::WizardConfig;
use crate::error::{ApiError, ConfigError};

/// HTTP client for the Smart Card backend.
#[derive(Debug, Clone)]
pub struct HttpProfileApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpProfileApi {
    /// Build a client with the configured base URL and request timeout.
    pub fn new(config: &WizardConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Self::with_client(client, &config.api_base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: "SMARTCARD_API_BASE_URL".to_string(),
            message,
        };
        let base_url =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid(format!("{base_url} cannot be a base URL")));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL extended with `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Construction rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and map non-success statuses to [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            _ => {
                let body = resp.text().await.unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                    .unwrap_or_default();
                warn!(status = status.as_u16(), %message, "API request failed");
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(request).await?;
        Ok(resp.json::<T>().await?)
    }
}

fn bearer(request: RequestBuilder, token: &SecretString) -> RequestBuilder {
    request.bearer_auth(token.expose_secret())
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn create_profile(
        &self,
        token: &SecretString,
        request: &CreateProfileRequest,
    ) -> Result<Profile, ApiError> {
        debug!(
            experiences = request.work_experiences.len(),
            social_links = request.social_links.len(),
            "Creating profile"
        );
        let req = bearer(self.client.post(self.url(&["profiles"])), token).json(request);
        let envelope: ProfileEnvelope = self.send_json(req).await?;
        Ok(envelope.profile)
    }

    async fn upload_avatar(
        &self,
        token: &SecretString,
        upload: AvatarUpload,
    ) -> Result<AvatarUploadResponse, ApiError> {
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("avatar", part);

        debug!(size, "Uploading avatar");
        let req = bearer(self.client.post(self.url(&["profiles", "upload-avatar"])), token)
            .multipart(form);
        self.send_json(req).await
    }

    async fn get_public_profile(&self, slug: &str) -> Result<Profile, ApiError> {
        let req = self.client.get(self.url(&["profiles", slug]));
        let envelope: ProfileEnvelope = self.send_json(req).await?;
        Ok(envelope.profile)
    }

    async fn list_my_profiles(&self, token: &SecretString) -> Result<Vec<ProfileSummary>, ApiError> {
        let req = bearer(self.client.get(self.url(&["profiles", "my-profiles"])), token);
        let envelope: ProfileListEnvelope = self.send_json(req).await?;
        Ok(envelope.profiles)
    }

    async fn get_profile_for_edit(
        &self,
        token: &SecretString,
        id: &str,
    ) -> Result<Profile, ApiError> {
        let req = bearer(self.client.get(self.url(&["profiles", "edit", id])), token);
        let envelope: ProfileEnvelope = self.send_json(req).await?;
        Ok(envelope.profile)
    }

    async fn update_profile(
        &self,
        token: &SecretString,
        id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<(), ApiError> {
        let req = bearer(self.client.put(self.url(&["profiles", id])), token).json(request);
        self.send(req).await?;
        Ok(())
    }

    async fn delete_profile(&self, token: &SecretString, id: &str) -> Result<(), ApiError> {
        let req = bearer(self.client.delete(self.url(&["profiles", id])), token);
        self.send(req).await?;
        Ok(())
    }

    async fn get_analytics(&self, token: &SecretString, id: &str) -> Result<Analytics, ApiError> {
        let url = self.url(&["analytics", "profiles", id, "analytics"]);
        let req = bearer(self.client.get(url), token);
        self.send_json(req).await
    }

    async fn export_analytics(&self, token: &SecretString, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.url(&["analytics", "profiles", id, "analytics", "export"]);
        let req = bearer(self.client.get(url), token);
        let resp = self.send(req).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn track_view(&self, request: &TrackViewRequest) -> Result<(), ApiError> {
        let req = self
            .client
            .post(self.url(&["analytics", "track-view"]))
            .json(request);
        self.send(req).await?;
        Ok(())
    }
}
