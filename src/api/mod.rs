//! Client side of the Profile / Analytics REST API.

pub mod client;
pub mod models;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::ApiError;

pub use client::HttpProfileApi;
pub use models::{
    Analytics, AvatarUploadResponse, CreateProfileRequest, Profile, ProfileSummary,
    TrackViewRequest, UpdateProfileRequest, ViewSource,
};

/// Image bytes to send to the avatar upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Backend operations used by the wizard and the profile pages.
///
/// Authenticated calls take the bearer token explicitly; the caller decides
/// what to do with the session on `ApiError::Unauthorized`.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// `POST /profiles`
    async fn create_profile(
        &self,
        token: &SecretString,
        request: &CreateProfileRequest,
    ) -> Result<Profile, ApiError>;

    /// `POST /profiles/upload-avatar` as multipart field `avatar`. Returns the
    /// server-relative URL of the stored image.
    async fn upload_avatar(
        &self,
        token: &SecretString,
        upload: AvatarUpload,
    ) -> Result<AvatarUploadResponse, ApiError>;

    /// `GET /profiles/{slug}` (no auth)
    async fn get_public_profile(&self, slug: &str) -> Result<Profile, ApiError>;

    /// `GET /profiles/my-profiles`
    async fn list_my_profiles(&self, token: &SecretString) -> Result<Vec<ProfileSummary>, ApiError>;

    /// `GET /profiles/edit/{id}`
    async fn get_profile_for_edit(&self, token: &SecretString, id: &str)
    -> Result<Profile, ApiError>;

    /// `PUT /profiles/{id}`
    async fn update_profile(
        &self,
        token: &SecretString,
        id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<(), ApiError>;

    /// `DELETE /profiles/{id}`
    async fn delete_profile(&self, token: &SecretString, id: &str) -> Result<(), ApiError>;

    /// `GET /analytics/profiles/{id}/analytics`
    async fn get_analytics(&self, token: &SecretString, id: &str) -> Result<Analytics, ApiError>;

    /// `GET /analytics/profiles/{id}/analytics/export` as raw CSV bytes.
    async fn export_analytics(&self, token: &SecretString, id: &str) -> Result<Vec<u8>, ApiError>;

    /// `POST /analytics/track-view` (no auth)
    async fn track_view(&self, request: &TrackViewRequest) -> Result<(), ApiError>;
}
