//! In-process `ProfileApi` that records calls, for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::{
    Analytics, AvatarUpload, AvatarUploadResponse, CreateProfileRequest, Profile, ProfileApi,
    ProfileSummary, TrackViewRequest, UpdateProfileRequest,
};
use crate::error::ApiError;

#[derive(Default)]
pub(crate) struct RecordingApi {
    /// When set, every call fails with this status and message.
    pub failure: Mutex<Option<(u16, String)>>,
    /// When set, create and upload calls never complete.
    pub stalled: AtomicBool,
    pub profile: Mutex<Profile>,
    pub summaries: Mutex<Vec<ProfileSummary>>,
    pub analytics: Mutex<Analytics>,
    pub avatar_path: Mutex<String>,
    pub csv: Mutex<Vec<u8>>,
    pub tokens: Mutex<Vec<String>>,
    pub created: Mutex<Vec<CreateProfileRequest>>,
    pub uploads: Mutex<Vec<AvatarUpload>>,
    pub updated: Mutex<Vec<(String, UpdateProfileRequest)>>,
    pub deleted: Mutex<Vec<String>>,
    pub tracked: Mutex<Vec<TrackViewRequest>>,
}

impl RecordingApi {
    pub fn failing(status: u16, message: &str) -> Self {
        let api = Self::default();
        *api.failure.lock().unwrap() = Some((status, message.to_string()));
        api
    }

    pub fn set_failure(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::Release);
    }

    async fn stall(&self) {
        if self.stalled.load(Ordering::Acquire) {
            std::future::pending::<()>().await;
        }
    }

    fn check(&self, token: Option<&SecretString>) -> Result<(), ApiError> {
        if let Some(token) = token {
            self.tokens
                .lock()
                .unwrap()
                .push(token.expose_secret().to_string());
        }
        match self.failure.lock().unwrap().clone() {
            None => Ok(()),
            Some((401, _)) => Err(ApiError::Unauthorized),
            Some((404, _)) => Err(ApiError::NotFound),
            Some((status, message)) => Err(ApiError::Status { status, message }),
        }
    }
}

#[async_trait]
impl ProfileApi for RecordingApi {
    async fn create_profile(
        &self,
        token: &SecretString,
        request: &CreateProfileRequest,
    ) -> Result<Profile, ApiError> {
        self.check(Some(token))?;
        self.stall().await;
        self.created.lock().unwrap().push(request.clone());
        let mut profile = self.profile.lock().unwrap().clone();
        profile.full_name = request.full_name.clone();
        Ok(profile)
    }

    async fn upload_avatar(
        &self,
        token: &SecretString,
        upload: AvatarUpload,
    ) -> Result<AvatarUploadResponse, ApiError> {
        self.check(Some(token))?;
        self.stall().await;
        self.uploads.lock().unwrap().push(upload);
        Ok(AvatarUploadResponse {
            avatar_url: self.avatar_path.lock().unwrap().clone(),
        })
    }

    async fn get_public_profile(&self, _slug: &str) -> Result<Profile, ApiError> {
        self.check(None)?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn list_my_profiles(&self, token: &SecretString) -> Result<Vec<ProfileSummary>, ApiError> {
        self.check(Some(token))?;
        Ok(self.summaries.lock().unwrap().clone())
    }

    async fn get_profile_for_edit(
        &self,
        token: &SecretString,
        _id: &str,
    ) -> Result<Profile, ApiError> {
        self.check(Some(token))?;
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(
        &self,
        token: &SecretString,
        id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<(), ApiError> {
        self.check(Some(token))?;
        self.updated
            .lock()
            .unwrap()
            .push((id.to_string(), request.clone()));
        Ok(())
    }

    async fn delete_profile(&self, token: &SecretString, id: &str) -> Result<(), ApiError> {
        self.check(Some(token))?;
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn get_analytics(&self, token: &SecretString, _id: &str) -> Result<Analytics, ApiError> {
        self.check(Some(token))?;
        Ok(self.analytics.lock().unwrap().clone())
    }

    async fn export_analytics(&self, token: &SecretString, _id: &str) -> Result<Vec<u8>, ApiError> {
        self.check(Some(token))?;
        Ok(self.csv.lock().unwrap().clone())
    }

    async fn track_view(&self, request: &TrackViewRequest) -> Result<(), ApiError> {
        self.check(None)?;
        self.tracked.lock().unwrap().push(request.clone());
        Ok(())
    }
}
