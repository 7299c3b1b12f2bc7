//! Editing an existing profile outside the wizard.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::models::{UpdateExperience, UpdateSocialLink};
use crate::api::{Profile, ProfileApi, UpdateProfileRequest};
use crate::error::{ApiError, ProfileError};
use crate::session::Session;

/// Platform assigned to links added in the editor.
const NEW_LINK_PLATFORM: &str = "WEBSITE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    FullName,
    Title,
    Phone,
    Address,
    Email,
    AvatarUrl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableExperience {
    /// Server id; `None` for rows added in this session.
    pub id: Option<String>,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableLink {
    pub id: Option<String>,
    pub platform: String,
    pub url: String,
}

/// Editable copy of a server profile that tracks unsaved changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEditor {
    profile_id: String,
    pub full_name: String,
    pub title: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub avatar_url: String,
    experiences: Vec<EditableExperience>,
    social_links: Vec<EditableLink>,
    has_changes: bool,
}

impl ProfileEditor {
    pub fn from_profile(profile: Profile) -> Self {
        let text = |value: Option<String>| value.unwrap_or_default();
        Self {
            profile_id: profile.id,
            full_name: profile.full_name,
            title: text(profile.title),
            phone: text(profile.phone),
            address: text(profile.address),
            email: text(profile.email),
            avatar_url: text(profile.avatar_url),
            experiences: profile
                .experiences
                .into_iter()
                .map(|exp| EditableExperience {
                    id: exp.id,
                    company: exp.company,
                    position: exp.position,
                    start_date: exp.start_date,
                    end_date: exp.end_date.unwrap_or_default(),
                    description: exp.description.unwrap_or_default(),
                })
                .collect(),
            social_links: profile
                .social_links
                .into_iter()
                .map(|link| EditableLink {
                    id: link.id,
                    platform: link.platform,
                    url: link.url,
                })
                .collect(),
            has_changes: false,
        }
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn experiences(&self) -> &[EditableExperience] {
        &self.experiences
    }

    pub fn social_links(&self) -> &[EditableLink] {
        &self.social_links
    }

    pub fn set_field(&mut self, field: EditField, value: impl Into<String>) {
        let slot = match field {
            EditField::FullName => &mut self.full_name,
            EditField::Title => &mut self.title,
            EditField::Phone => &mut self.phone,
            EditField::Address => &mut self.address,
            EditField::Email => &mut self.email,
            EditField::AvatarUrl => &mut self.avatar_url,
        };
        *slot = value.into();
        self.has_changes = true;
    }

    pub fn add_experience(&mut self) -> usize {
        self.experiences.push(EditableExperience::default());
        self.has_changes = true;
        self.experiences.len() - 1
    }

    /// Apply `edit` to the row at `index`. Returns `false` if out of range.
    pub fn update_experience(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut EditableExperience),
    ) -> bool {
        let Some(exp) = self.experiences.get_mut(index) else {
            return false;
        };
        edit(exp);
        self.has_changes = true;
        true
    }

    pub fn remove_experience(&mut self, index: usize) -> Option<EditableExperience> {
        if index >= self.experiences.len() {
            return None;
        }
        self.has_changes = true;
        Some(self.experiences.remove(index))
    }

    pub fn add_social_link(&mut self) -> usize {
        self.social_links.push(EditableLink {
            id: None,
            platform: NEW_LINK_PLATFORM.to_string(),
            url: String::new(),
        });
        self.has_changes = true;
        self.social_links.len() - 1
    }

    pub fn update_social_link(&mut self, index: usize, edit: impl FnOnce(&mut EditableLink)) -> bool {
        let Some(link) = self.social_links.get_mut(index) else {
            return false;
        };
        edit(link);
        self.has_changes = true;
        true
    }

    pub fn remove_social_link(&mut self, index: usize) -> Option<EditableLink> {
        if index >= self.social_links.len() {
            return None;
        }
        self.has_changes = true;
        Some(self.social_links.remove(index))
    }

    /// Build the update body. Blank optional values become `null`; each row
    /// carries its list position as `displayOrder`.
    pub fn to_request(&self) -> Result<UpdateProfileRequest, ProfileError> {
        if self.full_name.trim().is_empty() {
            return Err(ProfileError::FullNameRequired);
        }
        let optional = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());
        Ok(UpdateProfileRequest {
            full_name: self.full_name.clone(),
            title: optional(&self.title),
            phone: optional(&self.phone),
            address: optional(&self.address),
            email: optional(&self.email),
            avatar_url: optional(&self.avatar_url),
            work_experiences: self
                .experiences
                .iter()
                .zip(0u32..)
                .map(|(exp, order)| UpdateExperience {
                    id: exp.id.clone(),
                    company: exp.company.clone(),
                    position: exp.position.clone(),
                    start_date: exp.start_date.clone(),
                    end_date: optional(&exp.end_date),
                    description: optional(&exp.description),
                    display_order: order,
                })
                .collect(),
            social_links: self
                .social_links
                .iter()
                .zip(0u32..)
                .map(|(link, order)| UpdateSocialLink {
                    id: link.id.clone(),
                    platform: link.platform.clone(),
                    url: link.url.clone(),
                    display_order: order,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditLoad {
    Loaded(Box<ProfileEditor>),
    /// Missing or rejected session; the token has been cleared.
    LoginRequired,
    /// No such profile; return to the dashboard.
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSave {
    Saved,
    LoginRequired,
}

pub struct ProfileEditFlow {
    api: Arc<dyn ProfileApi>,
    session: Session,
}

impl ProfileEditFlow {
    pub fn new(api: Arc<dyn ProfileApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub async fn load(&self, profile_id: &str) -> Result<EditLoad, ProfileError> {
        let Some(token) = self.session.token().await else {
            return Ok(EditLoad::LoginRequired);
        };
        match self.api.get_profile_for_edit(&token, profile_id).await {
            Ok(profile) => Ok(EditLoad::Loaded(Box::new(ProfileEditor::from_profile(profile)))),
            Err(ApiError::Unauthorized) => {
                self.session.clear_token().await;
                Ok(EditLoad::LoginRequired)
            }
            Err(ApiError::NotFound) => Ok(EditLoad::NotFound),
            Err(e) => {
                warn!("Failed to load profile for editing: {}", e);
                Err(ProfileError::api(e, "Failed to load profile data"))
            }
        }
    }

    /// Send the editor's contents. Clears the unsaved-changes flag on success.
    pub async fn save(&self, editor: &mut ProfileEditor) -> Result<EditSave, ProfileError> {
        let request = editor.to_request()?;
        let Some(token) = self.session.token().await else {
            return Ok(EditSave::LoginRequired);
        };
        match self
            .api
            .update_profile(&token, &editor.profile_id, &request)
            .await
        {
            Ok(()) => {
                editor.has_changes = false;
                info!(profile_id = %editor.profile_id, "Profile updated");
                Ok(EditSave::Saved)
            }
            Err(ApiError::Unauthorized) => {
                self.session.clear_token().await;
                Ok(EditSave::LoginRequired)
            }
            Err(e) => Err(ProfileError::api(e, "Failed to update profile")),
        }
    }
}
