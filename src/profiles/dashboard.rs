//! "My profiles" dashboard: listing, filtering, deletion, logout.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{ProfileApi, ProfileSummary};
use crate::error::{ApiError, ProfileError};
use crate::session::Session;

/// Publication filter of the dashboard list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    pub fn matches(&self, profile: &ProfileSummary) -> bool {
        match self {
            Self::All => true,
            Self::Published => profile.is_published,
            Self::Draft => !profile.is_published,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "published" => Ok(Self::Published),
            "draft" => Ok(Self::Draft),
            other => Err(format!("Unknown status filter: {other}")),
        }
    }
}

/// Profiles whose name or slug contains `search` (case-insensitive) and
/// whose status passes `status`.
pub fn filter_profiles<'a>(
    profiles: &'a [ProfileSummary],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a ProfileSummary> {
    let needle = search.to_lowercase();
    profiles
        .iter()
        .filter(|p| {
            p.full_name.to_lowercase().contains(&needle) || p.slug.to_lowercase().contains(&needle)
        })
        .filter(|p| status.matches(p))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardLoad {
    Loaded(Vec<ProfileSummary>),
    LoginRequired,
}

pub struct Dashboard {
    api: Arc<dyn ProfileApi>,
    session: Session,
}

impl Dashboard {
    pub fn new(api: Arc<dyn ProfileApi>, session: Session) -> Self {
        Self { api, session }
    }

    /// Fetch the user's profiles. A rejected token is cleared.
    pub async fn load(&self) -> Result<DashboardLoad, ProfileError> {
        let Some(token) = self.session.token().await else {
            return Ok(DashboardLoad::LoginRequired);
        };
        match self.api.list_my_profiles(&token).await {
            Ok(profiles) => {
                info!(count = profiles.len(), "Profiles loaded");
                Ok(DashboardLoad::Loaded(profiles))
            }
            Err(ApiError::Unauthorized) => {
                self.session.clear_token().await;
                Ok(DashboardLoad::LoginRequired)
            }
            Err(e) => {
                warn!("Failed to load profiles: {}", e);
                Err(ProfileError::api(e, "Failed to load profiles"))
            }
        }
    }

    /// Delete a profile, then reload the list.
    pub async fn delete(&self, profile_id: &str) -> Result<DashboardLoad, ProfileError> {
        let Some(token) = self.session.token().await else {
            return Ok(DashboardLoad::LoginRequired);
        };
        self.api
            .delete_profile(&token, profile_id)
            .await
            .map_err(|e| ProfileError::api(e, "Failed to delete profile"))?;
        info!(profile_id, "Profile deleted");
        self.load().await
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }
}
