//! Request and response bodies for the Profile / Analytics API.
//!
//! All bodies are camelCase JSON. Response types default missing fields so
//! older servers that omit optional data still decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::{Draft, Experience, Platform, SocialLink};

// ── Profile creation ────────────────────────────────────────────────

/// Body of `POST /profiles`, built from a finished draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub full_name: String,
    pub title: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub avatar_url: String,
    pub work_experiences: Vec<NewExperience>,
    pub social_links: Vec<NewSocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// Serialized as `null` for a current job.
    pub end_date: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialLink {
    pub platform: Platform,
    pub url: String,
}

impl From<&Experience> for NewExperience {
    fn from(exp: &Experience) -> Self {
        Self {
            company: exp.company.clone(),
            position: exp.position.clone(),
            start_date: exp.start_date.clone(),
            end_date: exp.end_date.clone().filter(|d| !d.is_empty()),
            description: exp.description.clone(),
        }
    }
}

impl From<&SocialLink> for NewSocialLink {
    fn from(link: &SocialLink) -> Self {
        Self {
            platform: link.platform,
            url: link.url.clone(),
        }
    }
}

impl From<&Draft> for CreateProfileRequest {
    /// Lists are emitted in display order.
    fn from(draft: &Draft) -> Self {
        let info = &draft.personal_info;
        Self {
            full_name: info.full_name.clone(),
            title: info.title.clone(),
            phone: info.phone.clone(),
            address: info.address.clone(),
            email: info.email.clone(),
            avatar_url: draft.avatar_url.clone(),
            work_experiences: draft.work_experiences.values().map(Into::into).collect(),
            social_links: draft.social_links.values().map(Into::into).collect(),
        }
    }
}

// ── Profile responses ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub name: String,
}

/// A full profile as returned by create, public fetch, and edit fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub id: String,
    pub slug: String,
    pub full_name: String,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub is_published: bool,
    pub profile_url: Option<String>,
    pub qr_code_url: Option<String>,
    pub theme: Option<Theme>,
    pub experiences: Vec<ProfileExperience>,
    pub social_links: Vec<ProfileSocialLink>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileExperience {
    pub id: Option<String>,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSocialLink {
    pub id: Option<String>,
    /// Kept as the server sends it; casing varies between endpoints.
    pub platform: String,
    pub url: String,
    pub display_order: Option<u32>,
}

/// Row of `GET /profiles/my-profiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSummary {
    pub id: String,
    pub slug: String,
    pub full_name: String,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    pub is_published: bool,
    pub theme: Option<Theme>,
    pub experience_count: u32,
    pub social_link_count: u32,
    pub qr_code_url: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileEnvelope {
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileListEnvelope {
    #[serde(default)]
    pub profiles: Vec<ProfileSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarUploadResponse {
    pub avatar_url: String,
}

// ── Profile update ──────────────────────────────────────────────────

/// Body of `PUT /profiles/{id}`. Blank optional fields are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub work_experiences: Vec<UpdateExperience>,
    pub social_links: Vec<UpdateSocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperience {
    /// `None` for entries added during this edit.
    pub id: Option<String>,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub display_order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSocialLink {
    pub id: Option<String>,
    pub platform: String,
    pub url: String,
    pub display_order: u32,
}

// ── Analytics ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub total_views: u64,
    pub views_last7_days: u64,
    pub views_last30_days: u64,
    #[serde(rename = "totalQRScans")]
    pub total_qr_scans: u64,
    pub qr_scans_last7_days: u64,
    pub views_by_day: Vec<DailyViews>,
    pub device_breakdown: DeviceBreakdown,
    pub views_by_source: BTreeMap<String, u64>,
    pub top_referrers: Vec<Referrer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyViews {
    pub date: String,
    pub views: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceBreakdown {
    pub mobile: u64,
    pub desktop: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Referrer {
    pub domain: String,
    pub count: u64,
}

/// How a visitor reached a public profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewSource {
    Direct,
    QrCode,
}

/// Body of `POST /analytics/track-view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackViewRequest {
    pub profile_id: String,
    pub source: ViewSource,
    pub referrer: String,
}

impl TrackViewRequest {
    /// A direct visit; an unknown referrer is reported as `"direct"`.
    pub fn direct(profile_id: impl Into<String>, referrer: Option<&str>) -> Self {
        Self {
            profile_id: profile_id.into(),
            source: ViewSource::Direct,
            referrer: referrer
                .filter(|r| !r.is_empty())
                .unwrap_or("direct")
                .to_string(),
        }
    }
}
