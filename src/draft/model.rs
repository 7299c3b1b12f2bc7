//! Draft data model: the in-progress profile assembled by the wizard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entries::OrderedEntries;
use crate::wizard::WizardStep;

/// Step 1: contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl PersonalInfo {
    /// Whether anything worth auto-saving has been typed.
    pub fn has_progress(&self) -> bool {
        !self.full_name.is_empty() || !self.email.is_empty()
    }
}

/// Step 2 entry: one job.
///
/// Dates are month-input values (`YYYY-MM`). `end_date` is `None` while
/// `is_current` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
}

impl Experience {
    /// Enforce `is_current ⇒ end_date == None` and drop blank end dates.
    pub fn normalized(mut self) -> Self {
        if self.is_current || self.end_date.as_deref().is_some_and(|d| d.trim().is_empty()) {
            self.end_date = None;
        }
        self
    }

    /// Human-readable span, e.g. `"Mar 2021 - Present"`.
    pub fn date_range_label(&self) -> String {
        let end = if self.is_current {
            "Present".to_string()
        } else {
            format_month(self.end_date.as_deref())
        };
        format!("{} - {}", format_month(Some(&self.start_date)), end)
    }
}

/// Format a `YYYY-MM` month value as `MMM yyyy`; unparseable values are
/// returned unchanged and a missing value reads as "Present".
pub fn format_month(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "Present".to_string();
    };
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Supported social/contact channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Linkedin,
    Twitter,
    Instagram,
    Github,
    Youtube,
    Tiktok,
    Website,
    Email,
    Phone,
    Zalo,
    Telegram,
}

impl Platform {
    /// All platforms, in the order the picker lists them.
    pub const ALL: [Platform; 12] = [
        Self::Facebook,
        Self::Linkedin,
        Self::Twitter,
        Self::Instagram,
        Self::Github,
        Self::Youtube,
        Self::Tiktok,
        Self::Website,
        Self::Email,
        Self::Phone,
        Self::Zalo,
        Self::Telegram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Github => "github",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Website => "website",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Zalo => "zalo",
            Self::Telegram => "telegram",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Linkedin => "LinkedIn",
            Self::Twitter => "Twitter",
            Self::Instagram => "Instagram",
            Self::Github => "GitHub",
            Self::Youtube => "YouTube",
            Self::Tiktok => "TikTok",
            Self::Website => "Website",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Zalo => "Zalo",
            Self::Telegram => "Telegram",
        }
    }

    /// Input hint for the URL/contact field.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Facebook => "https://facebook.com/username",
            Self::Linkedin => "https://linkedin.com/in/username",
            Self::Twitter => "https://x.com/username",
            Self::Instagram => "https://instagram.com/username",
            Self::Github => "https://github.com/username",
            Self::Youtube => "https://youtube.com/@channel",
            Self::Tiktok => "https://tiktok.com/@username",
            Self::Website => "https://yourwebsite.com",
            Self::Email => "your.email@example.com",
            Self::Phone => "+84 123 456 789",
            Self::Zalo => "Zalo phone number or link",
            Self::Telegram => "@username or https://t.me/username",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown platform: {s}"))
    }
}

/// Step 3 entry: one social/contact link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: Platform,
    pub url: String,
}

impl SocialLink {
    /// Maximum characters shown in list rows before truncation.
    pub const DISPLAY_LEN: usize = 50;

    pub fn new(platform: Platform, url: impl Into<String>) -> Self {
        Self {
            platform,
            url: url.into(),
        }
    }

    /// URL shortened to 50 characters (47 + "...") for list rows.
    pub fn display_url(&self) -> String {
        if self.url.chars().count() <= Self::DISPLAY_LEN {
            return self.url.clone();
        }
        let head: String = self.url.chars().take(Self::DISPLAY_LEN - 3).collect();
        format!("{head}...")
    }
}

/// The aggregate wizard state persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub current_step: WizardStep,
    pub personal_info: PersonalInfo,
    pub work_experiences: OrderedEntries<Experience>,
    pub social_links: OrderedEntries<SocialLink>,
    /// Empty until an avatar has been uploaded.
    pub avatar_url: String,
    pub last_saved: Option<DateTime<Utc>>,
    pub draft_expiry: Option<DateTime<Utc>>,
}

impl Draft {
    /// Full name, title and email are filled in.
    pub fn is_personal_info_complete(&self) -> bool {
        let info = &self.personal_info;
        !info.full_name.is_empty() && !info.title.is_empty() && !info.email.is_empty()
    }

    pub fn is_work_experience_complete(&self) -> bool {
        !self.work_experiences.is_empty()
    }

    pub fn is_social_links_complete(&self) -> bool {
        !self.social_links.is_empty()
    }

    pub fn is_avatar_complete(&self) -> bool {
        !self.avatar_url.is_empty()
    }

    /// Everything the preview requires before the profile can be created.
    pub fn has_required_data(&self) -> bool {
        let info = &self.personal_info;
        !info.full_name.is_empty()
            && !info.title.is_empty()
            && !info.email.is_empty()
            && !info.phone.is_empty()
            && !self.work_experiences.is_empty()
    }

    /// Whether the draft's expiry has passed at `now`. Drafts without an
    /// expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.draft_expiry.is_some_and(|expiry| now > expiry)
    }

    /// True when nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
