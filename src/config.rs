//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Wizard and API client configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Base URL of the REST API, e.g. `http://localhost:3000/api/v1`.
    pub api_base_url: String,
    /// Origin that relative asset URLs (uploaded avatars) are resolved against.
    pub asset_base_url: String,
    /// Directory holding the persisted draft and session files.
    pub data_dir: PathBuf,
    /// Personal info auto-save period.
    pub autosave_interval: Duration,
    /// How long a draft stays valid after personal info was last saved.
    pub draft_expiry: chrono::Duration,
    /// Maximum number of social links in a draft.
    pub max_social_links: usize,
    /// Maximum number of work experiences in a draft.
    pub max_work_experiences: usize,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api/v1".to_string(),
            asset_base_url: "http://localhost:3000".to_string(),
            data_dir: default_data_dir(),
            autosave_interval: Duration::from_secs(30),
            draft_expiry: chrono::Duration::days(7),
            max_social_links: 10,
            max_work_experiences: 10,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl WizardConfig {
    /// Build configuration from `SMARTCARD_*` environment variables.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = std::env::var("SMARTCARD_API_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let asset_base_url = std::env::var("SMARTCARD_ASSET_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.asset_base_url);

        let data_dir = std::env::var("SMARTCARD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let autosave_interval = env_parse::<u64>("SMARTCARD_AUTOSAVE_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.autosave_interval);

        let draft_expiry = env_parse::<i64>("SMARTCARD_DRAFT_EXPIRY_DAYS")
            .filter(|days| *days > 0)
            .map(chrono::Duration::days)
            .unwrap_or(defaults.draft_expiry);

        let max_social_links =
            env_parse("SMARTCARD_MAX_SOCIAL_LINKS").unwrap_or(defaults.max_social_links);

        let max_work_experiences =
            env_parse("SMARTCARD_MAX_WORK_EXPERIENCES").unwrap_or(defaults.max_work_experiences);

        let http_timeout = env_parse::<u64>("SMARTCARD_HTTP_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Self {
            api_base_url,
            asset_base_url,
            data_dir,
            autosave_interval,
            draft_expiry,
            max_social_links,
            max_work_experiences,
            http_timeout,
        }
    }

    /// Draft-store limits derived from this configuration.
    pub fn draft_limits(&self) -> crate::draft::DraftLimits {
        crate::draft::DraftLimits {
            max_social_links: self.max_social_links,
            max_work_experiences: self.max_work_experiences,
            draft_expiry: self.draft_expiry,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".smartcard")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wizard_constants() {
        let config = WizardConfig::default();
        assert_eq!(config.autosave_interval, Duration::from_secs(30));
        assert_eq!(config.draft_expiry, chrono::Duration::days(7));
        assert_eq!(config.max_social_links, 10);
        assert_eq!(config.max_work_experiences, 10);
        assert!(config.data_dir.ends_with(".smartcard"));
    }

    #[test]
    fn draft_limits_follow_config() {
        let config = WizardConfig {
            max_social_links: 3,
            max_work_experiences: 4,
            ..WizardConfig::default()
        };
        let limits = config.draft_limits();
        assert_eq!(limits.max_social_links, 3);
        assert_eq!(limits.max_work_experiences, 4);
        assert_eq!(limits.draft_expiry, chrono::Duration::days(7));
    }
}
