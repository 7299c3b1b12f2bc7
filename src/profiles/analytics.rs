//! Per-profile view analytics and CSV export.

use std::sync::Arc;

use tracing::info;

use crate::api::{Analytics, ProfileApi};
use crate::error::{ApiError, ProfileError};
use crate::session::Session;

/// Downloaded analytics CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Suggested download name for a profile's export.
pub fn export_file_name(profile_id: &str) -> String {
    format!("analytics-{profile_id}.csv")
}

/// Share of views per device class, as percentages summing to 100 (or both 0).
pub fn device_percentages(analytics: &Analytics) -> (f64, f64) {
    let devices = &analytics.device_breakdown;
    let total = devices.mobile + devices.desktop;
    if total == 0 {
        return (0.0, 0.0);
    }
    let mobile = devices.mobile as f64 * 100.0 / total as f64;
    (mobile, 100.0 - mobile)
}

pub struct AnalyticsPage {
    api: Arc<dyn ProfileApi>,
    session: Session,
}

impl AnalyticsPage {
    pub fn new(api: Arc<dyn ProfileApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub async fn load(&self, profile_id: &str) -> Result<Analytics, ProfileError> {
        let token = self.session.token().await.ok_or_else(|| {
            ProfileError::api(ApiError::MissingCredential, "Failed to load analytics")
        })?;
        self.api
            .get_analytics(&token, profile_id)
            .await
            .map_err(|e| ProfileError::api(e, "Failed to load analytics"))
    }

    pub async fn export(&self, profile_id: &str) -> Result<CsvExport, ProfileError> {
        let token = self.session.token().await.ok_or_else(|| {
            ProfileError::api(ApiError::MissingCredential, "Failed to export analytics")
        })?;
        let bytes = self
            .api
            .export_analytics(&token, profile_id)
            .await
            .map_err(|e| ProfileError::api(e, "Failed to export analytics"))?;
        info!(profile_id, size = bytes.len(), "Analytics exported");
        Ok(CsvExport {
            file_name: export_file_name(profile_id),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::DeviceBreakdown;
    use crate::api::testing::RecordingApi;
    use crate::store::MemoryStore;
    use secrecy::SecretString;

    async fn page(api: Arc<RecordingApi>, logged_in: bool) -> AnalyticsPage {
        let session = Session::new(Arc::new(MemoryStore::new()));
        if logged_in {
            session.login(&SecretString::from("tok"), None).await.unwrap();
        }
        AnalyticsPage::new(api, session)
    }

    #[test]
    fn device_split() {
        let analytics = Analytics {
            device_breakdown: DeviceBreakdown {
                mobile: 3,
                desktop: 1,
            },
            ..Default::default()
        };
        assert_eq!(device_percentages(&analytics), (75.0, 25.0));
        assert_eq!(device_percentages(&Analytics::default()), (0.0, 0.0));
    }

    #[tokio::test]
    async fn export_names_file() {
        let api = Arc::new(RecordingApi::default());
        *api.csv.lock().unwrap() = b"date,views\n2024-01-01,3\n".to_vec();
        let page = page(api, true).await;
        let export = page.export("p1").await.unwrap();
        assert_eq!(export.file_name, "analytics-p1.csv");
        assert!(export.bytes.starts_with(b"date,views"));
    }

    #[tokio::test]
    async fn load_failures() {
        let page_out = page(Arc::new(RecordingApi::default()), false).await;
        assert!(matches!(
            page_out.load("p1").await,
            Err(ProfileError::Api {
                source: ApiError::MissingCredential,
                ..
            })
        ));

        let failing = page(Arc::new(RecordingApi::failing(500, "")), true).await;
        assert_eq!(
            failing.load("p1").await.unwrap_err().to_string(),
            "Failed to load analytics"
        );
    }
}
