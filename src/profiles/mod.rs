//! Profile pages beyond the wizard: dashboard, editing, public view, analytics.

pub mod analytics;
pub mod dashboard;
pub mod edit;
pub mod public;

pub use analytics::{AnalyticsPage, CsvExport, device_percentages, export_file_name};
pub use dashboard::{Dashboard, DashboardLoad, StatusFilter, filter_profiles};
pub use edit::{EditField, EditLoad, EditSave, ProfileEditFlow, ProfileEditor};
pub use public::{PublicProfilePage, display_heading, meta_description, page_title};
