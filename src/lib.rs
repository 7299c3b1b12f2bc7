//! Smart Card: headless core of the business-card profile wizard.

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
mod in_flight;
pub mod profiles;
pub mod session;
pub mod store;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use config::WizardConfig;
pub use draft::{DraftRestore, DraftStore};
pub use error::{Error, Result};
pub use session::Session;
pub use submission::{SubmissionFlow, SubmitOutcome};
pub use wizard::{WizardController, WizardStep};
