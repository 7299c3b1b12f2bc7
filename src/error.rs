//! Error types for the Smart Card wizard.

use crate::draft::EntryKind;
use crate::validation::ValidationReport;
use crate::wizard::WizardStep;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Avatar error: {0}")]
    Avatar(#[from] AvatarError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Key-value persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Draft store mutation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Maximum of {max} {kind} entries reached")]
    LimitExceeded { kind: EntryKind, max: usize },

    #[error("No {kind} entry with id {id}")]
    EntryNotFound { kind: EntryKind, id: String },

    #[error("Index {index} out of range for {kind} list of length {len}")]
    IndexOutOfRange {
        kind: EntryKind,
        index: usize,
        len: usize,
    },

    #[error("Reorder for {kind} must be a permutation of the current entries")]
    InvalidOrder { kind: EntryKind },
}

/// Failure to save a list editor ("modal") back into the draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Please correct the highlighted fields")]
    Invalid(ValidationReport),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

/// Step navigation refusals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Complete the {0} step before continuing")]
    StepIncomplete(WizardStep),

    #[error("Step {actual} is not the current step ({current})")]
    NotCurrent {
        current: WizardStep,
        actual: WizardStep,
    },

    #[error("Already on the last step")]
    AtLastStep,

    #[error("Already on the first step")]
    AtFirstStep,

    #[error("Cannot jump to the {0} step")]
    NotJumpTarget(WizardStep),
}

/// Errors from the Profile / Analytics REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not logged in: no session token")]
    MissingCredential,

    #[error("Session expired or unauthorized")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Server-supplied message, if the API returned one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Avatar selection and upload errors. Display strings are shown inline.
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("Only JPEG and PNG images are allowed")]
    UnsupportedType,

    #[error("File size must be less than 5MB")]
    TooLarge { size: usize, max: usize },

    #[error("Image must be at least 200x200 pixels")]
    TooSmall { width: u32, height: u32 },

    #[error("Failed to load image")]
    Decode(String),

    #[error("Crop region {x},{y} {size}x{size} does not fit a {width}x{height} image")]
    InvalidCrop {
        x: u32,
        y: u32,
        size: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed to encode cropped image: {0}")]
    Encode(String),

    #[error("An upload is already in progress")]
    InFlight,

    #[error("Please login first. Token not found.")]
    NotLoggedIn,

    #[error("Please login again - your session has expired")]
    SessionExpired,

    #[error("{0}")]
    UploadFailed(String),
}

/// Profile submission errors. The draft is left untouched for every variant.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("A submission is already in progress")]
    InFlight,

    #[error("Please confirm the preview before creating your profile")]
    NotConfirmed,

    #[error("Required profile information is missing")]
    MissingRequiredData,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Errors from the dashboard, edit, public, and analytics pages.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile not found")]
    NotFound,

    #[error("Full name is required")]
    FullNameRequired,

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl ProfileError {
    /// Wrap an API failure, preferring the server's message over `fallback`.
    pub fn api(source: ApiError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_string();
        Self::Api { message, source }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
