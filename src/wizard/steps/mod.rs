//! Per-step controllers. Each reads and writes the shared draft store and
//! decides whether Next is enabled.

pub mod avatar;
pub mod personal_info;
pub mod preview;
pub mod social_links;
pub mod work_experience;

use async_trait::async_trait;

use super::WizardStep;

pub use avatar::{AvatarStep, CropRegion, ImageKind, ValidatedImage, crop_square, validate_image};
pub use personal_info::{AutosaveGuard, PersonalField, PersonalInfoStep};
pub use preview::{PreviewStep, preview_profile};
pub use social_links::{LinkEditor, LinkItem, PlatformOption, SocialLinksStep};
pub use work_experience::{ExperienceEditor, ExperienceItem, WorkExperienceStep};

/// Common surface of the five step controllers.
#[async_trait]
pub trait StepController: Send + Sync {
    /// Which step this controller drives.
    fn step(&self) -> WizardStep;

    /// Whether the step's Next button is enabled.
    async fn can_advance(&self) -> bool;
}
