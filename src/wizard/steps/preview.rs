//! Step 5: read-only preview, confirmation, and profile creation.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::StepController;
use crate::api::Profile;
use crate::api::models::{ProfileExperience, ProfileSocialLink};
use crate::draft::Draft;
use crate::error::{SubmissionError, WizardError};
use crate::submission::{SubmissionFlow, SubmitOutcome};
use crate::wizard::{WizardController, WizardStep};

const NAME_PLACEHOLDER: &str = "Your Name";
const TITLE_PLACEHOLDER: &str = "Your Title";
const PHONE_PLACEHOLDER: &str = "+84 123 456 789";
const EMAIL_PLACEHOLDER: &str = "email@example.com";

/// Public-profile view of a draft, with placeholders for blank fields.
pub fn preview_profile(draft: &Draft) -> Profile {
    let info = &draft.personal_info;
    let or = |value: &str, placeholder: &str| {
        if value.is_empty() {
            placeholder.to_string()
        } else {
            value.to_string()
        }
    };
    Profile {
        full_name: or(&info.full_name, NAME_PLACEHOLDER),
        title: Some(or(&info.title, TITLE_PLACEHOLDER)),
        phone: Some(or(&info.phone, PHONE_PLACEHOLDER)),
        address: Some(info.address.clone()),
        email: Some(or(&info.email, EMAIL_PLACEHOLDER)),
        avatar_url: Some(draft.avatar_url.clone()).filter(|url| !url.is_empty()),
        experiences: draft
            .work_experiences
            .values()
            .map(|exp| ProfileExperience {
                company: exp.company.clone(),
                position: exp.position.clone(),
                start_date: exp.start_date.clone(),
                end_date: exp.end_date.clone(),
                description: Some(exp.description.clone()),
                ..Default::default()
            })
            .collect(),
        social_links: draft
            .social_links
            .values()
            .map(|link| ProfileSocialLink {
                platform: link.platform.to_string(),
                url: link.url.clone(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub struct PreviewStep {
    wizard: WizardController,
    submission: SubmissionFlow,
    confirmed: AtomicBool,
}

impl PreviewStep {
    pub fn new(wizard: WizardController, submission: SubmissionFlow) -> Self {
        Self {
            wizard,
            submission,
            confirmed: AtomicBool::new(false),
        }
    }

    /// Full name, title, email, phone, and at least one experience.
    pub async fn has_required_data(&self) -> bool {
        self.wizard.store().has_required_data().await
    }

    /// Tick or untick the confirmation box. Ticking is refused (returns
    /// `false`) while required data is missing.
    pub async fn set_confirmed(&self, confirmed: bool) -> bool {
        if confirmed && !self.has_required_data().await {
            return false;
        }
        self.confirmed.store(confirmed, Ordering::Release);
        true
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed.load(Ordering::Acquire)
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.is_submitting()
    }

    pub async fn preview_profile(&self) -> Profile {
        preview_profile(&self.wizard.store().snapshot().await)
    }

    /// Go back to step 1, 2 or 3 to edit.
    pub async fn jump_to(&self, step: WizardStep) -> Result<(), WizardError> {
        self.wizard.jump_to(step).await
    }

    /// Create the profile from the confirmed draft.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmissionError> {
        if !self.has_required_data().await {
            return Err(SubmissionError::MissingRequiredData);
        }
        if !self.is_confirmed() {
            return Err(SubmissionError::NotConfirmed);
        }
        let outcome = self.submission.submit().await?;
        if matches!(outcome, SubmitOutcome::Created(_)) {
            self.confirmed.store(false, Ordering::Release);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl StepController for PreviewStep {
    fn step(&self) -> WizardStep {
        WizardStep::Preview
    }

    /// The create button: confirmed, complete, and not already submitting.
    async fn can_advance(&self) -> bool {
        self.is_confirmed() && !self.is_submitting() && self.has_required_data().await
    }
}
