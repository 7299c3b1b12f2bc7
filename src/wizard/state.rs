//! Wizard step state machine: which screen of the profile wizard is active.

use serde::{Deserialize, Serialize};

/// The five steps of the profile wizard.
///
/// Progresses linearly: PersonalInfo → WorkExperience → SocialLinks →
/// Avatar → Preview. Serialized as its 1-based step number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    PersonalInfo,
    WorkExperience,
    SocialLinks,
    Avatar,
    Preview,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [WizardStep; 5] = [
        Self::PersonalInfo,
        Self::WorkExperience,
        Self::SocialLinks,
        Self::Avatar,
        Self::Preview,
    ];

    /// Total number of steps.
    pub const COUNT: u8 = 5;

    /// 1-based step number.
    pub fn number(&self) -> u8 {
        match self {
            Self::PersonalInfo => 1,
            Self::WorkExperience => 2,
            Self::SocialLinks => 3,
            Self::Avatar => 4,
            Self::Preview => 5,
        }
    }

    /// Step for a 1-based number, if in range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::PersonalInfo),
            2 => Some(Self::WorkExperience),
            3 => Some(Self::SocialLinks),
            4 => Some(Self::Avatar),
            5 => Some(Self::Preview),
            _ => None,
        }
    }

    /// Next step, or `None` on Preview.
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Previous step, or `None` on PersonalInfo.
    pub fn prev(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    /// Whether Next/Back may move from `self` to `target`.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        self.next() == Some(target) || self.prev() == Some(target)
    }

    /// Steps the Preview screen can jump straight back to for editing.
    pub fn is_jump_target(&self) -> bool {
        matches!(
            self,
            Self::PersonalInfo | Self::WorkExperience | Self::SocialLinks
        )
    }

    /// Short title shown in the progress header.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Info",
            Self::WorkExperience => "Work Experience",
            Self::SocialLinks => "Social Links",
            Self::Avatar => "Avatar",
            Self::Preview => "Preview",
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::PersonalInfo
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("Wizard step out of range: {n}"))
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PersonalInfo => "personal_info",
            Self::WorkExperience => "work_experience",
            Self::SocialLinks => "social_links",
            Self::Avatar => "avatar",
            Self::Preview => "preview",
        };
        write!(f, "{s}")
    }
}
