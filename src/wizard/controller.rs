//! WizardController: step sequencing and the progress header.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::WizardStep;
use super::steps::StepController;
use crate::draft::DraftStore;
use crate::error::WizardError;

/// Where a step sits relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: WizardStep,
    pub number: u8,
    pub title: &'static str,
    pub status: StepStatus,
}

/// View model of the progress header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: WizardStep,
    pub steps: Vec<StepProgress>,
    /// e.g. "Step 2 of 5"
    pub label: String,
}

impl Progress {
    pub fn at(current: WizardStep) -> Self {
        let steps = WizardStep::ALL
            .into_iter()
            .map(|step| StepProgress {
                step,
                number: step.number(),
                title: step.title(),
                status: match step.cmp(&current) {
                    std::cmp::Ordering::Less => StepStatus::Completed,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Upcoming,
                },
            })
            .collect();
        Self {
            current,
            steps,
            label: format!("Step {} of {}", current.number(), WizardStep::COUNT),
        }
    }
}

/// Owns the current-step state machine on top of the draft store.
#[derive(Clone)]
pub struct WizardController {
    store: Arc<DraftStore>,
}

impl WizardController {
    pub fn new(store: Arc<DraftStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<DraftStore> {
        &self.store
    }

    pub async fn current(&self) -> WizardStep {
        self.store.current_step().await
    }

    pub async fn progress(&self) -> Progress {
        Progress::at(self.current().await)
    }

    /// Move forward once `gate` (the current step's controller) allows it.
    pub async fn advance(&self, gate: &dyn StepController) -> Result<WizardStep, WizardError> {
        let current = self.current().await;
        if gate.step() != current {
            return Err(WizardError::NotCurrent {
                current,
                actual: gate.step(),
            });
        }
        if !gate.can_advance().await {
            return Err(WizardError::StepIncomplete(current));
        }
        self.next().await
    }

    /// Ungated Next.
    pub async fn next(&self) -> Result<WizardStep, WizardError> {
        let current = self.current().await;
        let next = current.next().ok_or(WizardError::AtLastStep)?;
        self.go(current, next).await;
        Ok(next)
    }

    pub async fn back(&self) -> Result<WizardStep, WizardError> {
        let current = self.current().await;
        let prev = current.prev().ok_or(WizardError::AtFirstStep)?;
        self.go(current, prev).await;
        Ok(prev)
    }

    /// Jump straight to one of the editable data steps.
    pub async fn jump_to(&self, target: WizardStep) -> Result<(), WizardError> {
        if !target.is_jump_target() {
            return Err(WizardError::NotJumpTarget(target));
        }
        let current = self.current().await;
        self.go(current, target).await;
        Ok(())
    }

    async fn go(&self, from: WizardStep, to: WizardStep) {
        debug!(%from, %to, "Wizard step change");
        self.store.set_current_step(to).await;
    }
}
