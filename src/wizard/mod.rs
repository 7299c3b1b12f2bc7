//! The five-step profile wizard: step state machine, navigation, and the
//! per-step controllers.

pub mod controller;
pub mod state;
pub mod steps;

pub use controller::{Progress, StepProgress, StepStatus, WizardController};
pub use state::WizardStep;
pub use steps::StepController;
