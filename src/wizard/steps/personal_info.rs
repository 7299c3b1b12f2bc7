//! Step 1: personal information form with periodic auto-save.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use super::StepController;
use crate::draft::{DraftStore, PersonalInfo};
use crate::validation::{StepInput, ValidationReport, validate};
use crate::wizard::WizardStep;

/// Editable fields of the personal info form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    FullName,
    Title,
    Email,
    Phone,
    Address,
}

/// Form buffer over the draft's personal info. Edits stay local until
/// [`submit`](Self::submit) or an auto-save commits them.
pub struct PersonalInfoStep {
    store: Arc<DraftStore>,
    form: Arc<RwLock<PersonalInfo>>,
}

impl PersonalInfoStep {
    /// Start editing from whatever the draft currently holds.
    pub async fn open(store: Arc<DraftStore>) -> Self {
        let form = store.personal_info().await;
        Self {
            store,
            form: Arc::new(RwLock::new(form)),
        }
    }

    pub async fn form(&self) -> PersonalInfo {
        self.form.read().await.clone()
    }

    /// Update one field and revalidate the whole form.
    pub async fn set_field(&self, field: PersonalField, value: impl Into<String>) -> ValidationReport {
        let mut form = self.form.write().await;
        let value = value.into();
        match field {
            PersonalField::FullName => form.full_name = value,
            PersonalField::Title => form.title = value,
            PersonalField::Email => form.email = value,
            PersonalField::Phone => form.phone = value,
            PersonalField::Address => form.address = value,
        }
        validate(StepInput::PersonalInfo(&*form))
    }

    pub async fn report(&self) -> ValidationReport {
        validate(StepInput::PersonalInfo(&*self.form.read().await))
    }

    /// Commit the form to the draft if it validates.
    pub async fn submit(&self) -> Result<(), ValidationReport> {
        let form = {
            let mut form = self.form.write().await;
            form.email = form.email.trim().to_lowercase();
            form.clone()
        };
        let report = validate(StepInput::PersonalInfo(&form));
        if !report.is_valid() {
            return Err(report);
        }
        self.store.set_personal_info(form).await;
        Ok(())
    }

    /// Commit the form as-is, valid or not, when something has been typed.
    /// Returns whether anything was written.
    pub async fn autosave(&self) -> bool {
        autosave_once(&self.store, &self.form).await
    }

    /// Run [`autosave`](Self::autosave) every `interval` until the guard drops.
    pub fn spawn_autosave(&self, interval: Duration) -> AutosaveGuard {
        let store = self.store.clone();
        let form = self.form.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                autosave_once(&store, &form).await;
            }
        });
        AutosaveGuard { handle }
    }
}

async fn autosave_once(store: &DraftStore, form: &RwLock<PersonalInfo>) -> bool {
    let snapshot = form.read().await.clone();
    if !snapshot.has_progress() {
        return false;
    }
    debug!("Auto-saving personal info");
    store.set_personal_info(snapshot).await;
    true
}

#[async_trait]
impl StepController for PersonalInfoStep {
    fn step(&self) -> WizardStep {
        WizardStep::PersonalInfo
    }

    async fn can_advance(&self) -> bool {
        self.report().await.is_valid()
    }
}

/// Handle to the auto-save task; aborts it when dropped.
pub struct AutosaveGuard {
    handle: JoinHandle<()>,
}

impl AutosaveGuard {
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for AutosaveGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
