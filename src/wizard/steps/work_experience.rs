//! Step 2: work experience list with an add/edit editor.

use std::sync::Arc;

use async_trait::async_trait;

use super::StepController;
use crate::draft::{DraftStore, EntryId, EntryKind, Experience};
use crate::error::{DraftError, EditorError};
use crate::validation::{StepInput, ValidationReport, validate};
use crate::wizard::WizardStep;

/// Editing buffer for one experience.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceEditor {
    /// `None` when adding a new entry.
    pub editing: Option<EntryId>,
    pub experience: Experience,
}

impl ExperienceEditor {
    /// Toggle "I currently work here"; checking it clears the end date.
    pub fn set_current(&mut self, is_current: bool) {
        self.experience.is_current = is_current;
        if is_current {
            self.experience.end_date = None;
        }
    }

    pub fn report(&self) -> ValidationReport {
        validate(StepInput::WorkExperience(&self.experience))
    }
}

/// One row of the experience list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceItem {
    pub id: EntryId,
    pub experience: Experience,
    /// e.g. "Jan 2020 - Present"
    pub date_range: String,
}

pub struct WorkExperienceStep {
    store: Arc<DraftStore>,
}

impl WorkExperienceStep {
    pub fn new(store: Arc<DraftStore>) -> Self {
        Self { store }
    }

    /// Entries in display order.
    pub async fn items(&self) -> Vec<ExperienceItem> {
        self.store
            .work_experiences()
            .await
            .iter()
            .map(|(id, exp)| ExperienceItem {
                id,
                experience: exp.clone(),
                date_range: exp.date_range_label(),
            })
            .collect()
    }

    /// Whether "Add" is enabled.
    pub async fn can_add(&self) -> bool {
        self.store.work_experiences().await.len() < self.store.limits().max_work_experiences
    }

    /// Blank editor for a new entry. Refused at the cap.
    pub async fn open_new(&self) -> Result<ExperienceEditor, DraftError> {
        if !self.can_add().await {
            return Err(DraftError::LimitExceeded {
                kind: EntryKind::WorkExperience,
                max: self.store.limits().max_work_experiences,
            });
        }
        Ok(ExperienceEditor::default())
    }

    /// Editor prefilled from an existing entry.
    pub async fn open_edit(&self, id: EntryId) -> Result<ExperienceEditor, DraftError> {
        let list = self.store.work_experiences().await;
        let experience = list.get(id).cloned().ok_or(DraftError::EntryNotFound {
            kind: EntryKind::WorkExperience,
            id: id.to_string(),
        })?;
        Ok(ExperienceEditor {
            editing: Some(id),
            experience,
        })
    }

    /// Validate the editor and add or update the entry.
    pub async fn save(&self, editor: &ExperienceEditor) -> Result<EntryId, EditorError> {
        let report = editor.report();
        if !report.is_valid() {
            return Err(EditorError::Invalid(report));
        }
        let experience = editor.experience.clone().normalized();
        match editor.editing {
            Some(id) => {
                self.store.update_work_experience(id, experience).await?;
                Ok(id)
            }
            None => Ok(self.store.add_work_experience(experience).await?),
        }
    }

    pub async fn delete(&self, id: EntryId) -> Result<(), DraftError> {
        self.store.delete_work_experience(id).await.map(|_| ())
    }

    /// Drag-and-drop result.
    pub async fn move_entry(&self, from: usize, to: usize) -> Result<(), DraftError> {
        if from == to {
            return Ok(());
        }
        self.store.move_work_experience(from, to).await
    }
}

#[async_trait]
impl StepController for WorkExperienceStep {
    fn step(&self) -> WizardStep {
        WizardStep::WorkExperience
    }

    async fn can_advance(&self) -> bool {
        self.store.is_work_experience_complete().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftLimits;
    use crate::store::MemoryStore;

    async fn step_with_limit(max: usize) -> WorkExperienceStep {
        let limits = DraftLimits {
            max_work_experiences: max,
            ..Default::default()
        };
        let (store, _) = DraftStore::open(Arc::new(MemoryStore::new()), limits)
            .await
            .unwrap();
        WorkExperienceStep::new(Arc::new(store))
    }

    fn filled(company: &str) -> ExperienceEditor {
        ExperienceEditor {
            editing: None,
            experience: Experience {
                company: company.into(),
                position: "Engineer".into(),
                start_date: "2020-01".into(),
                end_date: Some("2022-06".into()),
                is_current: false,
                description: String::new(),
            },
        }
    }

    #[tokio::test]
    async fn current_job_saved_without_end_date() {
        let step = step_with_limit(10).await;
        let mut editor = filled("Acme");
        editor.experience.is_current = true;
        // end_date left set on purpose; save must drop it
        let id = step.save(&editor).await.unwrap();

        let items = step.items().await;
        assert_eq!(items[0].id, id);
        assert!(items[0].experience.end_date.is_none());
        assert_eq!(items[0].date_range, "Jan 2020 - Present");
    }

    #[tokio::test]
    async fn invalid_editor_not_saved() {
        let step = step_with_limit(10).await;
        let mut editor = filled("A");
        editor.experience.end_date = None;
        let err = step.save(&editor).await.unwrap_err();
        let EditorError::Invalid(report) = err else {
            panic!("expected validation failure");
        };
        assert!(report.error("company").is_some());
        assert_eq!(report.error("endDate"), Some("End date is required"));
        assert!(step.items().await.is_empty());
        assert!(!step.can_advance().await);
    }

    #[tokio::test]
    async fn edit_updates_in_place() {
        let step = step_with_limit(10).await;
        step.save(&filled("Acme")).await.unwrap();
        let second = step.save(&filled("Globex")).await.unwrap();

        let mut editor = step.open_edit(second).await.unwrap();
        editor.experience.position = "Director".into();
        step.save(&editor).await.unwrap();

        let items = step.items().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].experience.position, "Director");
        assert!(step.can_advance().await);
    }

    #[tokio::test]
    async fn add_disabled_at_cap() {
        let step = step_with_limit(2).await;
        step.save(&filled("Acme")).await.unwrap();
        step.save(&filled("Globex")).await.unwrap();
        assert!(!step.can_add().await);
        assert!(step.open_new().await.is_err());
        assert!(matches!(
            step.save(&filled("Initech")).await,
            Err(EditorError::Draft(DraftError::LimitExceeded { max: 2, .. }))
        ));
    }

    #[tokio::test]
    async fn move_and_delete() {
        let step = step_with_limit(10).await;
        let a = step.save(&filled("Acme")).await.unwrap();
        step.save(&filled("Globex")).await.unwrap();
        step.save(&filled("Initech")).await.unwrap();

        step.move_entry(0, 2).await.unwrap();
        let names: Vec<_> = step
            .items()
            .await
            .into_iter()
            .map(|i| i.experience.company)
            .collect();
        assert_eq!(names, vec!["Globex", "Initech", "Acme"]);

        step.delete(a).await.unwrap();
        assert_eq!(step.items().await.len(), 2);
        assert!(step.delete(a).await.is_err());
    }

    #[test]
    fn checking_current_clears_end_date() {
        let mut editor = filled("Acme");
        editor.set_current(true);
        assert!(editor.experience.end_date.is_none());
        assert!(editor.report().is_valid());
    }
}
