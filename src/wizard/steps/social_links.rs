//! Step 3: social/contact links.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::StepController;
use crate::draft::{DraftStore, EntryId, EntryKind, Platform, SocialLink};
use crate::error::{DraftError, EditorError};
use crate::validation::{StepInput, ValidationReport, validate};
use crate::wizard::WizardStep;

/// Editing buffer for one link. The platform is fixed once the link exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkEditor {
    editing: Option<EntryId>,
    platform: Option<Platform>,
    pub url: String,
}

impl LinkEditor {
    pub fn editing(&self) -> Option<EntryId> {
        self.editing
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Pick a platform. Ignored (returns `false`) when editing an existing link.
    pub fn set_platform(&mut self, platform: Platform) -> bool {
        if self.editing.is_some() {
            return false;
        }
        self.platform = Some(platform);
        true
    }

    /// Hint for the URL field of the chosen platform.
    pub fn placeholder(&self) -> &'static str {
        self.platform
            .map(|p| p.placeholder())
            .unwrap_or("Enter URL or contact info")
    }

    pub fn report(&self) -> ValidationReport {
        validate(StepInput::SocialLink {
            platform: self.platform,
            url: self.url.trim(),
        })
    }
}

/// One entry of the platform picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformOption {
    pub platform: Platform,
    pub label: &'static str,
    /// Used by another link already.
    pub already_added: bool,
    pub selectable: bool,
}

/// One row of the link list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkItem {
    pub id: EntryId,
    pub link: SocialLink,
    pub display_url: String,
}

pub struct SocialLinksStep {
    store: Arc<DraftStore>,
}

impl SocialLinksStep {
    pub fn new(store: Arc<DraftStore>) -> Self {
        Self { store }
    }

    pub async fn items(&self) -> Vec<LinkItem> {
        self.store
            .social_links()
            .await
            .iter()
            .map(|(id, link)| LinkItem {
                id,
                link: link.clone(),
                display_url: link.display_url(),
            })
            .collect()
    }

    pub async fn can_add(&self) -> bool {
        self.store.social_links().await.len() < self.store.limits().max_social_links
    }

    /// Picker options for `editor`. When adding, platforms other links use
    /// are not selectable; when editing, only the link's own platform is.
    pub async fn available_platforms(&self, editor: &LinkEditor) -> Vec<PlatformOption> {
        let links = self.store.social_links().await;
        let used: HashSet<Platform> = links
            .iter()
            .filter(|(id, _)| Some(*id) != editor.editing)
            .map(|(_, link)| link.platform)
            .collect();

        Platform::ALL
            .into_iter()
            .map(|platform| {
                let already_added = used.contains(&platform);
                let selectable = match editor.editing {
                    Some(_) => editor.platform == Some(platform),
                    None => !already_added,
                };
                PlatformOption {
                    platform,
                    label: platform.label(),
                    already_added,
                    selectable,
                }
            })
            .collect()
    }

    pub async fn open_new(&self) -> Result<LinkEditor, DraftError> {
        if !self.can_add().await {
            return Err(DraftError::LimitExceeded {
                kind: EntryKind::SocialLink,
                max: self.store.limits().max_social_links,
            });
        }
        Ok(LinkEditor::default())
    }

    pub async fn open_edit(&self, id: EntryId) -> Result<LinkEditor, DraftError> {
        let links = self.store.social_links().await;
        let link = links.get(id).ok_or(DraftError::EntryNotFound {
            kind: EntryKind::SocialLink,
            id: id.to_string(),
        })?;
        Ok(LinkEditor {
            editing: Some(id),
            platform: Some(link.platform),
            url: link.url.clone(),
        })
    }

    /// Validate the editor and add or update the link.
    pub async fn save(&self, editor: &LinkEditor) -> Result<EntryId, EditorError> {
        let report = editor.report();
        let platform = match editor.platform {
            Some(platform) if report.is_valid() => platform,
            _ => return Err(EditorError::Invalid(report)),
        };
        let link = SocialLink::new(platform, editor.url.trim());
        match editor.editing {
            Some(id) => {
                self.store.update_social_link(id, link).await?;
                Ok(id)
            }
            None => Ok(self.store.add_social_link(link).await?),
        }
    }

    pub async fn delete(&self, id: EntryId) -> Result<(), DraftError> {
        self.store.delete_social_link(id).await.map(|_| ())
    }

    pub async fn move_entry(&self, from: usize, to: usize) -> Result<(), DraftError> {
        if from == to {
            return Ok(());
        }
        self.store.move_social_link(from, to).await
    }
}

#[async_trait]
impl StepController for SocialLinksStep {
    fn step(&self) -> WizardStep {
        WizardStep::SocialLinks
    }

    async fn can_advance(&self) -> bool {
        self.store.is_social_links_complete().await
    }
}
