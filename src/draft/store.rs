//! DraftStore: the single authoritative, persisted container for wizard state.
//!
//! Every mutation updates the in-memory [`Draft`] and then writes a snapshot to
//! the backing [`KeyValueStore`] under [`keys::WIZARD_DRAFT`]. Snapshot writes
//! are best effort: a failed write is logged and the in-memory state stands.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::entries::{EntryId, EntryKind, OrderedEntries};
use super::model::{Draft, Experience, PersonalInfo, SocialLink};
use crate::error::{DraftError, StorageError};
use crate::store::{KeyValueStore, keys};
use crate::wizard::WizardStep;

/// Hard limits and expiry applied by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftLimits {
    pub max_social_links: usize,
    pub max_work_experiences: usize,
    pub draft_expiry: chrono::Duration,
}

impl Default for DraftLimits {
    fn default() -> Self {
        Self {
            max_social_links: 10,
            max_work_experiences: 10,
            draft_expiry: chrono::Duration::days(7),
        }
    }
}

/// What `DraftStore::open` found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftRestore {
    /// Nothing stored; starting empty.
    Fresh,
    /// A saved draft was loaded.
    Restored,
    /// A saved draft had passed its expiry and was discarded.
    Expired { expired_at: DateTime<Utc> },
    /// A saved snapshot could not be read and was discarded.
    Discarded { reason: String },
}

impl DraftRestore {
    /// Message to show the user, if the outcome warrants one.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::Expired { expired_at } => Some(format!(
                "Your saved draft expired on {} and was discarded.",
                expired_at.format("%Y-%m-%d")
            )),
            Self::Discarded { .. } => {
                Some("Your saved draft could not be restored and was discarded.".to_string())
            }
            Self::Fresh | Self::Restored => None,
        }
    }
}

/// Injectable draft container shared by the step controllers.
pub struct DraftStore {
    backend: Arc<dyn KeyValueStore>,
    limits: DraftLimits,
    draft: RwLock<Draft>,
}

impl DraftStore {
    /// Open the store, rehydrating from `backend` and applying the expiry policy.
    pub async fn open(
        backend: Arc<dyn KeyValueStore>,
        limits: DraftLimits,
    ) -> Result<(Self, DraftRestore), StorageError> {
        Self::open_at(backend, limits, Utc::now()).await
    }

    /// [`open`](Self::open) with an explicit clock reading.
    pub async fn open_at(
        backend: Arc<dyn KeyValueStore>,
        limits: DraftLimits,
        now: DateTime<Utc>,
    ) -> Result<(Self, DraftRestore), StorageError> {
        let (draft, outcome) = match backend.get(keys::WIZARD_DRAFT).await {
            Ok(None) => (Draft::default(), DraftRestore::Fresh),
            Ok(Some(value)) => match serde_json::from_value::<Draft>(value) {
                Ok(draft) if draft.is_expired_at(now) => {
                    // Expiry is only set alongside personal info, so it is present here.
                    let expired_at = draft.draft_expiry.unwrap_or(now);
                    (Draft::default(), DraftRestore::Expired { expired_at })
                }
                Ok(draft) => (draft, DraftRestore::Restored),
                Err(e) => (
                    Draft::default(),
                    DraftRestore::Discarded {
                        reason: e.to_string(),
                    },
                ),
            },
            Err(StorageError::Serialization(e)) => (
                Draft::default(),
                DraftRestore::Discarded {
                    reason: e.to_string(),
                },
            ),
            Err(e) => return Err(e),
        };

        match &outcome {
            DraftRestore::Fresh => debug!("No saved draft; starting fresh"),
            DraftRestore::Restored => info!(
                step = %draft.current_step,
                experiences = draft.work_experiences.len(),
                social_links = draft.social_links.len(),
                "Draft restored"
            ),
            DraftRestore::Expired { expired_at } => {
                info!(%expired_at, "Saved draft expired; discarding");
                backend.remove(keys::WIZARD_DRAFT).await?;
            }
            DraftRestore::Discarded { reason } => {
                warn!(%reason, "Saved draft unreadable; discarding");
                backend.remove(keys::WIZARD_DRAFT).await?;
            }
        }

        let store = Self {
            backend,
            limits,
            draft: RwLock::new(draft),
        };
        Ok((store, outcome))
    }

    pub fn limits(&self) -> DraftLimits {
        self.limits
    }

    /// Clone of the current draft.
    pub async fn snapshot(&self) -> Draft {
        self.draft.read().await.clone()
    }

    pub async fn current_step(&self) -> WizardStep {
        self.draft.read().await.current_step
    }

    pub async fn personal_info(&self) -> PersonalInfo {
        self.draft.read().await.personal_info.clone()
    }

    pub async fn work_experiences(&self) -> OrderedEntries<Experience> {
        self.draft.read().await.work_experiences.clone()
    }

    pub async fn social_links(&self) -> OrderedEntries<SocialLink> {
        self.draft.read().await.social_links.clone()
    }

    pub async fn avatar_url(&self) -> String {
        self.draft.read().await.avatar_url.clone()
    }

    // ── Mutations ───────────────────────────────────────────────────

    pub async fn set_current_step(&self, step: WizardStep) {
        let mut draft = self.draft.write().await;
        draft.current_step = step;
        self.persist(&draft).await;
    }

    /// Replace personal info wholesale and push the expiry out.
    pub async fn set_personal_info(&self, info: PersonalInfo) {
        let mut draft = self.draft.write().await;
        let now = Utc::now();
        draft.personal_info = info;
        draft.last_saved = Some(now);
        draft.draft_expiry = Some(now + self.limits.draft_expiry);
        self.persist(&draft).await;
    }

    pub async fn set_avatar_url(&self, url: impl Into<String>) {
        let mut draft = self.draft.write().await;
        draft.avatar_url = url.into();
        draft.last_saved = Some(Utc::now());
        self.persist(&draft).await;
    }

    // ── Work experiences ────────────────────────────────────────────

    /// Append an experience. Refused once the configured maximum is reached.
    pub async fn add_work_experience(&self, experience: Experience) -> Result<EntryId, DraftError> {
        let max = self.limits.max_work_experiences;
        self.mutate_list(EntryKind::WorkExperience, select_experiences, |list| {
            if list.len() >= max {
                return Err(DraftError::LimitExceeded {
                    kind: EntryKind::WorkExperience,
                    max,
                });
            }
            Ok(list.push(experience.normalized()))
        })
        .await
    }

    pub async fn update_work_experience(
        &self,
        id: EntryId,
        experience: Experience,
    ) -> Result<(), DraftError> {
        self.mutate_list(EntryKind::WorkExperience, select_experiences, |list| {
            replace_entry(list, EntryKind::WorkExperience, id, experience.normalized())
        })
        .await
    }

    pub async fn update_work_experience_at(
        &self,
        index: usize,
        experience: Experience,
    ) -> Result<(), DraftError> {
        let id = self.id_at(EntryKind::WorkExperience, index).await?;
        self.update_work_experience(id, experience).await
    }

    pub async fn delete_work_experience(&self, id: EntryId) -> Result<Experience, DraftError> {
        self.mutate_list(EntryKind::WorkExperience, select_experiences, |list| {
            remove_entry(list, EntryKind::WorkExperience, id)
        })
        .await
    }

    pub async fn delete_work_experience_at(&self, index: usize) -> Result<Experience, DraftError> {
        let id = self.id_at(EntryKind::WorkExperience, index).await?;
        self.delete_work_experience(id).await
    }

    /// Replace the display order with a permutation of the current ids.
    pub async fn reorder_work_experiences(&self, order: &[EntryId]) -> Result<(), DraftError> {
        self.mutate_list(EntryKind::WorkExperience, select_experiences, |list| {
            reorder_entries(list, EntryKind::WorkExperience, order)
        })
        .await
    }

    /// Drag-and-drop move: remove at `from`, insert at `to`.
    pub async fn move_work_experience(&self, from: usize, to: usize) -> Result<(), DraftError> {
        self.mutate_list(EntryKind::WorkExperience, select_experiences, |list| {
            move_entry(list, EntryKind::WorkExperience, from, to)
        })
        .await
    }

    // ── Social links ────────────────────────────────────────────────

    /// Append a link. Refused once the configured maximum is reached.
    pub async fn add_social_link(&self, link: SocialLink) -> Result<EntryId, DraftError> {
        let max = self.limits.max_social_links;
        self.mutate_list(EntryKind::SocialLink, select_social_links, |list| {
            if list.len() >= max {
                return Err(DraftError::LimitExceeded {
                    kind: EntryKind::SocialLink,
                    max,
                });
            }
            Ok(list.push(link))
        })
        .await
    }

    pub async fn update_social_link(&self, id: EntryId, link: SocialLink) -> Result<(), DraftError> {
        self.mutate_list(EntryKind::SocialLink, select_social_links, |list| {
            replace_entry(list, EntryKind::SocialLink, id, link)
        })
        .await
    }

    pub async fn update_social_link_at(
        &self,
        index: usize,
        link: SocialLink,
    ) -> Result<(), DraftError> {
        let id = self.id_at(EntryKind::SocialLink, index).await?;
        self.update_social_link(id, link).await
    }

    pub async fn delete_social_link(&self, id: EntryId) -> Result<SocialLink, DraftError> {
        self.mutate_list(EntryKind::SocialLink, select_social_links, |list| {
            remove_entry(list, EntryKind::SocialLink, id)
        })
        .await
    }

    pub async fn delete_social_link_at(&self, index: usize) -> Result<SocialLink, DraftError> {
        let id = self.id_at(EntryKind::SocialLink, index).await?;
        self.delete_social_link(id).await
    }

    pub async fn reorder_social_links(&self, order: &[EntryId]) -> Result<(), DraftError> {
        self.mutate_list(EntryKind::SocialLink, select_social_links, |list| {
            reorder_entries(list, EntryKind::SocialLink, order)
        })
        .await
    }

    pub async fn move_social_link(&self, from: usize, to: usize) -> Result<(), DraftError> {
        self.mutate_list(EntryKind::SocialLink, select_social_links, |list| {
            move_entry(list, EntryKind::SocialLink, from, to)
        })
        .await
    }

    /// Clear everything back to an empty draft on step 1 and drop the snapshot.
    pub async fn reset_wizard(&self) {
        let mut draft = self.draft.write().await;
        *draft = Draft::default();
        if let Err(e) = self.backend.remove(keys::WIZARD_DRAFT).await {
            warn!("Failed to remove persisted draft: {}", e);
        }
        info!("Wizard draft reset");
    }

    // ── Derived queries ─────────────────────────────────────────────

    pub async fn is_personal_info_complete(&self) -> bool {
        self.draft.read().await.is_personal_info_complete()
    }

    pub async fn is_work_experience_complete(&self) -> bool {
        self.draft.read().await.is_work_experience_complete()
    }

    pub async fn is_social_links_complete(&self) -> bool {
        self.draft.read().await.is_social_links_complete()
    }

    pub async fn is_avatar_complete(&self) -> bool {
        self.draft.read().await.is_avatar_complete()
    }

    pub async fn has_required_data(&self) -> bool {
        self.draft.read().await.has_required_data()
    }

    // ── Internals ───────────────────────────────────────────────────

    async fn id_at(&self, kind: EntryKind, index: usize) -> Result<EntryId, DraftError> {
        let draft = self.draft.read().await;
        let (id, len) = match kind {
            EntryKind::WorkExperience => (
                draft.work_experiences.id_at(index),
                draft.work_experiences.len(),
            ),
            EntryKind::SocialLink => (draft.social_links.id_at(index), draft.social_links.len()),
        };
        id.ok_or(DraftError::IndexOutOfRange { kind, index, len })
    }

    /// Apply `op` to one of the draft's lists; persist only if it succeeded.
    async fn mutate_list<T, R>(
        &self,
        kind: EntryKind,
        select: fn(&mut Draft) -> &mut OrderedEntries<T>,
        op: impl FnOnce(&mut OrderedEntries<T>) -> Result<R, DraftError>,
    ) -> Result<R, DraftError> {
        let mut draft = self.draft.write().await;
        let result = op(select(&mut draft));
        match &result {
            Ok(_) => {
                draft.last_saved = Some(Utc::now());
                self.persist(&draft).await;
            }
            Err(e) => debug!(%kind, error = %e, "Draft list mutation refused"),
        }
        result
    }

    /// Write a snapshot of `draft` to the backend.
    async fn persist(&self, draft: &Draft) {
        let value = match serde_json::to_value(draft) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize wizard draft: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set(keys::WIZARD_DRAFT, &value).await {
            warn!("Failed to persist wizard draft: {}", e);
        } else {
            debug!(step = %draft.current_step, "Wizard draft persisted");
        }
    }
}

fn select_experiences(draft: &mut Draft) -> &mut OrderedEntries<Experience> {
    &mut draft.work_experiences
}

fn select_social_links(draft: &mut Draft) -> &mut OrderedEntries<SocialLink> {
    &mut draft.social_links
}

fn replace_entry<T>(
    list: &mut OrderedEntries<T>,
    kind: EntryKind,
    id: EntryId,
    entry: T,
) -> Result<(), DraftError> {
    if list.replace(id, entry) {
        Ok(())
    } else {
        Err(DraftError::EntryNotFound {
            kind,
            id: id.to_string(),
        })
    }
}

fn remove_entry<T>(list: &mut OrderedEntries<T>, kind: EntryKind, id: EntryId) -> Result<T, DraftError> {
    list.remove(id).ok_or_else(|| DraftError::EntryNotFound {
        kind,
        id: id.to_string(),
    })
}

fn reorder_entries<T>(
    list: &mut OrderedEntries<T>,
    kind: EntryKind,
    order: &[EntryId],
) -> Result<(), DraftError> {
    if list.reorder(order) {
        Ok(())
    } else {
        Err(DraftError::InvalidOrder { kind })
    }
}

fn move_entry<T>(
    list: &mut OrderedEntries<T>,
    kind: EntryKind,
    from: usize,
    to: usize,
) -> Result<(), DraftError> {
    let len = list.len();
    if list.move_entry(from, to) {
        Ok(())
    } else {
        Err(DraftError::IndexOutOfRange {
            kind,
            index: from.max(to),
            len,
        })
    }
}
