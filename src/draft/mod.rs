//! Draft state: the wizard's in-progress profile and its persistent store.

pub mod entries;
pub mod model;
pub mod store;

pub use entries::{EntryId, EntryKind, OrderedEntries};
pub use model::{Draft, Experience, PersonalInfo, Platform, SocialLink, format_month};
pub use store::{DraftLimits, DraftRestore, DraftStore};
