//! Ordered, id-keyed entry collections for the draft's list steps.
//!
//! Entries live in a map keyed by a generated [`EntryId`]; display order is a
//! separate vector of ids. The two always hold exactly the same id set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Which draft list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    WorkExperience,
    SocialLink,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkExperience => write!(f, "work experience"),
            Self::SocialLink => write!(f, "social link"),
        }
    }
}

/// Map of entries plus their explicit display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEntries<T>")]
pub struct OrderedEntries<T> {
    by_id: BTreeMap<EntryId, T>,
    order: Vec<EntryId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntries<T> {
    by_id: BTreeMap<EntryId, T>,
    order: Vec<EntryId>,
}

impl<T> TryFrom<RawEntries<T>> for OrderedEntries<T> {
    type Error = String;

    fn try_from(raw: RawEntries<T>) -> Result<Self, Self::Error> {
        if !is_permutation(&raw.order, raw.by_id.keys().copied()) {
            return Err("entry order does not match stored entries".to_string());
        }
        Ok(Self {
            by_id: raw.by_id,
            order: raw.order,
        })
    }
}

impl<T> Default for OrderedEntries<T> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T> OrderedEntries<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    /// Id at a display position.
    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        self.order.get(index).copied()
    }

    /// Display position of an id.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    /// `(id, entry)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &T)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|entry| (*id, entry)))
    }

    /// Entries in display order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, entry)| entry)
    }

    /// Append an entry, returning its new id.
    pub fn push(&mut self, entry: T) -> EntryId {
        let id = EntryId::new();
        self.by_id.insert(id, entry);
        self.order.push(id);
        id
    }

    /// Replace an existing entry in place. Returns `false` if `id` is unknown.
    pub fn replace(&mut self, id: EntryId, entry: T) -> bool {
        match self.by_id.get_mut(&id) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let entry = self.by_id.remove(&id)?;
        self.order.retain(|candidate| *candidate != id);
        Some(entry)
    }

    /// Move the entry at `from` to `to`, shifting everything in between.
    ///
    /// Returns `false` (and changes nothing) if either index is out of range.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.order.len() || to >= self.order.len() {
            return false;
        }
        let id = self.order.remove(from);
        self.order.insert(to, id);
        true
    }

    /// Replace the display order. Must be a permutation of the current ids.
    pub fn reorder(&mut self, order: &[EntryId]) -> bool {
        if !is_permutation(order, self.by_id.keys().copied()) {
            return false;
        }
        self.order = order.to_vec();
        true
    }
}

impl<T> FromIterator<T> for OrderedEntries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut entries = Self::new();
        for entry in iter {
            entries.push(entry);
        }
        entries
    }
}

fn is_permutation(order: &[EntryId], ids: impl ExactSizeIterator<Item = EntryId>) -> bool {
    if order.len() != ids.len() {
        return false;
    }
    let mut expected: Vec<EntryId> = ids.collect();
    let mut given = order.to_vec();
    expected.sort();
    given.sort();
    expected == given
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> (OrderedEntries<&'static str>, Vec<EntryId>) {
        let mut entries = OrderedEntries::new();
        let ids = ["a", "b", "c", "d"]
            .into_iter()
            .map(|s| entries.push(s))
            .collect();
        (entries, ids)
    }

    fn values(entries: &OrderedEntries<&'static str>) -> Vec<&'static str> {
        entries.values().copied().collect()
    }

    #[test]
    fn push_keeps_insertion_order() {
        let (entries, ids) = letters();
        assert_eq!(values(&entries), vec!["a", "b", "c", "d"]);
        assert_eq!(entries.ids(), ids.as_slice());
        assert_eq!(entries.position(ids[2]), Some(2));
    }

    #[test]
    fn move_entry_is_array_move() {
        let (mut entries, _) = letters();

        assert!(entries.move_entry(0, 2));
        assert_eq!(values(&entries), vec!["b", "c", "a", "d"]);

        assert!(entries.move_entry(3, 0));
        assert_eq!(values(&entries), vec!["d", "b", "c", "a"]);

        assert!(!entries.move_entry(0, 4));
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn remove_drops_from_order() {
        let (mut entries, ids) = letters();
        assert_eq!(entries.remove(ids[1]), Some("b"));
        assert_eq!(values(&entries), vec!["a", "c", "d"]);
        assert!(entries.remove(ids[1]).is_none());
    }

    #[test]
    fn reorder_requires_permutation() {
        let (mut entries, ids) = letters();

        let reversed: Vec<_> = ids.iter().rev().copied().collect();
        assert!(entries.reorder(&reversed));
        assert_eq!(values(&entries), vec!["d", "c", "b", "a"]);

        // Missing an id
        assert!(!entries.reorder(&ids[..3]));
        // Duplicated id
        assert!(!entries.reorder(&[ids[0], ids[0], ids[1], ids[2]]));
        // Foreign id
        assert!(!entries.reorder(&[ids[0], ids[1], ids[2], EntryId::new()]));
        assert_eq!(values(&entries), vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn replace_keeps_position() {
        let (mut entries, ids) = letters();
        assert!(entries.replace(ids[2], "C"));
        assert_eq!(values(&entries), vec!["a", "b", "C", "d"]);
        assert!(!entries.replace(EntryId::new(), "x"));
    }

    #[test]
    fn serde_preserves_order() {
        let (mut entries, _) = letters();
        entries.move_entry(3, 0);
        let json = serde_json::to_value(&entries).unwrap();
        assert!(json.get("byId").is_some());
        let parsed: OrderedEntries<String> = serde_json::from_value(json).unwrap();
        let parsed_values: Vec<&str> = parsed.values().map(String::as_str).collect();
        assert_eq!(parsed_values, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn inconsistent_snapshot_rejected() {
        let id = EntryId::new();
        let mut by_id = serde_json::Map::new();
        by_id.insert(id.to_string(), serde_json::json!("a"));
        let json = serde_json::json!({
            "byId": by_id,
            "order": [id.to_string(), EntryId::new().to_string()],
        });
        assert!(serde_json::from_value::<OrderedEntries<String>>(json).is_err());
    }
}
