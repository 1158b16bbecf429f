//! In-memory token list
//!
//! Entries live in an owned `Vec` with a name index beside it. Iteration is
//! newest-first, matching head insertion into a list.

use nativetoken_core::{Result, TokenEntry, TokenError};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Registered entries, indexed by process name
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    entries: Vec<TokenEntry>,
    index: HashMap<String, usize>,
}

impl TokenList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in file order. A later duplicate name replaces
    /// the earlier entry.
    pub fn from_entries(entries: impl IntoIterator<Item = TokenEntry>) -> Self {
        let mut list = Self::new();
        for entry in entries {
            if let Some(&slot) = list.index.get(&entry.process_name) {
                debug!("Duplicate record for {} shadows earlier one", entry.process_name);
                list.entries[slot] = entry;
            } else {
                list.push(entry);
            }
        }
        list
    }

    fn push(&mut self, entry: TokenEntry) {
        self.index
            .insert(entry.process_name.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Exact-match lookup
    pub fn find(&self, process_name: &str) -> Option<&TokenEntry> {
        self.index
            .get(process_name)
            .map(|&slot| &self.entries[slot])
    }

    /// Exact-match lookup for in-place mutation
    pub fn find_mut(&mut self, process_name: &str) -> Option<&mut TokenEntry> {
        match self.index.get(process_name) {
            Some(&slot) => self.entries.get_mut(slot),
            None => None,
        }
    }

    /// Insert a new entry; its process name must not be registered yet
    pub fn insert(&mut self, entry: TokenEntry) -> Result<()> {
        if self.index.contains_key(&entry.process_name) {
            return Err(TokenError::invalid_request(format!(
                "{} is already registered",
                entry.process_name
            )));
        }
        self.push(entry);
        Ok(())
    }

    /// Insert a new entry at `slot` in insertion order, as returned by
    /// [`TokenList::position`]. Slots past the end append.
    pub fn insert_at(&mut self, slot: usize, entry: TokenEntry) -> Result<()> {
        if self.index.contains_key(&entry.process_name) {
            return Err(TokenError::invalid_request(format!(
                "{} is already registered",
                entry.process_name
            )));
        }
        let slot = slot.min(self.entries.len());
        for position in self.index.values_mut() {
            if *position >= slot {
                *position += 1;
            }
        }
        self.index.insert(entry.process_name.clone(), slot);
        self.entries.insert(slot, entry);
        Ok(())
    }

    /// Insertion-order slot of `process_name`
    pub fn position(&self, process_name: &str) -> Option<usize> {
        self.index.get(process_name).copied()
    }

    /// Remove and return the entry for `process_name`
    pub fn remove(&mut self, process_name: &str) -> Option<TokenEntry> {
        let slot = self.index.remove(process_name)?;
        let removed = self.entries.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(removed)
    }

    /// Unique-id portions of every registered token
    pub fn unique_ids(&self) -> HashSet<u32> {
        self.entries
            .iter()
            .map(|entry| entry.token_id.unique_id())
            .collect()
    }

    /// Entries, most recently inserted first
    pub fn iter(&self) -> impl Iterator<Item = &TokenEntry> {
        self.entries.iter().rev()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nativetoken_core::{Apl, TokenId, TokenType};

    fn entry(name: &str, unique: u32) -> TokenEntry {
        TokenEntry {
            token_id: TokenId::new(unique, TokenType::Native, 1),
            apl: Apl::Normal,
            process_name: name.to_string(),
            dcaps: vec![],
            perms: vec![],
            acls: vec![],
        }
    }

    #[test]
    fn test_insert_and_find() {
        let mut list = TokenList::new();
        list.insert(entry("foo", 1)).unwrap();
        list.insert(entry("bar", 2)).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.find("foo").unwrap().token_id.unique_id(), 1);
        assert!(list.find("fo").is_none());
        assert!(list.find("FOO").is_none());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut list = TokenList::new();
        list.insert(entry("foo", 1)).unwrap();
        assert!(list.insert(entry("foo", 2)).is_err());
        assert_eq!(list.find("foo").unwrap().token_id.unique_id(), 1);
    }

    #[test]
    fn test_newest_first_iteration() {
        let mut list = TokenList::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            list.insert(entry(name, i as u32)).unwrap();
        }
        let names: Vec<_> = list.iter().map(|e| e.process_name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn test_later_duplicate_shadows() {
        let list = TokenList::from_entries([entry("foo", 1), entry("bar", 2), entry("foo", 3)]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.find("foo").unwrap().token_id.unique_id(), 3);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut list = TokenList::from_entries([entry("a", 1), entry("b", 2), entry("c", 3)]);
        assert_eq!(list.remove("a").unwrap().process_name, "a");
        assert!(list.remove("a").is_none());
        assert_eq!(list.find("b").unwrap().token_id.unique_id(), 2);
        assert_eq!(list.find("c").unwrap().token_id.unique_id(), 3);
        assert_eq!(list.unique_ids(), HashSet::from([2, 3]));
    }

    #[test]
    fn test_find_mut() {
        let mut list = TokenList::from_entries([entry("foo", 1)]);
        list.find_mut("foo").unwrap().apl = Apl::SystemCore;
        assert_eq!(list.find("foo").unwrap().apl, Apl::SystemCore);
    }

    #[test]
    fn test_insert_at_restores_order() {
        let mut list = TokenList::from_entries([entry("a", 1), entry("b", 2), entry("c", 3)]);
        let slot = list.position("b").unwrap();
        let removed = list.remove("b").unwrap();
        list.insert_at(slot, removed).unwrap();

        let names: Vec<_> = list.iter().map(|e| e.process_name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);
        assert_eq!(list.find("c").unwrap().token_id.unique_id(), 3);
        assert_eq!(list.position("a"), Some(0));
        assert!(list.insert_at(0, entry("a", 9)).is_err());

        list.insert_at(99, entry("d", 4)).unwrap();
        assert_eq!(list.position("d"), Some(3));
    }
}
