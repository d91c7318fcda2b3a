//! Identity-keyed membership sets
//!
//! Teachers hold sections and sections hold students. Membership is keyed
//! by the member's persisted identity, so the same row can appear at most
//! once and members that were never saved are rejected.

use std::collections::BTreeMap;
use serde::{Serialize, Serializer};
use crate::{Error, Result};
use crate::record::Record;

/// A set of persisted records, keyed and ordered by identity
#[derive(Debug, Clone, PartialEq)]
pub struct Members<T> {
    inner: BTreeMap<i64, T>,
}

impl<T> Default for Members<T> {
    fn default() -> Self {
        Self { inner: BTreeMap::new() }
    }
}

impl<T: Record> Members<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. Returns `Ok(false)` if its identity is already present.
    ///
    /// Fails with `InvalidOperation` if the record has never been saved.
    pub fn insert(&mut self, record: T) -> Result<bool> {
        let id = record.id().ok_or_else(|| Error::unsaved(T::KIND, "link"))?;
        if self.inner.contains_key(&id) {
            return Ok(false);
        }
        self.inner.insert(id, record);
        Ok(true)
    }

    /// Remove the member with the given identity
    pub fn remove(&mut self, id: i64) -> Option<T> {
        self.inner.remove(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.inner.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.inner.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<T: Serialize> Serialize for Members<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.inner.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SqliteStore, Student};

    fn saved(store: &mut SqliteStore, name: &str) -> Student {
        let mut student = Student::new(name, 3.0);
        student.save(store).unwrap();
        student
    }

    #[test]
    fn test_insert_deduplicates_by_identity() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let ada = saved(&mut store, "Ada");
        let copy = Student::find_by_id(&mut store, ada.id().unwrap()).unwrap().unwrap();

        let mut members = Members::new();
        assert!(members.insert(ada).unwrap());
        assert!(!members.insert(copy).unwrap());
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn test_insert_rejects_unsaved() {
        let mut members = Members::new();
        let err = members.insert(Student::new("Nobody", 2.0)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidOperation);
        assert!(members.is_empty());
    }

    #[test]
    fn test_remove_and_ids() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut members = Members::new();
        for name in ["Ada", "Alan", "Barbara"] {
            members.insert(saved(&mut store, name)).unwrap();
        }

        let removed = members.remove(2).unwrap();
        assert_eq!(removed.name(), "Alan");
        assert!(members.remove(2).is_none());
        assert_eq!(members.ids().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_serializes_as_array() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut members = Members::new();
        members.insert(saved(&mut store, "Ada")).unwrap();

        let json = serde_json::to_value(&members).unwrap();
        assert_eq!(json[0]["name"], "Ada");
    }
}
