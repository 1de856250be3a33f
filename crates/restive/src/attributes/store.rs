//! Raw attribute storage and the Original Snapshot.
//!
//! The store holds two maps: the current raw attributes and the snapshot they
//! were last synced to. An attribute is *dirty* when its current raw value is
//! not deep-equal to its snapshot value. Absence from the map is the only
//! "deleted" state.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeStore {
    attributes: Map<String, Value>,
    original: Map<String, Value>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Write a raw value. No casting or guarding happens at this level.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.attributes.keys()
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn original(&self) -> &Map<String, Value> {
        &self.original
    }

    pub fn original_value(&self, key: &str) -> Option<&Value> {
        self.original.get(key)
    }

    /// Snapshot every current attribute.
    pub fn sync_all(&mut self) {
        self.original = self.attributes.clone();
        tracing::trace!(keys = self.original.len(), "synced original snapshot");
    }

    /// Re-snapshot `keys`, but only those the snapshot already knows about.
    ///
    /// A key that has never been synced is skipped even if it is set now; a
    /// synced key that has since been removed is dropped from the snapshot.
    pub fn sync_keys<S: AsRef<str>>(&mut self, keys: &[S]) {
        for key in keys {
            let key = key.as_ref();
            if !self.original.contains_key(key) {
                continue;
            }
            match self.attributes.get(key) {
                Some(value) => {
                    self.original.insert(key.to_string(), value.clone());
                }
                None => {
                    self.original.shift_remove(key);
                }
            }
        }
    }

    /// Keys whose current raw value differs from the snapshot, in attribute order.
    pub fn changed_keys(&self) -> Vec<&String> {
        self.attributes
            .iter()
            .filter(|(key, value)| self.original.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key)
            .collect()
    }

    pub fn is_changed(&self, key: &str) -> bool {
        match self.attributes.get(key) {
            Some(value) => self.original.get(key) != Some(value),
            None => false,
        }
    }
}
