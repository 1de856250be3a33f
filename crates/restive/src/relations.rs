//! Relation capability.
//!
//! Relation resolution (endpoints, eager loading, nested models) lives outside
//! the attribute core. The core only needs to ask four questions of it, which
//! is what [`Relations`] describes. [`RelationSet`] is a plain in-memory
//! implementation: a list of declared names and a map of loaded values.

use std::collections::HashSet;

use serde_json::{Map, Value};

pub trait Relations {
    /// Whether the model declares a relation called `name`.
    fn relation_defined(&self, name: &str) -> bool;

    /// Whether a value has been registered for `name`.
    fn relation_loaded(&self, name: &str) -> bool;

    fn get_relation(&self, name: &str) -> Option<&Value>;

    fn add_relation(&mut self, name: &str, value: Value);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationSet {
    declared: HashSet<String>,
    loaded: Map<String, Value>,
}

impl RelationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, name: impl Into<String>) -> Self {
        self.declared.insert(name.into());
        self
    }

    pub fn loaded(&self) -> &Map<String, Value> {
        &self.loaded
    }
}

impl<S: Into<String>> FromIterator<S> for RelationSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            declared: iter.into_iter().map(Into::into).collect(),
            loaded: Map::new(),
        }
    }
}

impl Relations for RelationSet {
    fn relation_defined(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    fn relation_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    fn get_relation(&self, name: &str) -> Option<&Value> {
        self.loaded.get(name)
    }

    fn add_relation(&mut self, name: &str, value: Value) {
        tracing::debug!(relation = name, "relation registered");
        self.loaded.insert(name.to_string(), value);
    }
}
