//! Per-key accessor overrides.
//!
//! A model definition can register, per attribute key:
//!
//! - a **getter**, applied to the raw value instead of the cast on read;
//! - a **setter**, which takes over the write entirely (it receives the store
//!   and decides what, if anything, to persist);
//! - a **member**, a computed value answered for keys that are not stored
//!   attributes (e.g. `fullName` built from `firstName` and `lastName`).
//!
//! Registration happens once, when the model is defined.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{AttrValue, AttributeStore};

pub type Getter = Arc<dyn Fn(&Value) -> AttrValue + Send + Sync>;
pub type Setter = Arc<dyn Fn(&mut AttributeStore, Value) + Send + Sync>;
pub type Member = Arc<dyn Fn(&AttributeStore) -> AttrValue + Send + Sync>;

#[derive(Clone, Default)]
pub struct Accessors {
    getters: HashMap<String, Getter>,
    setters: HashMap<String, Setter>,
    members: HashMap<String, Member>,
}

impl Accessors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn getter<F>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Value) -> AttrValue + Send + Sync + 'static,
    {
        self.getters.insert(key.into(), Arc::new(f));
        self
    }

    pub fn setter<F>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut AttributeStore, Value) + Send + Sync + 'static,
    {
        self.setters.insert(key.into(), Arc::new(f));
        self
    }

    pub fn member<F>(&mut self, key: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&AttributeStore) -> AttrValue + Send + Sync + 'static,
    {
        self.members.insert(key.into(), Arc::new(f));
        self
    }

    pub fn get_getter(&self, key: &str) -> Option<&Getter> {
        self.getters.get(key)
    }

    pub fn get_setter(&self, key: &str) -> Option<&Setter> {
        self.setters.get(key)
    }

    pub fn get_member(&self, key: &str) -> Option<&Member> {
        self.members.get(key)
    }
}

impl fmt::Debug for Accessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("getters", &sorted_keys(&self.getters))
            .field("setters", &sorted_keys(&self.setters))
            .field("members", &sorted_keys(&self.members))
            .finish()
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut keys: Vec<_> = map.keys().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registered_hooks_are_found_by_key() {
        let mut accessors = Accessors::new();
        accessors
            .getter("name", |raw| AttrValue::Text(raw.to_string()))
            .setter("email", |store, value| store.set("email", value))
            .member("initials", |_| AttrValue::from("AL"));

        assert!(accessors.get_getter("name").is_some());
        assert!(accessors.get_setter("email").is_some());
        assert!(accessors.get_member("initials").is_some());
        assert!(accessors.get_getter("email").is_none());
    }

    #[test]
    fn setter_receives_store() {
        let mut accessors = Accessors::new();
        accessors.setter("email", |store, value| {
            let lowered = value.as_str().map(str::to_lowercase).unwrap_or_default();
            store.set("email", Value::String(lowered));
        });

        let mut store = AttributeStore::new();
        let setter = accessors.get_setter("email").unwrap().clone();
        setter(&mut store, json!("ADA@EXAMPLE.COM"));
        assert_eq!(store.get("email"), Some(&json!("ada@example.com")));
    }

    #[test]
    fn debug_lists_registered_keys() {
        let mut accessors = Accessors::new();
        accessors.getter("b", |raw| raw.clone().into()).getter("a", |raw| raw.clone().into());
        let rendered = format!("{accessors:?}");
        assert!(rendered.contains("getters: [\"a\", \"b\"]"));
    }
}
