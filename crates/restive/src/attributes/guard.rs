//! Mass-assignment guarding.
//!
//! Bulk assignment (`fill`) only lets through keys the policy allows. The
//! policy is two lists, each of which may hold the wildcard `"*"`:
//!
//! - `fillable`: allow-list. Always wins over `guarded`.
//! - `guarded`: deny-list.
//!
//! The default policy allows nothing (`fillable = []`, `guarded = ["*"]`).
//! Single-key writes through `Model::set_attribute` are never checked here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const WILDCARD: &str = "*";

/// Initial policy supplied by a model definition.
///
/// `None` keeps the restrictive default for that list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPolicy {
    pub fillable: Option<Vec<String>>,
    pub guarded: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    fillable: Vec<String>,
    guarded: Vec<String>,
}

impl Default for Guard {
    fn default() -> Self {
        Self {
            fillable: Vec::new(),
            guarded: vec![WILDCARD.to_string()],
        }
    }
}

impl Guard {
    pub fn new(policy: GuardPolicy) -> Self {
        let mut guard = Self::default();
        if let Some(fillable) = policy.fillable {
            guard.fillable = fillable;
        }
        if let Some(guarded) = policy.guarded {
            guard.guarded = guarded;
        }
        guard
    }

    /// The allow-list.
    pub fn fillable(&self) -> &[String] {
        &self.fillable
    }

    /// The deny-list.
    pub fn guarded(&self) -> &[String] {
        &self.guarded
    }

    /// Replace the allow-list.
    pub fn set_fillable<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fillable = keys.into_iter().map(Into::into).collect();
    }

    /// Replace the deny-list.
    pub fn set_guarded<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guarded = keys.into_iter().map(Into::into).collect();
    }

    /// Append to the allow-list, skipping entries already present.
    pub fn merge_fillable<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        merge_into(&mut self.fillable, keys);
    }

    /// Append to the deny-list, skipping entries already present.
    pub fn merge_guarded<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        merge_into(&mut self.guarded, keys);
    }

    /// Whether `key` is allowed by name or by wildcard.
    pub fn is_fillable(&self, key: &str) -> bool {
        self.fillable.iter().any(|k| k == key || k == WILDCARD)
    }

    /// Whether bulk assignment drops `key`.
    pub fn is_guarded(&self, key: &str) -> bool {
        self.guarded.iter().any(|k| k == key || k == WILDCARD) && !self.is_fillable(key)
    }

    /// Drop every guarded key from `attrs`.
    ///
    /// A wildcard allow-list returns `attrs` untouched.
    pub fn fillable_from(&self, attrs: Map<String, Value>) -> Map<String, Value> {
        if self.fillable.iter().any(|k| k == WILDCARD) {
            return attrs;
        }

        attrs
            .into_iter()
            .filter(|(key, _)| {
                let guarded = self.is_guarded(key);
                if guarded {
                    tracing::debug!(key = %key, "dropping guarded attribute from bulk assignment");
                }
                !guarded
            })
            .collect()
    }
}

fn merge_into<I, S>(list: &mut Vec<String>, keys: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for key in keys {
        let key = key.into();
        if !list.contains(&key) {
            list.push(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn default_policy_guards_everything() {
        let guard = Guard::default();
        assert!(!guard.is_fillable("x"));
        assert!(guard.is_guarded("x"));
        assert!(guard.fillable_from(attrs(json!({"x": 1}))).is_empty());
    }

    #[test]
    fn fillable_overrides_guarded() {
        let mut guard = Guard::default();
        guard.set_guarded(["x", "*"]);
        guard.set_fillable(["x"]);
        assert!(guard.is_fillable("x"));
        assert!(!guard.is_guarded("x"));
        assert!(guard.is_guarded("y"));
    }

    #[test]
    fn wildcard_fillable_passes_everything() {
        let guard = Guard::new(GuardPolicy {
            fillable: Some(vec!["*".into()]),
            guarded: None,
        });
        let input = attrs(json!({"a": 1, "b": 2}));
        assert_eq!(guard.fillable_from(input.clone()), input);
    }

    #[test]
    fn filter_keeps_unguarded_keys_in_order() {
        let guard = Guard::new(GuardPolicy {
            fillable: None,
            guarded: Some(vec!["id".into()]),
        });
        let filtered = guard.fillable_from(attrs(json!({"name": "a", "id": 1, "email": "e"})));
        let keys: Vec<_> = filtered.keys().cloned().collect();
        assert_eq!(keys, vec!["name", "email"]);
    }

    #[test]
    fn policy_none_keeps_defaults() {
        let guard = Guard::new(GuardPolicy::default());
        assert_eq!(guard, Guard::default());
    }

    #[test]
    fn merge_appends_without_duplicates() {
        let mut guard = Guard::default();
        guard.merge_fillable(["a", "b"]);
        guard.merge_fillable(["b", "c"]);
        guard.merge_guarded(["*", "id"]);
        assert_eq!(guard.fillable(), ["a", "b", "c"]);
        assert_eq!(guard.guarded(), ["*", "id"]);
    }
}
