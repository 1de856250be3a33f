//! Attribute key casing.
//!
//! API payloads arrive in whatever convention the server speaks. Every key that
//! enters a model through bulk assignment is normalized to the model's
//! configured [`AttributeCasing`] first, so `first_name` and `firstName` address
//! the same attribute.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttributeCasing {
    #[default]
    Camel,
    Snake,
}

impl AttributeCasing {
    /// Convert `key` to this casing.
    pub fn apply(self, key: &str) -> String {
        match self {
            AttributeCasing::Camel => to_camel(key),
            AttributeCasing::Snake => to_snake(key),
        }
    }
}

pub fn to_camel(key: &str) -> String {
    key.to_case(Case::Camel)
}

pub fn to_snake(key: &str) -> String {
    key.to_case(Case::Snake)
}
