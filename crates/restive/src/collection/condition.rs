use std::fmt;

use serde_json::Value;

use crate::error::{ModelError, Result};

/// The test given to `when` / `unless`.
///
/// Conditions built in code are either a boolean or a predicate over the
/// collection. Conditions that come from data (a flag in a payload or config
/// file) arrive as JSON and must hold a boolean.
pub enum Condition<'a, C> {
    Bool(bool),
    Predicate(Box<dyn Fn(&C) -> bool + 'a>),
    Dynamic(Value),
}

impl<'a, C> Condition<'a, C> {
    pub fn predicate(f: impl Fn(&C) -> bool + 'a) -> Self {
        Condition::Predicate(Box::new(f))
    }

    /// Evaluate against `target`. `method` names the caller in errors.
    pub(crate) fn resolve(&self, method: &'static str, target: &C) -> Result<bool> {
        match self {
            Condition::Bool(b) => Ok(*b),
            Condition::Predicate(f) => Ok(f(target)),
            Condition::Dynamic(Value::Bool(b)) => Ok(*b),
            Condition::Dynamic(other) => Err(ModelError::InvalidArgument {
                method,
                reason: format!("expected a boolean or a predicate, got `{other}`"),
            }),
        }
    }
}

impl<C> From<bool> for Condition<'_, C> {
    fn from(value: bool) -> Self {
        Condition::Bool(value)
    }
}

impl<C> From<Value> for Condition<'_, C> {
    fn from(value: Value) -> Self {
        Condition::Dynamic(value)
    }
}

impl<C> fmt::Debug for Condition<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
            Condition::Dynamic(v) => f.debug_tuple("Dynamic").field(v).finish(),
        }
    }
}
