//! Attribute casting.
//!
//! A model declares, per key, how a raw stored value should be presented on
//! read. Declarations are either one of the native kinds named by
//! [`CastKind`] or a [`CustomCaster`] object.
//!
//! Native declarations are free text (`"boolean"`, `" Number "`, `"dateTime"`)
//! and are resolved by trimming and lower-casing. Text that doesn't resolve to
//! a known kind is reported by [`Casts::cast_type`] but not by
//! [`Casts::has_cast`], so such keys read back uncast.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use super::AttrValue;
use crate::coerce::{to_display_string, to_number};
use crate::collection::Collection;
use crate::error::{ModelError, Result};

/// The fixed set of cast kinds the engine knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    Boolean,
    String,
    Number,
    Collection,
    DateTime,
    /// Delegates to a [`CustomCaster`].
    Class,
}

impl CastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CastKind::Boolean => "boolean",
            CastKind::String => "string",
            CastKind::Number => "number",
            CastKind::Collection => "collection",
            CastKind::DateTime => "datetime",
            CastKind::Class => "class",
        }
    }
}

impl FromStr for CastKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" => Ok(CastKind::Boolean),
            "string" => Ok(CastKind::String),
            "number" => Ok(CastKind::Number),
            "collection" => Ok(CastKind::Collection),
            "datetime" => Ok(CastKind::DateTime),
            "class" => Ok(CastKind::Class),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-defined cast.
///
/// `get` transforms the raw stored value on read. `set` observes each value
/// written to the key through `Model::set_attribute`; it cannot alter what is
/// stored.
pub trait CustomCaster: Send + Sync {
    fn get(&self, key: &str, raw: &Value) -> Result<AttrValue>;

    fn set(&self, key: &str, value: &Value);
}

/// A single cast declaration.
#[derive(Clone)]
pub enum Cast {
    Native(String),
    Custom(Arc<dyn CustomCaster>),
}

impl Cast {
    pub fn native(kind: impl Into<String>) -> Self {
        Cast::Native(kind.into())
    }

    pub fn custom(caster: impl CustomCaster + 'static) -> Self {
        Cast::Custom(Arc::new(caster))
    }
}

impl fmt::Debug for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cast::Native(kind) => f.debug_tuple("Native").field(kind).finish(),
            Cast::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for Cast {
    fn from(kind: &str) -> Self {
        Cast::Native(kind.to_string())
    }
}

impl From<CastKind> for Cast {
    fn from(kind: CastKind) -> Self {
        Cast::Native(kind.as_str().to_string())
    }
}

pub type CastMap = HashMap<String, Cast>;

/// Per-key cast registry and the coercion engine over it.
#[derive(Debug, Clone)]
pub struct Casts {
    owner: String,
    casts: CastMap,
}

impl Casts {
    /// `owner` names the model type in cast errors.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            casts: CastMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn casts(&self) -> &CastMap {
        &self.casts
    }

    /// Replace the registry with a copy of `casts`.
    ///
    /// Despite the name, earlier declarations are discarded rather than merged:
    /// `merge_casts({a})` followed by `merge_casts({b})` leaves only `b`.
    pub fn merge_casts(&mut self, casts: &CastMap) {
        self.casts = casts.clone();
    }

    pub fn set_cast(&mut self, key: impl Into<String>, cast: impl Into<Cast>) {
        self.casts.insert(key.into(), cast.into());
    }

    pub fn has_cast(&self, key: &str) -> bool {
        self.cast_type(key)
            .is_some_and(|kind| kind.parse::<CastKind>().is_ok())
    }

    /// Resolve the declared kind for `key`.
    ///
    /// Custom casters resolve to `"class"`; native declarations to their
    /// trimmed, lower-cased text, known or not.
    pub fn cast_type(&self, key: &str) -> Option<String> {
        self.casts.get(key).map(|cast| match cast {
            Cast::Custom(_) => CastKind::Class.as_str().to_string(),
            Cast::Native(kind) => kind.trim().to_lowercase(),
        })
    }

    /// Hand `value` to the custom caster declared for `key`, if any.
    pub fn offer(&self, key: &str, value: &Value) {
        if let Some(Cast::Custom(caster)) = self.casts.get(key) {
            caster.set(key, value);
        }
    }

    /// Present `raw` as declared for `key`. Keys without a cast pass through.
    pub fn cast_attribute(&self, key: &str, raw: &Value) -> Result<AttrValue> {
        if !self.has_cast(key) {
            return Ok(AttrValue::Json(raw.clone()));
        }

        let kind = self
            .cast_type(key)
            .and_then(|kind| kind.parse::<CastKind>().ok());

        match kind {
            Some(CastKind::Boolean) => self.cast_boolean(key, raw),
            Some(CastKind::Number) => {
                let number = to_number(raw);
                if number.is_nan() {
                    return Err(self.mismatch(key, CastKind::Number));
                }
                Ok(AttrValue::Number(number))
            }
            Some(CastKind::String) => Ok(AttrValue::Text(to_display_string(raw))),
            Some(CastKind::Collection) => match raw {
                Value::Array(items) => Ok(AttrValue::Collection(Collection::from(items.clone()))),
                _ => Err(self.mismatch(key, CastKind::Collection)),
            },
            Some(CastKind::DateTime) => self.cast_datetime(key, raw),
            Some(CastKind::Class) => match self.casts.get(key) {
                Some(Cast::Custom(caster)) => caster.get(key, raw),
                _ => Err(ModelError::InternalLogic(format!(
                    "{}: `{key}` resolves to a class cast without a caster object",
                    self.owner
                ))),
            },
            None => Err(ModelError::InternalLogic(format!(
                "{}: `{key}` reported a cast but its kind could not be dispatched",
                self.owner
            ))),
        }
    }

    fn cast_boolean(&self, key: &str, raw: &Value) -> Result<AttrValue> {
        match to_display_string(raw).to_lowercase().as_str() {
            "1" | "true" => Ok(AttrValue::Bool(true)),
            "0" | "false" => Ok(AttrValue::Bool(false)),
            _ => Err(self.mismatch(key, CastKind::Boolean)),
        }
    }

    fn cast_datetime(&self, key: &str, raw: &Value) -> Result<AttrValue> {
        let parsed = match raw {
            Value::String(text) => parse_datetime(text.trim()),
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        };
        parsed
            .map(AttrValue::DateTime)
            .ok_or_else(|| self.mismatch(key, CastKind::DateTime))
    }

    fn mismatch(&self, key: &str, kind: CastKind) -> ModelError {
        ModelError::type_mismatch(key, &self.owner, kind.as_str())
    }
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
