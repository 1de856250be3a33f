//! Cast attribute values.
//!
//! Raw attribute storage is plain JSON. [`AttrValue`] is what callers see after
//! a cast has been applied: a native Rust value for the typed casts, the
//! untouched JSON for keys without a cast.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::coerce::Truthy;
use crate::collection::{Collection, Items};

/// Runtime representation of a read attribute.
///
/// Serializes untagged, so a model's JSON output looks like its raw input with
/// the casts applied.
///
/// Keys without a cast read as [`AttrValue::Json`], so an uncast string is
/// `Json(Value::String(..))` and never equals the `Text` built by
/// `AttrValue::from("..")`. To check a read against payload JSON regardless of
/// the cast, compare with the [`Value`] directly: `value == json!("Ada")`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `boolean` cast
    Bool(bool),

    /// `number` cast
    Number(f64),

    /// `string` cast
    Text(String),

    /// `collection` cast
    Collection(Collection<Value>),

    /// `datetime` cast
    DateTime(DateTime<Utc>),

    /// No cast: the raw stored value
    Json(Value),
}

impl AttrValue {
    /// The flag of a `boolean` cast.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The number of a `number` cast.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text of a `string` cast or custom caster.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The items of a `collection` cast.
    pub fn as_collection(&self) -> Option<&Collection<Value>> {
        match self {
            AttrValue::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// The instant of a `datetime` cast.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            AttrValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// The raw value of an uncast key.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            AttrValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, AttrValue::Collection(_))
    }

    /// Convert to plain JSON, e.g. for sending back to the API.
    ///
    /// Non-finite numbers have no JSON form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Number(n) => number_to_json(*n),
            AttrValue::Text(s) => Value::String(s.clone()),
            AttrValue::Collection(c) => Value::Array(c.to_vec()),
            AttrValue::DateTime(dt) => {
                Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            AttrValue::Json(v) => v.clone(),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl Truthy for AttrValue {
    fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Number(n) => n.is_truthy(),
            AttrValue::Text(s) => s.is_truthy(),
            AttrValue::Collection(_) | AttrValue::DateTime(_) => true,
            AttrValue::Json(v) => v.is_truthy(),
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Json(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

/// Builds a `string` cast output. Uncast reads are `Json`; compare those
/// against a [`Value`] instead.
impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Collection<Value>> for AttrValue {
    fn from(value: Collection<Value>) -> Self {
        AttrValue::Collection(value)
    }
}

impl PartialEq<Value> for AttrValue {
    fn eq(&self, other: &Value) -> bool {
        match self {
            AttrValue::Json(v) => v == other,
            cast => &cast.to_json() == other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn accessors_extract_matching_variant() {
        assert_eq!(AttrValue::Bool(true).as_bool(), Some(true));
        assert_eq!(AttrValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(AttrValue::from("x").as_text(), Some("x"));
        assert_eq!(AttrValue::from(json!(1)).as_json(), Some(&json!(1)));
        assert_eq!(AttrValue::Bool(true).as_text(), None);
    }

    #[test]
    fn integral_numbers_render_as_integers() {
        assert_eq!(AttrValue::Number(42.0).to_json(), json!(42));
        assert_eq!(AttrValue::Number(1.5).to_json(), json!(1.5));
        assert_eq!(AttrValue::Number(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn datetime_renders_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            AttrValue::DateTime(dt).to_json(),
            json!("2024-01-02T03:04:05Z")
        );
    }

    #[test]
    fn serializes_untagged() {
        let value = AttrValue::Collection(Collection::from(vec![json!(1), json!("a")]));
        assert_eq!(serde_json::to_value(&value).unwrap(), json!([1, "a"]));
        assert_eq!(serde_json::to_value(AttrValue::Bool(false)).unwrap(), json!(false));
    }

    #[test]
    fn compares_against_raw_json() {
        assert_eq!(AttrValue::Number(2.0), json!(2));
        assert_eq!(AttrValue::Json(json!({"a": 1})), json!({"a": 1}));
        assert_ne!(AttrValue::Text("2".into()), json!(2));

        let uncast = AttrValue::Json(json!("x"));
        assert_eq!(uncast, json!("x"));
        assert_eq!(AttrValue::from("x"), json!("x"));
        assert_ne!(AttrValue::from("x"), uncast);
    }

    #[test]
    fn truthiness_follows_payload_rules() {
        assert!(!AttrValue::Number(0.0).is_truthy());
        assert!(!AttrValue::Text(String::new()).is_truthy());
        assert!(AttrValue::Collection(Collection::new()).is_truthy());
        assert!(!AttrValue::Json(Value::Null).is_truthy());
    }
}
