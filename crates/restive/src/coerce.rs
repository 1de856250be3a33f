//! Loose coercions over JSON values.
//!
//! API payloads are loosely typed: a flag may arrive as `true`, `"true"`, `1`
//! or `"1"`, a count as `42` or `"42"`. Casts and collection helpers share the
//! rules in this module so the same raw value always coerces the same way:
//!
//! - [`to_display_string`]: `null` → `"null"`, integral numbers without a
//!   fractional part, arrays joined with `,` (nulls inside arrays render empty),
//!   objects → `"[object Object]"`.
//! - [`to_number`]: `null` → 0, booleans → 0/1, strings trimmed and parsed
//!   (empty → 0, unparsable → NaN), arrays via their string form, objects → NaN.
//! - [`Truthy`]: `null`, `false`, `0`, NaN and `""` are falsy; everything else,
//!   including empty arrays and objects, is truthy.

use serde_json::Value;

/// Whether a value counts as "present" in conditional checks.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for &str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

macro_rules! truthy_int {
    ($($ty:ty),*) => {
        $(impl Truthy for $ty {
            fn is_truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

truthy_int!(i32, i64, u32, u64, usize);

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

/// Render a number the way API clients print it: `42`, not `42.0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (_, Some(u)) => u.to_string(),
            _ => format_number(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Array(_) => parse_number(&to_display_string(value)),
        Value::Object(_) => f64::NAN,
    }
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = |prefix: &str, radix: u32| {
        trimmed
            .strip_prefix(prefix)
            .map(|digits| {
                // from_str_radix tolerates a sign after the prefix
                if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                    return f64::NAN;
                }
                u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64)
            })
    };
    if let Some(n) = radix("0x", 16)
        .or_else(|| radix("0X", 16))
        .or_else(|| radix("0o", 8))
        .or_else(|| radix("0b", 2))
    {
        return n;
    }

    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that loose payload parsing must not.
        other if other.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => {
            f64::NAN
        }
        other => other.parse::<f64>().unwrap_or(f64::NAN),
    }
}
