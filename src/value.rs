//! Hashable keys over JSON scalars.
//!
//! Joins and filters compare cells through [`ValueKey`] instead of
//! `serde_json::Value` directly. Two cells are equal when they have the same
//! kind and the same content: `"1"` never matches `1`, while numbers compare
//! by numeric value so `1` matches `1.0` (a spreadsheet round-trip turns
//! integers into floats).

use ordered_float::OrderedFloat;
use serde_json::Value;

/// Largest magnitude at which every integral `f64` is exactly representable.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

/// Equality / hashing key for a single cell value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i128),
    Float(OrderedFloat<f64>),
    Str(String),
    /// Arrays and objects, keyed by their compact JSON text.
    Composite(String),
}

impl From<&Value> for ValueKey {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ValueKey::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    ValueKey::Int(i128::from(u))
                } else {
                    let f = n.as_f64().unwrap_or(f64::NAN);
                    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64_INT {
                        ValueKey::Int(f as i128)
                    } else {
                        ValueKey::Float(OrderedFloat(f))
                    }
                }
            }
            Value::String(s) => ValueKey::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => ValueKey::Composite(v.to_string()),
        }
    }
}

/// Type-sensitive equality between two cells.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    ValueKey::from(a) == ValueKey::from(b)
}

/// Text used when a value names a file: strings verbatim, everything else
/// as compact JSON.
#[must_use]
pub fn value_file_stem(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
