//! Field values produced by record accessors.
//!
//! The engine never inspects a record type directly. Callers supply an
//! accessor closure mapping `(record, field name)` to a `FieldValue`, and
//! every stage (search text matching, sort comparison, filter values) works
//! on these dynamic values.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Dynamic value for a single record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric access - returns Int or Float values as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual representation used for substring search.
    ///
    /// `Null` renders as the empty string, so a null field never matches a
    /// non-empty query.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::String(v) => v.clone(),
            FieldValue::Bool(v) => v.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Total-order comparison used by the sort stage.
    ///
    /// Same-variant values compare directly; any two numeric values compare
    /// as f64. `Null` orders after every non-null value. Remaining
    /// mixed-type pairs compare by their debug rendering, which is
    /// unspecified but deterministic within a run.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => format!("{:?}", a).cmp(&format!("{:?}", b)),
            },
        }
    }

    /// Convert a JSON value into a field value.
    ///
    /// Arrays and objects have no scalar field representation and yield
    /// `None`; integral JSON numbers become `Int`, other numbers `Float`.
    pub fn from_json(value: &JsonValue) -> Option<FieldValue> {
        match value {
            JsonValue::Null => Some(FieldValue::Null),
            JsonValue::Bool(b) => Some(FieldValue::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::Int(i))
                } else {
                    n.as_f64().map(FieldValue::Float)
                }
            }
            JsonValue::String(s) => Some(FieldValue::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Int(v) => JsonValue::from(*v),
            FieldValue::Float(v) => JsonValue::from(*v),
            FieldValue::String(v) => JsonValue::from(v.clone()),
            FieldValue::Bool(v) => JsonValue::from(*v),
            FieldValue::Null => JsonValue::Null,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// Ready-made accessor for collections of `serde_json::Value` records.
///
/// Looks the field up on the top-level JSON object; missing fields and
/// non-object records yield `None`, which the engine treats as "does not
/// match" rather than an error.
///
/// # Examples
///
/// ```
/// use tableview::{json_accessor, FieldValue};
/// use serde_json::json;
///
/// let accessor = json_accessor();
/// let row = json!({"name": "Alice", "age": 30});
/// assert_eq!(accessor(&row, "name"), Some(FieldValue::String("Alice".to_string())));
/// assert_eq!(accessor(&row, "missing"), None);
/// ```
pub fn json_accessor() -> impl Fn(&JsonValue, &str) -> Option<FieldValue> {
    |record, field| record.get(field).and_then(FieldValue::from_json)
}
