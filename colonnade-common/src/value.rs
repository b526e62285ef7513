use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A scalar value carried by category rows, dynamic-series group values,
/// and column display names.
///
/// Hosts deliver display names and group values as arbitrary scalars,
/// including `null` and `false`, so the placeholder formatting rule lives
/// here rather than in the formatter.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Timestamp(NaiveDateTime),
    Str(String),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// The display label for this value, applying the standard placeholder
    /// rule: absent values render as `"(Blank)"`, booleans as `"True"` /
    /// `"False"`. Numeric and temporal values get their natural rendering;
    /// format-string-aware rendering goes through the formatter service.
    pub fn label(&self) -> String {
        match self {
            DataValue::Null => "(Blank)".to_string(),
            DataValue::Bool(true) => "True".to_string(),
            DataValue::Bool(false) => "False".to_string(),
            DataValue::Number(v) => format!("{}", v),
            DataValue::Timestamp(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            DataValue::Str(s) => s.clone(),
        }
    }

    /// Numeric position of this value on a scalar category axis.
    ///
    /// Timestamps are measured in milliseconds since the epoch so numeric
    /// and temporal axes share the same gap arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(v) => Some(*v),
            DataValue::Timestamp(t) => Some(t.and_utc().timestamp_millis() as f64),
            _ => None,
        }
    }

    pub fn timestamp_millis(&self) -> Option<i64> {
        match self {
            DataValue::Timestamp(t) => Some(t.and_utc().timestamp_millis()),
            _ => None,
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataValue::Null, DataValue::Null) => true,
            (DataValue::Bool(a), DataValue::Bool(b)) => a == b,
            (DataValue::Number(a), DataValue::Number(b)) => {
                OrderedFloat(*a) == OrderedFloat(*b)
            }
            (DataValue::Timestamp(a), DataValue::Timestamp(b)) => a == b,
            (DataValue::Str(a), DataValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DataValue {}

impl Hash for DataValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DataValue::Null => {}
            DataValue::Bool(b) => b.hash(state),
            DataValue::Number(v) => OrderedFloat(*v).hash(state),
            DataValue::Timestamp(t) => t.hash(state),
            DataValue::Str(s) => s.hash(state),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Str(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Str(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Number(value as f64)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<NaiveDateTime> for DataValue {
    fn from(value: NaiveDateTime) -> Self {
        DataValue::Timestamp(value)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}
