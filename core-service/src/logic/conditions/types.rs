//! Condition Types
//!
//! Data structures for the accident condition form.
//! No validation here - see `validate`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::schema::AccidentCondition;

// ============================================================================
// FIELD TYPE
// ============================================================================

/// Input control kind of a condition field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Select,
    Text,
    Number,
    Date,
    Time,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Select => "select",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Time => "time",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CONDITION VALUE
// ============================================================================

/// One form value: either a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl ConditionValue {
    /// Numeric view of the value.
    ///
    /// Text is trimmed and parsed; empty text coerces to 0, anything
    /// unparsable yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConditionValue::Number(n) => Some(*n),
            ConditionValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConditionValue::Text(s) => Some(s.as_str()),
            ConditionValue::Number(_) => None,
        }
    }

    /// Empty text. Numbers are never empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, ConditionValue::Text(s) if s.is_empty())
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Number(value as f64)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl std::fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// CONDITION VALUES
// ============================================================================

/// Form values keyed by condition id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionValues(BTreeMap<String, ConditionValue>);

impl ConditionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial form state: numbers start at 0, everything else empty
    pub fn blank_for(schema: &[AccidentCondition]) -> Self {
        let values = schema
            .iter()
            .map(|condition| {
                let value = if condition.field_type.is_numeric() {
                    ConditionValue::Number(0.0)
                } else {
                    ConditionValue::Text(String::new())
                };
                (condition.id.clone(), value)
            })
            .collect();
        Self(values)
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<ConditionValue>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&ConditionValue> {
        self.0.get(id)
    }

    /// Text value of a field, `None` when missing or numeric
    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(ConditionValue::as_text)
    }

    /// Numeric value of a field, `None` when missing or unparsable
    pub fn number(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(ConditionValue::as_number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConditionValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ConditionValues
where
    K: Into<String>,
    V: Into<ConditionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
