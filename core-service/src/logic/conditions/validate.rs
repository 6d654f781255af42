//! Form Validation
//!
//! Checks `ConditionValues` against a schema before submission.
//! A required numeric field holding exactly 0 counts as unset, so a
//! genuine zero cannot be submitted for such a field.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::schema::AccidentCondition;
use super::types::{ConditionValue, ConditionValues, FieldType};

/// Per-field validation messages keyed by condition id, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<(String, String)>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for `id`; a new field goes after existing ones
    pub fn add(&mut self, id: impl Into<String>, message: impl Into<String>) {
        let (id, message) = (id.into(), message.into());
        match self.0.iter_mut().find(|(k, _)| *k == id) {
            Some(entry) => entry.1 = message,
            None => self.0.push((id, message)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Drop the message for one field (the user edited it)
    pub fn clear(&mut self, id: &str) {
        self.0.retain(|(k, _)| k != id);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Serialized as a JSON object, keys in form order
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, message) in &self.0 {
            map.serialize_entry(id, message)?;
        }
        map.end()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|(_, v)| v.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Validate all fields of `schema` in `values`
pub fn validate(
    schema: &[AccidentCondition],
    values: &ConditionValues,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for condition in schema {
        if let Some(message) = check_field(condition, values.get(&condition.id)) {
            errors.add(condition.id.clone(), message);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        log::debug!("Form rejected: {} invalid field(s)", errors.len());
        Err(errors)
    }
}

fn check_field(condition: &AccidentCondition, value: Option<&ConditionValue>) -> Option<String> {
    let Some(value) = value else {
        return condition
            .required
            .then(|| format!("{} is required", condition.name));
    };

    if condition.required && is_unset(condition.field_type, value) {
        return Some(format!("{} is required", condition.name));
    }

    match condition.field_type {
        FieldType::Number if value.as_number().is_none() => {
            Some(format!("{} must be a number", condition.name))
        }
        FieldType::Select => match value {
            ConditionValue::Text(s) if !s.is_empty() && !condition.allows(s) => Some(format!(
                "{} must be one of: {}",
                condition.name,
                condition.options.as_deref().unwrap_or_default().join(", ")
            )),
            _ => None,
        },
        _ => None,
    }
}

fn is_unset(field_type: FieldType, value: &ConditionValue) -> bool {
    if field_type.is_numeric() {
        value.as_number() == Some(0.0)
    } else {
        value.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::conditions::ACCIDENT_CONDITIONS;

    fn complete_form() -> ConditionValues {
        [
            ("weather", ConditionValue::from("Rain")),
            ("time", ConditionValue::from("09:23")),
            ("date", ConditionValue::from("2025-03-15")),
            ("location", ConditionValue::from("Urban")),
            ("speedLimit", ConditionValue::from(35.0)),
            ("trafficDensity", ConditionValue::from("Medium")),
            ("roadCondition", ConditionValue::from("Wet")),
            ("visibilityMeters", ConditionValue::from(500.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_complete_form_passes() {
        assert!(validate(&ACCIDENT_CONDITIONS, &complete_form()).is_ok());
    }

    #[test]
    fn test_blank_form_flags_every_field() {
        let blank = ConditionValues::blank_for(&ACCIDENT_CONDITIONS);
        let errors = validate(&ACCIDENT_CONDITIONS, &blank).unwrap_err();

        assert_eq!(errors.len(), ACCIDENT_CONDITIONS.len());
        assert_eq!(errors.get("weather"), Some("Weather Condition is required"));
    }

    #[test]
    fn test_messages_follow_form_order() {
        let blank = ConditionValues::blank_for(&ACCIDENT_CONDITIONS);
        let errors = validate(&ACCIDENT_CONDITIONS, &blank).unwrap_err();

        let ids: Vec<&str> = errors.iter().map(|(id, _)| id).collect();
        let expected: Vec<&str> = ACCIDENT_CONDITIONS.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, expected);

        let text = errors.to_string();
        assert!(text.starts_with("Weather Condition is required; Time of Day is required"));
        assert!(text.ends_with("Visibility (meters) is required"));
    }

    #[test]
    fn test_re_adding_a_field_keeps_its_position() {
        let mut errors = ValidationErrors::new();
        errors.add("weather", "first");
        errors.add("date", "Date is required");
        errors.add("weather", "second");

        let entries: Vec<(&str, &str)> = errors.iter().collect();
        assert_eq!(entries, vec![("weather", "second"), ("date", "Date is required")]);
    }

    #[test]
    fn test_required_numeric_zero_is_rejected() {
        let mut values = complete_form();
        values.insert("speedLimit", 0.0);

        let errors = validate(&ACCIDENT_CONDITIONS, &values).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("speedLimit"), Some("Speed Limit (mph) is required"));
    }

    #[test]
    fn test_required_numeric_nonzero_passes() {
        let mut values = complete_form();
        values.insert("visibilityMeters", 1.0);

        assert!(validate(&ACCIDENT_CONDITIONS, &values).is_ok());
    }

    #[test]
    fn test_missing_field_is_required() {
        let values: ConditionValues = complete_form()
            .iter()
            .filter(|(id, _)| id.as_str() != "date")
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect();

        let errors = validate(&ACCIDENT_CONDITIONS, &values).unwrap_err();
        assert_eq!(errors.get("date"), Some("Date is required"));
    }

    #[test]
    fn test_non_numeric_visibility_rejected() {
        let mut values = complete_form();
        values.insert("visibilityMeters", "far");

        let errors = validate(&ACCIDENT_CONDITIONS, &values).unwrap_err();
        assert_eq!(
            errors.get("visibilityMeters"),
            Some("Visibility (meters) must be a number")
        );
    }

    #[test]
    fn test_unknown_select_option_rejected() {
        let mut values = complete_form();
        values.insert("trafficDensity", "Gridlock");

        let errors = validate(&ACCIDENT_CONDITIONS, &values).unwrap_err();
        assert_eq!(
            errors.get("trafficDensity"),
            Some("Traffic Density must be one of: Low, Medium, High")
        );
    }

    #[test]
    fn test_errors_serialize_as_object() {
        let mut errors = ValidationErrors::new();
        errors.add("date", "Date is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["date"], "Date is required");

        errors.add("weather", "Weather Condition is required");
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"date":"Date is required","weather":"Weather Condition is required"}"#
        );
        errors.clear("weather");

        errors.clear("date");
        assert!(errors.is_empty());
    }
}
