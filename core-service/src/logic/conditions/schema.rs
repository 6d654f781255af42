//! Condition Schema
//!
//! The fixed, ordered list of fields the prediction form collects.
//! Built once per process and never mutated.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::types::FieldType;

/// Condition ids
pub mod field {
    pub const WEATHER: &str = "weather";
    pub const TIME: &str = "time";
    pub const DATE: &str = "date";
    pub const LOCATION: &str = "location";
    pub const SPEED_LIMIT: &str = "speedLimit";
    pub const TRAFFIC_DENSITY: &str = "trafficDensity";
    pub const ROAD_CONDITION: &str = "roadCondition";
    pub const VISIBILITY_METERS: &str = "visibilityMeters";
}

/// Descriptor of one form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentCondition {
    /// Unique key, also the key in `ConditionValues`
    pub id: String,
    /// Display label
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Allowed values, present iff `field_type` is `Select`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl AccidentCondition {
    fn new(id: &str, name: &str, field_type: FieldType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            field_type,
            options: None,
            placeholder: None,
            required: true,
        }
    }

    fn select(id: &str, name: &str, options: &[&str]) -> Self {
        Self {
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            ..Self::new(id, name, FieldType::Select)
        }
    }

    /// Whether `value` is one of the allowed options (always true for non-select fields)
    pub fn allows(&self, value: &str) -> bool {
        match &self.options {
            Some(options) => options.iter().any(|o| o == value),
            None => true,
        }
    }
}

/// The accident condition form, in display order
pub static ACCIDENT_CONDITIONS: Lazy<Vec<AccidentCondition>> = Lazy::new(|| {
    vec![
        AccidentCondition::select(
            field::WEATHER,
            "Weather Condition",
            &["Clear", "Rain", "Snow", "Fog", "Sleet", "Hail"],
        ),
        AccidentCondition::new(field::TIME, "Time of Day", FieldType::Time),
        AccidentCondition::new(field::DATE, "Date", FieldType::Date),
        AccidentCondition::select(
            field::LOCATION,
            "Location Type",
            &["Highway", "Urban", "Rural", "Intersection", "Bridge", "Tunnel"],
        ),
        AccidentCondition::new(field::SPEED_LIMIT, "Speed Limit (mph)", FieldType::Number),
        AccidentCondition::select(
            field::TRAFFIC_DENSITY,
            "Traffic Density",
            &["Low", "Medium", "High"],
        ),
        AccidentCondition::select(
            field::ROAD_CONDITION,
            "Road Condition",
            &["Dry", "Wet", "Icy", "Snow Covered", "Under Construction"],
        ),
        AccidentCondition::new(
            field::VISIBILITY_METERS,
            "Visibility (meters)",
            FieldType::Number,
        ),
    ]
});

/// Look up a condition by id
pub fn find_condition(id: &str) -> Option<&'static AccidentCondition> {
    ACCIDENT_CONDITIONS.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_order_and_uniqueness() {
        let ids: Vec<&str> = ACCIDENT_CONDITIONS.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "weather",
                "time",
                "date",
                "location",
                "speedLimit",
                "trafficDensity",
                "roadCondition",
                "visibilityMeters",
            ]
        );

        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_options_present_iff_select() {
        for condition in ACCIDENT_CONDITIONS.iter() {
            assert_eq!(
                condition.options.is_some(),
                condition.field_type == FieldType::Select,
                "{}",
                condition.id
            );
            assert!(condition.required);
        }
    }

    #[test]
    fn test_serializes_type_key() {
        let json = serde_json::to_value(find_condition("speedLimit").unwrap()).unwrap();

        assert_eq!(json["type"], "number");
        assert_eq!(json["name"], "Speed Limit (mph)");
        assert!(json.get("options").is_none());
    }
}
