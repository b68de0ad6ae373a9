/// Field lookup and formatting helpers
use serde_json::Value;
use time::{format_description, OffsetDateTime};

use crate::models::Reading;

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format.
/// Falls back to the default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    match format_description::parse_borrowed::<2>("[day].[month].[year] - [hour]:[minute]:[second]") {
        Ok(format) => dt.format(&format).unwrap_or_else(|_| dt.to_string()),
        Err(_) => dt.to_string(),
    }
}

/// Look up a numeric field in a reading
///
/// Numbers are returned as-is; strings are accepted when they parse as a
/// finite number. Missing keys and every other JSON type yield `None`.
pub fn extract_field(reading: &Reading, field: &str) -> Option<f64> {
    match reading.get(field)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(value: Value) -> Reading {
        match value {
            Value::Object(map) => map,
            _ => panic!("test reading must be an object"),
        }
    }

    #[test]
    fn extracts_numbers() {
        let r = reading(json!({"tempf": 72.3, "humidity": 40}));
        assert_eq!(extract_field(&r, "tempf"), Some(72.3));
        assert_eq!(extract_field(&r, "humidity"), Some(40.0));
    }

    #[test]
    fn coerces_numeric_strings() {
        let r = reading(json!({"baromabsin": " 29.90 ", "uv": "high"}));
        assert_eq!(extract_field(&r, "baromabsin"), Some(29.90));
        assert_eq!(extract_field(&r, "uv"), None);
    }

    #[test]
    fn absent_for_missing_and_wrong_types() {
        let r = reading(json!({"a": null, "b": true, "c": [1], "d": {"x": 1}}));
        for field in ["a", "b", "c", "d", "nope"] {
            assert_eq!(extract_field(&r, field), None, "field {}", field);
        }
    }

    #[test]
    fn formats_timestamps() {
        let dt = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert_eq!(format_datetime(&dt), "01.01.1970 - 00:00:00");
    }
}
