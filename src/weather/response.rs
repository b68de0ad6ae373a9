use serde_json::Value;

use crate::error::PollError;
use crate::models::Reading;

/// Take the newest reading out of a device-data response body.
///
/// The API answers with an array of readings, newest first.
pub fn parse_latest_reading(body: &str) -> Result<Reading, PollError> {
    let value: Value = serde_json::from_str(body)?;

    let readings = match value {
        Value::Array(readings) => readings,
        _ => return Err(PollError::MalformedResponse("expected an array of readings")),
    };

    match readings.into_iter().next() {
        Some(Value::Object(reading)) => Ok(reading),
        Some(_) => Err(PollError::MalformedResponse("first reading is not an object")),
        None => Err(PollError::MalformedResponse("no readings in response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_element() {
        let reading = parse_latest_reading(r#"[{"tempf": 72.3}, {"tempf": 10.0}]"#).unwrap();
        assert_eq!(reading.get("tempf").and_then(Value::as_f64), Some(72.3));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_latest_reading("not json"),
            Err(PollError::InvalidJson(_))
        ));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for body in [r#"{"tempf": 1}"#, "[]", "[42]", r#"["x"]"#] {
            assert!(
                matches!(parse_latest_reading(body), Err(PollError::MalformedResponse(_))),
                "body {}",
                body
            );
        }
    }
}
