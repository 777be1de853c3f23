//! Strict decoding of the model's goal reply
//!
//! The reply must be a JSON object with a non-empty string `goal_name` and a
//! positive numeric `duration_minutes`. Anything else is rejected.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;

use super::error::InterpretError;

/// Upper bound on a single goal's duration (one year)
pub const MAX_DURATION_MINUTES: f64 = 525_600.0;

/// A validated goal extracted from free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalSpec {
    /// Goal name, trimmed and non-empty
    pub name: String,

    /// Requested duration, strictly positive
    pub duration: Duration,
}

impl GoalSpec {
    /// Duration in (possibly fractional) minutes
    pub fn minutes(&self) -> f64 {
        self.duration.as_secs_f64() / 60.0
    }

    /// Minutes formatted without a trailing `.0` for whole numbers
    pub fn minutes_display(&self) -> String {
        let minutes = self.minutes();
        if (minutes - minutes.round()).abs() < 1e-9 {
            format!("{}", minutes.round() as u64)
        } else {
            let s = format!("{:.2}", minutes);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}

/// Decode a model reply into a [`GoalSpec`]
pub fn parse_goal_response(body: &str) -> Result<GoalSpec, InterpretError> {
    debug!(body_len = body.len(), "parse_goal_response: called");
    let json = strip_code_fence(body);

    let value: Value = serde_json::from_str(json).map_err(|e| {
        debug!(error = %e, "parse_goal_response: not JSON");
        InterpretError::NotJson(e.to_string())
    })?;

    let object = match value {
        Value::Object(map) => map,
        other => {
            debug!("parse_goal_response: JSON is not an object");
            return Err(InterpretError::NotJson(format!("expected object, got {}", json_kind(&other))));
        }
    };

    let name = goal_name(&object)?;
    let duration = duration_minutes(&object)?;

    debug!(%name, ?duration, "parse_goal_response: parsed");
    Ok(GoalSpec { name, duration })
}

fn goal_name(object: &Map<String, Value>) -> Result<String, InterpretError> {
    const FIELD: &str = "goal_name";
    match object.get(FIELD) {
        None | Some(Value::Null) => Err(InterpretError::MissingField(FIELD)),
        Some(Value::String(s)) => {
            let name = s.trim();
            if name.is_empty() {
                Err(InterpretError::InvalidField {
                    field: FIELD,
                    reason: "empty name".to_string(),
                })
            } else {
                Ok(name.to_string())
            }
        }
        Some(other) => Err(InterpretError::InvalidField {
            field: FIELD,
            reason: format!("expected string, got {}", json_kind(other)),
        }),
    }
}

fn duration_minutes(object: &Map<String, Value>) -> Result<Duration, InterpretError> {
    const FIELD: &str = "duration_minutes";
    let minutes = match object.get(FIELD) {
        None | Some(Value::Null) => return Err(InterpretError::MissingField(FIELD)),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| InterpretError::InvalidField {
            field: FIELD,
            reason: format!("{} is not representable", n),
        })?,
        Some(other) => {
            return Err(InterpretError::InvalidField {
                field: FIELD,
                reason: format!("expected number, got {}", json_kind(other)),
            });
        }
    };

    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(InterpretError::InvalidField {
            field: FIELD,
            reason: format!("{} is not a positive duration", minutes),
        });
    }

    if minutes > MAX_DURATION_MINUTES {
        return Err(InterpretError::InvalidField {
            field: FIELD,
            reason: format!("{} exceeds the {} minute limit", minutes, MAX_DURATION_MINUTES),
        });
    }

    let millis = (minutes * 60_000.0).round() as u64;
    if millis == 0 {
        return Err(InterpretError::InvalidField {
            field: FIELD,
            reason: format!("{} rounds to zero", minutes),
        });
    }

    Ok(Duration::from_millis(millis))
}

/// Remove one surrounding Markdown code fence, if present
fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line
    match inner.find('\n') {
        Some(pos) => inner[pos + 1..].trim(),
        // Single line: the info string runs straight into the JSON
        None => inner.trim().trim_start_matches(|c: char| c.is_ascii_alphanumeric()).trim(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(n: u64) -> Duration {
        Duration::from_secs(n * 60)
    }

    #[test]
    fn test_parse_valid_reply() {
        let spec = parse_goal_response(r#"{"goal_name": "finish report", "duration_minutes": 45}"#).unwrap();
        assert_eq!(spec.name, "finish report");
        assert_eq!(spec.duration, minutes(45));
        assert_eq!(spec.minutes_display(), "45");
    }

    #[test]
    fn test_parse_fractional_minutes() {
        let spec = parse_goal_response(r#"{"goal_name": "tea", "duration_minutes": 2.5}"#).unwrap();
        assert_eq!(spec.duration, Duration::from_secs(150));
        assert_eq!(spec.minutes_display(), "2.5");
    }

    #[test]
    fn test_parse_trims_name_and_ignores_extra_keys() {
        let spec =
            parse_goal_response(r#"{"goal_name": "  get code to work ", "duration_minutes": 90, "note": "x"}"#)
                .unwrap();
        assert_eq!(spec.name, "get code to work");
        assert_eq!(spec.duration, minutes(90));
    }

    #[test]
    fn test_parse_code_fenced_reply() {
        let body = "```json\n{\"goal_name\": \"walk\", \"duration_minutes\": 20}\n```";
        let spec = parse_goal_response(body).unwrap();
        assert_eq!(spec.name, "walk");

        let body = "```{\"goal_name\": \"walk\", \"duration_minutes\": 20}```";
        assert!(parse_goal_response(body).is_ok());
    }

    #[test]
    fn test_parse_single_line_fence_with_language() {
        let body = "```json{\"goal_name\": \"walk\", \"duration_minutes\": 20}```";
        let spec = parse_goal_response(body).unwrap();
        assert_eq!(spec.name, "walk");
        assert_eq!(spec.duration, minutes(20));

        let body = "```JSON {\"goal_name\": \"stretch\", \"duration_minutes\": 5}```";
        assert_eq!(parse_goal_response(body).unwrap().name, "stretch");
    }

    #[test]
    fn test_not_json() {
        let err = parse_goal_response("Sure! Your goal is to finish the report.").unwrap_err();
        assert!(matches!(err, InterpretError::NotJson(_)));
        assert!(err.is_uninterpretable());

        let err = parse_goal_response("").unwrap_err();
        assert!(matches!(err, InterpretError::NotJson(_)));
    }

    #[test]
    fn test_json_but_not_object() {
        let err = parse_goal_response(r#"["finish report", 45]"#).unwrap_err();
        assert!(matches!(err, InterpretError::NotJson(_)));
    }

    #[test]
    fn test_missing_keys() {
        let err = parse_goal_response(r#"{"goal_name": null}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MissingField("goal_name")));

        let err = parse_goal_response(r#"{"goal_name": "nap"}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MissingField("duration_minutes")));

        let err = parse_goal_response(r#"{"duration_minutes": 10}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MissingField("goal_name")));
    }

    #[test]
    fn test_invalid_duration_values() {
        for body in [
            r#"{"goal_name": "nap", "duration_minutes": "30"}"#,
            r#"{"goal_name": "nap", "duration_minutes": "half an hour"}"#,
            r#"{"goal_name": "nap", "duration_minutes": 0}"#,
            r#"{"goal_name": "nap", "duration_minutes": -15}"#,
            r#"{"goal_name": "nap", "duration_minutes": true}"#,
            r#"{"goal_name": "nap", "duration_minutes": 1e12}"#,
            r#"{"goal_name": "nap", "duration_minutes": 1e-9}"#,
        ] {
            let err = parse_goal_response(body).unwrap_err();
            assert!(
                matches!(err, InterpretError::InvalidField { field: "duration_minutes", .. }),
                "{body} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_name_values() {
        for body in [
            r#"{"goal_name": "   ", "duration_minutes": 5}"#,
            r#"{"goal_name": 42, "duration_minutes": 5}"#,
            r#"{"goal_name": ["a"], "duration_minutes": 5}"#,
        ] {
            let err = parse_goal_response(body).unwrap_err();
            assert!(
                matches!(err, InterpretError::InvalidField { field: "goal_name", .. }),
                "{body} -> {err:?}"
            );
        }
    }
}
