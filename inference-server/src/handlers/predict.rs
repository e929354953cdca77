//! Inference handler

use axum::{body::Bytes, extract::State, Json};
use fallwatch_core::{classify, Label, Reading};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult, INVALID_INPUT_MESSAGE};
use crate::state::{AppState, LatestSnapshot};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// 1 = fall, 0 = stable
    pub prediction: u8,
    pub label: Label,
    pub prob_fall: Option<f64>,
}

/// Classify one accelerometer reading.
///
/// The body is read leniently: anything that is not a JSON object counts as
/// `{}` and missing axes default to 0.0. A number too large for `f64` is
/// invalid input, not garbage. The model check comes first so a degraded
/// server answers 500 whatever the input.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> AppResult<Json<PredictResponse>> {
    let classifier = state.model.classifier()?;

    let fields = parse_body(&body)?;
    let reading = Reading::new(
        axis(&fields, "acc_x")?,
        axis(&fields, "acc_y")?,
        axis(&fields, "acc_z")?,
    );

    let prediction = classify(classifier.as_ref(), reading);
    tracing::debug!(
        "predict ({}, {}, {}) -> {} (p={:?})",
        reading.acc_x,
        reading.acc_y,
        reading.acc_z,
        prediction.label,
        prediction.prob_fall
    );

    if let Some(latest) = &state.latest {
        latest.replace(LatestSnapshot::new(reading, &prediction));
    }

    Ok(Json(PredictResponse {
        prediction: prediction.class(),
        label: prediction.label,
        prob_fall: prediction.prob_fall,
    }))
}

fn parse_body(body: &[u8]) -> AppResult<Map<String, Value>> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) if is_out_of_range(&e) => Err(invalid_input()),
        Err(_) => Ok(Map::new()),
    }
}

/// serde_json rejects literals beyond `f64` (e.g. `1e400`) while parsing;
/// the error carries no code, only this message.
fn is_out_of_range(error: &serde_json::Error) -> bool {
    error.is_syntax() && error.to_string().starts_with("number out of range")
}

fn invalid_input() -> AppError {
    AppError::InvalidInput(INVALID_INPUT_MESSAGE.to_string())
}

/// Numbers and numeric strings are accepted; null, booleans, containers and
/// non-finite values are not
fn axis(fields: &Map<String, Value>, key: &str) -> AppResult<f64> {
    let value = match fields.get(key) {
        None => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    value
        .filter(|v| v.is_finite())
        .ok_or_else(invalid_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_body_is_lenient() {
        assert!(parse_body(b"").unwrap().is_empty());
        assert!(parse_body(b"not json").unwrap().is_empty());
        assert!(parse_body(b"[1, 2, 3]").unwrap().is_empty());
        assert!(parse_body(br#"{"acc_x": 1"#).unwrap().is_empty());
        assert_eq!(parse_body(br#"{"acc_x": 1}"#).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_body_rejects_overflowing_numbers() {
        for body in [&br#"{"acc_x": 1e400, "acc_y": 4, "acc_z": 0}"#[..], br#"{"acc_z": -2e308}"#] {
            assert!(matches!(parse_body(body), Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_axis_accepts_numbers_and_numeric_strings() {
        let fields = object(json!({"acc_x": 1.5, "acc_y": " -2 ", "acc_z": 3}));

        assert_eq!(axis(&fields, "acc_x").unwrap(), 1.5);
        assert_eq!(axis(&fields, "acc_y").unwrap(), -2.0);
        assert_eq!(axis(&fields, "acc_z").unwrap(), 3.0);
        assert_eq!(axis(&fields, "missing").unwrap(), 0.0);
    }

    #[test]
    fn test_axis_rejects_non_numeric() {
        let fields = object(json!({
            "word": "abc",
            "null": null,
            "flag": true,
            "list": [1.0],
            "nan": "NaN",
            "inf": "inf"
        }));

        for key in ["word", "null", "flag", "list", "nan", "inf"] {
            assert!(
                matches!(axis(&fields, key), Err(AppError::InvalidInput(_))),
                "{} should be rejected",
                key
            );
        }
    }
}
