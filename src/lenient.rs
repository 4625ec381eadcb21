//! Forgiving decoders for numeric fields in operator commands.
//!
//! Browsers send numbers however the form produced them: `2`, `2.0`, `"2"`,
//! or `null` when a field was left blank (`JSON.stringify(NaN)`). All of
//! those are accepted; range handling is left to the command processor.
//! Text that is not a number, and non-scalar values, are still errors.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer field. Floats truncate toward zero, `null` reads as 0.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(0),
        Value::Number(number) => Ok(number.as_i64().unwrap_or_else(|| truncate(number.as_f64().unwrap_or(0.0)))),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            if let Ok(int) = text.parse::<i64>() {
                return Ok(int);
            }
            text.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(truncate)
                .ok_or_else(|| D::Error::custom(format!("expected a number, got {text:?}")))
        }
        other => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Opacity field. `null` and blank text read as NaN, which the scoreboard
/// stores as fully opaque.
pub fn opacity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(f64::NAN),
        Value::Number(number) => Ok(number.as_f64().unwrap_or(f64::NAN)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(f64::NAN);
            }
            text.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected a number, got {text:?}")))
        }
        other => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

// Saturates at the i64 bounds.
#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

#[cfg(test)]
#[path = "lenient_test.rs"]
mod tests;
