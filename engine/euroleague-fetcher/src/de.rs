//! Lenient field readers for provider JSON
//!
//! The provider mixes numbers, numeric strings and nulls for the same field
//! across endpoints and seasons. These readers accept all of them and turn
//! anything unreadable into `None`; the typed conversion decides whether a
//! missing value is acceptable.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from)
        .filter(|n| n.fract() == 0.0 && *n >= f64::from(i32::MIN) && *n <= f64::from(i32::MAX))
        .map(|n| n as i32))
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from))
}

/// Trimmed text; numbers are rendered as text, blanks become `None`
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_i32")]
        int: Option<i32>,
        #[serde(default, deserialize_with = "lenient_f64")]
        float: Option<f64>,
        #[serde(default, deserialize_with = "lenient_string")]
        text: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_in_every_shape() {
        assert_eq!(probe(r#"{"int": 5}"#).int, Some(5));
        assert_eq!(probe(r#"{"int": "12"}"#).int, Some(12));
        assert_eq!(probe(r#"{"int": " "}"#).int, None);
        assert_eq!(probe(r#"{"int": null}"#).int, None);
        assert_eq!(probe(r#"{"int": 2.5}"#).int, None);
        assert_eq!(probe(r#"{"int": 3.0}"#).int, Some(3));
        assert_eq!(probe(r#"{"float": "0.5"}"#).float, Some(0.5));
        assert_eq!(probe(r#"{"float": 1}"#).float, Some(1.0));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let p = probe("{}");
        assert!(p.int.is_none() && p.float.is_none() && p.text.is_none());
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(probe(r#"{"text": "P003733   "}"#).text.as_deref(), Some("P003733"));
        assert_eq!(probe(r#"{"text": "  "}"#).text, None);
        assert_eq!(probe(r#"{"text": 7}"#).text.as_deref(), Some("7"));
    }
}
