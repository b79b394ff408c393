//! Forgiving deserializers for hand-edited content.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// Read a scalar as text: strings as-is, numbers and booleans in their JSON
/// spelling, `null` as empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected text, found `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::text")]
        value: String,
    }

    fn probe(json: &str) -> Result<String, serde_json::Error> {
        serde_json::from_str::<Probe>(json).map(|p| p.value)
    }

    #[test]
    fn test_text_accepts_scalars() {
        assert_eq!(probe(r#"{"value": "x"}"#).unwrap(), "x");
        assert_eq!(probe(r#"{"value": 12.5}"#).unwrap(), "12.5");
        assert_eq!(probe(r#"{"value": true}"#).unwrap(), "true");
        assert_eq!(probe(r#"{"value": null}"#).unwrap(), "");
        assert_eq!(probe(r#"{}"#).unwrap(), "");
    }

    #[test]
    fn test_text_rejects_containers() {
        assert!(probe(r#"{"value": [1]}"#).is_err());
        assert!(probe(r#"{"value": {"a": 1}}"#).is_err());
    }
}
