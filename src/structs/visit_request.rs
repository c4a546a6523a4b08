use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Inbound visit payload. Every other field a client sends is derived server-side
/// and therefore ignored here.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    #[serde(default, deserialize_with = "scalar_as_string")]
    #[validate(required, custom(function = "not_blank"))]
    pub page_visited: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub ip_address: Option<String>, // Used when no X-Forwarded-For header is present
}

/// Reads strings as-is and numbers or booleans as their text. Objects and
/// arrays are rejected.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!("expected a text value, found {}", other))),
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
