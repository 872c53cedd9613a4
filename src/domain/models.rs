use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A customer record as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub status: bool,
    #[serde(default, deserialize_with = "deserialize_opaque_text")]
    pub created_at: String,
}

impl Customer {
    pub fn status_label(&self) -> &'static str {
        if self.status { "ACTIVE" } else { "INACTIVE" }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

/// The two user-editable fields of the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "E-mail",
        }
    }
}

/// Accepts an id sent either as a JSON string or a JSON number.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number for id")),
    }
}

/// Accepts a display-only text field that may be `null`, which reads as empty.
fn deserialize_opaque_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Null => Ok(String::new()),
        JsonValue::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// Maps any JSON value onto truthiness: `false`, `0`, `""` and `null` are
/// falsy, everything else is truthy.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
