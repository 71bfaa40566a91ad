//! Response bodies returned by the analyze and run-stage endpoints.
//!
//! Both endpoints are loose about shapes: counters may arrive as numbers or
//! lists, and error collections as a list or a single value. The types here
//! accept every shape seen in practice and expose one rendering for each.
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A value rendered verbatim in a run summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    List(Vec<Value>),
    Number(serde_json::Number),
    Text(String),
    Other(Value),
}

impl SummaryValue {
    /// Count semantics used for "Value errors": a list counts its entries.
    pub fn count_display(&self) -> String {
        match self {
            SummaryValue::List(items) => items.len().to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::List(items) => {
                let joined: Vec<String> = items.iter().map(value_text).collect();
                f.write_str(&joined.join(", "))
            }
            SummaryValue::Number(n) => write!(f, "{n}"),
            SummaryValue::Text(s) => f.write_str(s),
            SummaryValue::Other(v) => f.write_str(&value_text(v)),
        }
    }
}

/// `errors` / `warnings`: usually a list of strings, occasionally one value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    List(Vec<Value>),
    Single(Value),
}

impl Messages {
    /// Entries when this is a non-empty list.
    pub fn non_empty_list(&self) -> Option<Vec<String>> {
        match self {
            Messages::List(items) if !items.is_empty() => {
                Some(items.iter().map(value_text).collect())
            }
            _ => None,
        }
    }

    /// Joined list, or the single value rendered as text. `None` when the
    /// single value carries nothing (null, false, 0, "").
    pub fn joined(&self) -> Option<String> {
        match self {
            Messages::List(items) => Some(
                items
                    .iter()
                    .map(value_text)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Messages::Single(value) => present_text(value),
        }
    }
}

/// Body of the run-stage endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RunResult {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(rename = "Value fallbacks", default)]
    pub value_fallbacks: Option<SummaryValue>,
    #[serde(rename = "Bound warnings", default)]
    pub bound_warnings: Option<SummaryValue>,
    #[serde(rename = "Value errors", default)]
    pub value_errors: Option<SummaryValue>,
    #[serde(rename = "Values ignored", default)]
    pub values_ignored: Option<SummaryValue>,
    #[serde(rename = "Values imported", default)]
    pub values_imported: Option<SummaryValue>,
    #[serde(rename = "Values missing", default)]
    pub values_missing: Option<SummaryValue>,
    #[serde(rename = "Values imputed", default)]
    pub values_imputed: Option<SummaryValue>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<SummaryValue>,
    #[serde(default)]
    pub errors: Option<Messages>,
    #[serde(default)]
    pub warnings: Option<Messages>,
}

impl RunResult {
    /// Entries for the warning banner: the first non-empty list among
    /// `errors` and `warnings`.
    pub fn warning_entries(&self) -> Option<Vec<String>> {
        self.errors
            .as_ref()
            .and_then(Messages::non_empty_list)
            .or_else(|| self.warnings.as_ref().and_then(Messages::non_empty_list))
    }

    /// Text of the danger banner for an unsuccessful run.
    pub fn failure_message(&self) -> String {
        self.errors
            .as_ref()
            .and_then(Messages::joined)
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// `{error|message|errors}` body returned alongside failures.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorPayload {
    /// Read the known fields out of any JSON value; non-objects yield an
    /// empty payload.
    pub fn from_json(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// `error`, then `message`, then the joined `errors` list.
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(present_text)
            .or_else(|| self.message.as_ref().and_then(present_text))
            .or_else(|| match &self.errors {
                Some(Value::Array(items)) if !items.is_empty() => Some(
                    items
                        .iter()
                        .map(value_text)
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                _ => None,
            })
    }
}

/// JSON truthiness: null, false, zero and "" are false.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(present_text(&value).is_some())
}

/// Strings render without quotes; everything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text of a value that carries something: not null, false, zero or "".
pub fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(value_text(other)),
    }
}
