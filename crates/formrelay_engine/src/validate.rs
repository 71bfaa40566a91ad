use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;

use formrelay_core::ErrorPayload;
use relay_logging::relay_debug;

use crate::decode::decode_text;
use crate::SubmitError;

/// Pass 2xx responses through; turn anything else into
/// [`SubmitError::RequestFailed`] carrying the most useful message the body
/// offers, or `"<code> <reason>"` when it offers none.
pub async fn ok_or_fail(response: Response) -> Result<Response, SubmitError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let content_type = content_type_of(&response);
    let message = match response.bytes().await {
        Ok(body) => failure_message(&body, content_type.as_deref()),
        Err(err) => {
            relay_debug!("Failed to read error body for status {}: {}", status, err);
            None
        }
    }
    .unwrap_or_else(|| status_line(status));

    Err(SubmitError::RequestFailed {
        status: status.as_u16(),
        message,
    })
}

/// Message carried by an error body. JSON bodies use the
/// `error` > `message` > `errors` precedence and fall back to the compact
/// JSON text; other bodies use their decoded text.
pub fn failure_message(body: &[u8], content_type: Option<&str>) -> Option<String> {
    if is_json(content_type) {
        let value: Value = serde_json::from_slice(body).ok()?;
        let message = ErrorPayload::from_json(&value)
            .message()
            .unwrap_or_else(|| value.to_string());
        return Some(message);
    }

    let text = decode_text(body, content_type).ok()?;
    (!text.trim().is_empty()).then_some(text)
}

pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

pub(crate) fn content_type_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
