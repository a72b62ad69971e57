use serde_json::Value;

use crate::error::{LastfmError, Result};

/// Parses a Last.fm response body.
///
/// Fails with a protocol error when the body is not JSON at all, and with
/// [`LastfmError::Api`] when it is Last.fm's error envelope.
pub(crate) fn decode(body: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| LastfmError::protocol("response body", e.to_string()))?;

    if let Some(code) = value.get("error").and_then(Value::as_i64) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Last.fm error")
            .to_string();
        return Err(LastfmError::Api { code, message });
    }

    Ok(value)
}

/// Reads `node` as text, defaulting to an empty string when it is missing or
/// not a string.
pub(crate) fn text(node: Option<&Value>) -> String {
    node.and_then(Value::as_str).unwrap_or_default().to_string()
}
