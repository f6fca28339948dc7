// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Decoding of payloads returned by the automation.
//!
//! Two entry paths exist:
//! - links carrying a percent-encoded `payload` query parameter, which degrade
//!   silently to "no text" on any failure;
//! - JSON pasted by the user, where parser errors are reported verbatim.

use percent_encoding::percent_decode_str;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::inbound::{InboundRecord, is_truthy, stringify};

/// Query parameter carrying the encoded payload.
pub const PAYLOAD_PARAM: &str = "payload";

/// Keys holding the display text, highest priority first.
const TEXT_KEYS: [&str; 2] = ["result", "text"];

/// Reasons a payload could not be turned into a record.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload is empty")]
    Empty,
    /// Parser detail including line and column.
    #[error("{0}")]
    Json(String),
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Percent-decode `raw`, treating `+` as a space. Invalid UTF-8 is replaced, never rejected.
pub fn percent_decode_plus(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Decode an encoded payload into an inbound record.
///
/// # Errors
///
/// Returns [`PayloadError::Empty`] for absent/empty input, [`PayloadError::Json`]
/// when the decoded text is not JSON, and [`PayloadError::NotAnObject`] for JSON
/// arrays and scalars.
#[allow(dead_code)]
pub fn decode_record(raw: Option<&str>) -> Result<InboundRecord, PayloadError> {
    match decode_value(raw)? {
        Value::Object(map) => Ok(InboundRecord::from_map(&map)),
        _ => Err(PayloadError::NotAnObject),
    }
}

/// Extract the display text from an encoded payload.
///
/// Checks `result` before `text`. Every failure maps to `None`.
///
/// # Examples
///
/// ```ignore
/// let text = extract_text(Some("%7B%22result%22%3A%22hi%22%7D"));
/// assert_eq!(text.as_deref(), Some("hi"));
/// assert_eq!(extract_text(Some("not json")), None);
/// ```
pub fn extract_text(raw: Option<&str>) -> Option<String> {
    match decode_value(raw) {
        Ok(value) => text_from_value(&value),
        Err(err) => {
            debug!(%err, "payload carries no usable text");
            None
        }
    }
}

/// Display text of an already parsed value; `None` for non-objects or missing keys.
pub fn text_from_value(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    TEXT_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| is_truthy(v))
        .map(stringify)
}

/// Pull the raw payload out of a link, or treat the input itself as the payload.
///
/// Absolute URLs yield their first `payload` query value (already query-decoded);
/// anything else is returned trimmed. Blank input yields `None`.
pub fn payload_from_link(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == PAYLOAD_PARAM)
            .map(|(_, value)| value.into_owned()),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Parse JSON pasted by the user without any percent-decoding.
pub fn parse_manual_json(input: &str) -> Result<Value, PayloadError> {
    serde_json::from_str(input).map_err(|err| PayloadError::Json(err.to_string()))
}

fn decode_value(raw: Option<&str>) -> Result<Value, PayloadError> {
    let raw = raw.filter(|r| !r.is_empty()).ok_or(PayloadError::Empty)?;
    let decoded = percent_decode_plus(raw);
    serde_json::from_str(&decoded).map_err(|err| PayloadError::Json(err.to_string()))
}
