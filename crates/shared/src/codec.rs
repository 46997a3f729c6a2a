//! JSON text codec for [`ClientMessage`](crate::protocol::ClientMessage)
//! and [`ServerMessage`](crate::protocol::ServerMessage)
//!
//! Decoding distinguishes three failure classes so receivers can log
//! them precisely: text that is not a JSON object with a `type` string,
//! a `type` outside the message family, and a known `type` whose
//! `content` does not fit the expected payload.

use crate::protocol::WireMessage;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while encoding or decoding wire messages
#[derive(Error, Debug)]
pub enum CodecError {
    /// Text is not valid JSON, or a message failed to serialize
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON value has no string `type` field
    #[error("message has no kind tag")]
    MissingKind,

    /// `type` is not part of the message family
    #[error("unknown message kind `{0}`")]
    UnknownKind(String),

    /// Known kind with a missing or ill-typed payload
    #[error("malformed `{kind}` payload: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Serialize a message into its wire text
pub fn encode<T: WireMessage>(msg: &T) -> CodecResult<String> {
    Ok(serde_json::to_string(msg)?)
}

/// Parse wire text into a message of family `T`
pub fn decode<T: WireMessage>(text: &str) -> CodecResult<T> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingKind)?
        .to_owned();

    if !T::KINDS.contains(&kind.as_str()) {
        return Err(CodecError::UnknownKind(kind));
    }

    serde_json::from_value(value).map_err(|source| CodecError::MalformedPayload { kind, source })
}
