//! Payload envelope: the flat-text wire format between page and host.
//!
//! A message crosses the context boundary as a single JSON text string.
//! When the sender registered a fallback, the payload additionally carries
//! the correlation key in a reserved top-level field:
//!
//! ```json
//! {"type":"login","data":{"token":"abc123","userId":"user-123"},
//!  "_fallbackKey":"fb-1700000000000-9f8e..."}
//! ```
//!
//! The envelope is modelled explicitly as a two-variant enum rather than an
//! ad hoc optional property: a [`Payload`] is either `Plain` (no fallback
//! was requested) or `Correlated` (the receiver can signal completion back
//! to the originating registration).
//!
//! # Key extraction is tolerant
//!
//! On decode, a missing `_fallbackKey` field (or one that is not a string)
//! yields a `Plain` payload, never an error.  Only unparseable text fails.
//! A string key is *removed* from the message before it is handed to schema
//! validation, so schemas never need to account for the reserved field.

use serde_json::Value;
use thiserror::Error;

use crate::key::FallbackKey;

/// Reserved top-level field carrying the correlation key on the wire.
pub const FALLBACK_KEY_FIELD: &str = "_fallbackKey";

/// Errors that can occur while encoding or decoding a payload.
#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    /// The inbound text is not valid JSON.
    #[error("malformed payload text: {0}")]
    Malformed(String),

    /// The payload could not be serialized to text.
    #[error("payload serialization failed: {0}")]
    Serialize(String),

    /// A correlation key can only be embedded in a JSON object; the message
    /// serialized to some other JSON shape (array, string, number, ...).
    #[error("correlated message must be a JSON object")]
    NotAnObject,
}

/// A message as it travels over the text channel.
///
/// `Plain` carries just the schema-validated message value.  `Correlated`
/// additionally carries the [`FallbackKey`] under which the sender
/// registered a fallback callback, letting the receiver correlate a failure
/// (or a success) back to that registration.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A message sent without a fallback.
    Plain(Value),
    /// A message with a pending fallback registration on the sending side.
    Correlated {
        /// The message value, without the reserved key field.
        message: Value,
        /// Key of the sender-side fallback registration.
        fallback_key: FallbackKey,
    },
}

impl Payload {
    /// Wraps a message value with no correlation key.
    pub fn plain(message: Value) -> Self {
        Payload::Plain(message)
    }

    /// Wraps a message value together with a correlation key.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::NotAnObject`] if `message` is not a JSON
    /// object, since the reserved field has nowhere to live in any other shape.
    /// Callers check this *before* registering the fallback, so a rejected
    /// payload never leaves a dangling registration behind.
    pub fn correlated(message: Value, fallback_key: FallbackKey) -> Result<Self, EnvelopeError> {
        if !message.is_object() {
            return Err(EnvelopeError::NotAnObject);
        }
        Ok(Payload::Correlated {
            message,
            fallback_key,
        })
    }

    /// Serializes the payload to its flat text wire form.
    ///
    /// For `Correlated` payloads the reserved field is merged into a *copy*
    /// of the message object; the in-memory message value is not mutated.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Serialize`] if JSON serialization fails.
    pub fn encode(&self) -> Result<String, EnvelopeError> {
        match self {
            Payload::Plain(message) => {
                serde_json::to_string(message).map_err(|e| EnvelopeError::Serialize(e.to_string()))
            }
            Payload::Correlated {
                message,
                fallback_key,
            } => {
                let mut merged = message.clone();
                // `correlated()` guarantees the message is an object.
                if let Some(obj) = merged.as_object_mut() {
                    obj.insert(
                        FALLBACK_KEY_FIELD.to_string(),
                        Value::String(fallback_key.as_str().to_string()),
                    );
                }
                serde_json::to_string(&merged).map_err(|e| EnvelopeError::Serialize(e.to_string()))
            }
        }
    }

    /// Parses one payload from inbound wire text.
    ///
    /// Key extraction rules:
    ///
    /// - No `_fallbackKey` field → `Plain`.
    /// - `_fallbackKey` is a string → `Correlated`; the field is removed
    ///   from the message so schema validation never sees it.
    /// - `_fallbackKey` has any other shape → `Plain`, field left in place
    ///   (the message will most likely fail validation downstream, which is
    ///   the correct outcome for a malformed sender).
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Malformed`] if `text` is not valid JSON.
    /// This is the one failure from which no fallback can be recovered: the
    /// key itself is unreadable.
    pub fn decode(text: &str) -> Result<Self, EnvelopeError> {
        let mut value: Value =
            serde_json::from_str(text).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

        let key = match value.as_object_mut() {
            Some(obj) => match obj.get(FALLBACK_KEY_FIELD) {
                Some(Value::String(_)) => {
                    // Remove-and-take in one step; the match above proved it
                    // is a string.
                    match obj.remove(FALLBACK_KEY_FIELD) {
                        Some(Value::String(s)) => Some(FallbackKey::new(s)),
                        _ => None,
                    }
                }
                _ => None,
            },
            None => None,
        };

        Ok(match key {
            Some(fallback_key) => Payload::Correlated {
                message: value,
                fallback_key,
            },
            None => Payload::Plain(value),
        })
    }

    /// Returns the message value (without the reserved field).
    pub fn message(&self) -> &Value {
        match self {
            Payload::Plain(message) => message,
            Payload::Correlated { message, .. } => message,
        }
    }

    /// Returns the correlation key, if this payload carries one.
    pub fn fallback_key(&self) -> Option<&FallbackKey> {
        match self {
            Payload::Plain(_) => None,
            Payload::Correlated { fallback_key, .. } => Some(fallback_key),
        }
    }

    /// Decomposes the payload into its message value and optional key.
    pub fn into_parts(self) -> (Value, Option<FallbackKey>) {
        match self {
            Payload::Plain(message) => (message, None),
            Payload::Correlated {
                message,
                fallback_key,
            } => (message, Some(fallback_key)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
