//! Control signals: how the host resolves a pending fallback registration.
//!
//! The host cannot reach into the page's script context to touch the
//! fallback registry directly; the only primitive the embedding runtime
//! offers is "deliver this text to the other side".  The original design
//! shipped a stringified snippet of executable code; here the round trip is
//! a small tagged value instead, and the page side interprets it against its
//! own local registry (see `PageBridge::apply_signal` in the page crate).
//!
//! # Wire form
//!
//! ```json
//! {"type":"Invoke","key":"fb-1700000000000-9f8e..."}
//! {"type":"Discard","key":"fb-1700000000000-9f8e..."}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute produces this automatically.
//! Channels that can carry structured values directly may skip the text
//! encoding entirely and pass the enum itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::FallbackKey;

/// Errors that can occur while decoding a control signal from text.
#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    /// The text is not a valid encoded signal.
    #[error("malformed control signal: {0}")]
    Malformed(String),
}

/// A completion signal sent from the host back to the page context.
///
/// Exactly one signal resolves each correlated message: `Invoke` on the
/// failure path (the message could not be processed, run the fallback),
/// `Discard` on the success path (the message was handled, drop the
/// fallback without running it).  A signal that arrives after its
/// registration was already resolved or swept is a no-op on the page side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlSignal {
    /// Look up the key, invoke the registered fallback, remove the entry.
    Invoke {
        /// Key of the registration to invoke.
        key: FallbackKey,
    },
    /// Look up the key and remove the entry without invoking it.
    Discard {
        /// Key of the registration to discard.
        key: FallbackKey,
    },
}

impl ControlSignal {
    /// Builds the failure-path signal for `key`.
    pub fn invoke(key: FallbackKey) -> Self {
        ControlSignal::Invoke { key }
    }

    /// Builds the success-path signal for `key`.
    pub fn discard(key: FallbackKey) -> Self {
        ControlSignal::Discard { key }
    }

    /// Returns the correlation key this signal targets.
    pub fn key(&self) -> &FallbackKey {
        match self {
            ControlSignal::Invoke { key } => key,
            ControlSignal::Discard { key } => key,
        }
    }

    /// Serializes the signal to its text wire form.
    ///
    /// Serialization of this enum cannot fail (two string-bearing variants),
    /// so the return type is a plain `String`.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parses a signal from its text wire form.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Malformed`] if the text is not a tagged
    /// signal object.
    pub fn decode(text: &str) -> Result<Self, SignalError> {
        serde_json::from_str(text).map_err(|e| SignalError::Malformed(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_signal_wire_form() {
        // Arrange
        let signal = ControlSignal::invoke(FallbackKey::new("fb-1-a"));

        // Act
        let text = signal.encode();

        // Assert
        assert_eq!(text, r#"{"type":"Invoke","key":"fb-1-a"}"#);
    }

    #[test]
    fn test_discard_signal_wire_form() {
        let signal = ControlSignal::discard(FallbackKey::new("fb-1-a"));
        assert_eq!(signal.encode(), r#"{"type":"Discard","key":"fb-1-a"}"#);
    }

    #[test]
    fn test_signal_round_trips_through_text() {
        // Arrange
        let original = ControlSignal::invoke(FallbackKey::generate());

        // Act
        let decoded = ControlSignal::decode(&original.encode()).unwrap();

        // Assert
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_key_accessor_covers_both_variants() {
        let key = FallbackKey::new("fb-2-b");
        assert_eq!(ControlSignal::invoke(key.clone()).key(), &key);
        assert_eq!(ControlSignal::discard(key.clone()).key(), &key);
    }

    #[test]
    fn test_decode_rejects_untagged_object() {
        let result = ControlSignal::decode(r#"{"key":"fb-1-a"}"#);
        assert!(matches!(result, Err(SignalError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let result = ControlSignal::decode(r#"{"type":"Explode","key":"fb-1-a"}"#);
        assert!(matches!(result, Err(SignalError::Malformed(_))));
    }
}
