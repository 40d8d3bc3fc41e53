//! Fallback correlation keys.
//!
//! A [`FallbackKey`] links a fallback callback registered on the page side
//! to the completion signal the host sends back after processing (or failing
//! to process) the corresponding message.  The key travels embedded in the
//! outgoing payload, so it must survive a round trip through flat JSON text.
//!
//! # Uniqueness
//!
//! Keys are derived from the current Unix timestamp plus a UUID v4 random
//! suffix.  Uniqueness is probabilistic, not guaranteed: two keys generated
//! in the same millisecond still differ with overwhelming probability, but
//! nothing enforces it.  The registry treats a (vanishingly unlikely)
//! collision as an overwrite of the older entry.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by all generated keys; makes them recognisable in logs.
const KEY_PREFIX: &str = "fb";

/// Correlation token linking a page-side fallback registration to a
/// host-side completion signal.
///
/// Serializes transparently as its inner string, so it can be embedded
/// directly in the reserved payload field and in control signals.
///
/// # Examples
///
/// ```rust
/// use nativebridge_core::FallbackKey;
///
/// let key = FallbackKey::generate();
/// assert!(key.as_str().starts_with("fb-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackKey(String);

impl FallbackKey {
    /// Creates a key from an existing string (e.g., one extracted from an
    /// inbound payload).  No shape validation is performed: the receiving
    /// side must tolerate keys it did not generate.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generates a fresh key: `fb-<unix-millis>-<uuid-v4>`.
    ///
    /// The timestamp makes keys roughly sortable by creation time (useful
    /// when reading logs); the UUID suffix provides the randomness.
    pub fn generate() -> Self {
        // A clock before the Unix epoch only happens on badly misconfigured
        // systems; fall back to 0 rather than panicking.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let suffix = Uuid::new_v4().simple();
        Self(format!("{KEY_PREFIX}-{millis}-{suffix}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FallbackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FallbackKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
