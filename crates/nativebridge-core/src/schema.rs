//! Schema validation seam.
//!
//! The bridge treats validation as an external capability: something that
//! takes an untyped JSON value and either produces a typed message or
//! reports why it cannot.  Both sides of the bridge validate (the page
//! before sending, the host after parsing) and both consume the capability
//! through the [`MessageSchema`] trait so the engine is swappable.
//!
//! The stock implementation, [`SerdeSchema`], is a one-line delegation to
//! `serde_json::from_value`: the message type's `Deserialize` impl *is* the
//! schema.  Embedders with semantic rules beyond shape (value ranges,
//! cross-field constraints) implement the trait themselves.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors reported by a schema validation engine.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// The value does not conform to the schema.
    #[error("message failed schema validation: {0}")]
    Invalid(String),
}

/// A per-bridge-instance validation capability.
///
/// The bridge is generic over message shape; the schema supplies both the
/// concrete [`Message`](MessageSchema::Message) type and the judgement of
/// whether an untyped value conforms to it.
pub trait MessageSchema: Send + Sync + 'static {
    /// The typed message this schema accepts.
    type Message: Serialize + DeserializeOwned + Send + 'static;

    /// Validates `value`, producing the typed message on success.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Invalid`] when the value does not conform.
    fn validate(&self, value: &Value) -> Result<Self::Message, SchemaError>;
}

/// Schema backed purely by a message type's `Deserialize` implementation.
///
/// # Examples
///
/// ```rust
/// use nativebridge_core::{MessageSchema, SerdeSchema};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Ping { seq: u64 }
///
/// let schema = SerdeSchema::<Ping>::new();
/// assert!(schema.validate(&json!({"seq": 1})).is_ok());
/// assert!(schema.validate(&json!({"seq": "one"})).is_err());
/// ```
pub struct SerdeSchema<M> {
    _marker: PhantomData<fn() -> M>,
}

impl<M> SerdeSchema<M> {
    /// Creates the schema.  Stateless; `Default` works too.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<M> Default for SerdeSchema<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MessageSchema for SerdeSchema<M>
where
    M: Serialize + DeserializeOwned + Send + 'static,
{
    type Message = M;

    fn validate(&self, value: &Value) -> Result<M, SchemaError> {
        serde_json::from_value(value.clone()).map_err(|e| SchemaError::Invalid(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
