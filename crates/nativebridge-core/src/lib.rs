//! # nativebridge-core
//!
//! Shared library for NativeBridge containing the payload envelope codec,
//! fallback-correlation key type, control-signal vocabulary, and the schema
//! validation seam.
//!
//! This crate is used by both the page-side and host-side bridge crates.
//! It has zero dependencies on async runtimes, webview APIs, or I/O.
//!
//! # Architecture overview (for beginners)
//!
//! NativeBridge connects a web page rendered inside an embedded browser view
//! to the native mobile application hosting it.  The two sides run in
//! separate script contexts with no shared memory; the only link between
//! them is a one-way, fire-and-forget text channel in each direction.
//!
//! This crate (`nativebridge-core`) is the shared foundation.  It defines:
//!
//! - **`envelope`** – How messages travel over the text channel.  A message
//!   is serialized to flat JSON text, optionally carrying a reserved
//!   `_fallbackKey` field that correlates it with a fallback callback
//!   registered on the sending side.
//!
//! - **`key`** – The [`FallbackKey`] correlation token: a timestamp plus a
//!   random suffix, unique in the probabilistic sense.
//!
//! - **`signal`** – The [`ControlSignal`] vocabulary the host sends back to
//!   the page to resolve a pending fallback registration (invoke it on
//!   failure, discard it on success).
//!
//! - **`schema`** – The [`MessageSchema`] trait: the seam through which an
//!   external validation engine is consumed.  The stock implementation
//!   delegates to `serde_json` deserialization.

// Declare the four top-level modules.  Rust will look for each in a file
// with the same name (e.g., src/envelope.rs).
pub mod envelope;
pub mod key;
pub mod schema;
pub mod signal;

// Re-export the most-used types at the crate root so callers can write
// `nativebridge_core::FallbackKey` instead of the full module path.
pub use envelope::{EnvelopeError, Payload, FALLBACK_KEY_FIELD};
pub use key::FallbackKey;
pub use schema::{MessageSchema, SchemaError, SerdeSchema};
pub use signal::{ControlSignal, SignalError};
