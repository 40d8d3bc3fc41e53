//! nativebridge-page library crate.
//!
//! This crate provides the sender side of NativeBridge: the API surface
//! that runs inside the embedded page's script context and hands validated
//! messages to whichever host transport is reachable.
//!
//! # Architecture
//!
//! ```text
//! application code
//!         │  send_message(message, fallback?)
//!         ▼
//! [nativebridge-page]
//!   ├── registry/   Instance-owned fallback registry (key → callback)
//!   ├── transport/  Host capability probes (bridge-style / direct)
//!   ├── config/     Sweep delay configuration
//!   └── bridge/     PageBridge: validate → register → serialize → post
//!         │
//!         ▼  flat JSON text (nativebridge-core envelope)
//! host container (nativebridge-host)
//! ```
//!
//! The host resolves each correlated send by sending a
//! [`ControlSignal`](nativebridge_core::ControlSignal) back; the embedder
//! routes it to [`PageBridge::apply_signal`], which invokes or discards the
//! registered fallback against the local registry.

/// Sweep-delay configuration for the page bridge.
pub mod config;

/// Instance-owned registry of pending fallback callbacks.
pub mod registry;

/// Host transport capability seam and probing helpers.
pub mod transport;

/// The page-side bridge itself.
pub mod bridge;

pub use bridge::PageBridge;
pub use config::PageBridgeConfig;
pub use registry::{FallbackFn, FallbackRegistry};
pub use transport::{HostEnvironment, MessageTransport, StaticEnvironment};
