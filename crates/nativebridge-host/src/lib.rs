//! # nativebridge-host
//!
//! Receiver-side bridge for the host container: decodes text payloads
//! posted by the embedded page, validates them against the application
//! schema, and reports each outcome back over a [`SignalChannel`] so the
//! page can resolve its pending fallback.
//!
//! ## Architecture (for beginners)
//!
//! ```text
//!   page context                     host container
//!   ────────────                     ──────────────
//!   post_message(text)  ──────────▶  HostBridge::handle_message
//!                                      decode → validate → callback
//!   apply_signal        ◀──────────  SignalChannel::send_signal
//!                                      Discard on success, Invoke on failure
//! ```
//!
//! The bridge never returns errors to its caller. A malformed payload, a
//! validation failure, or a dead channel each produce a log line (and,
//! where a correlation key is available, a signal) and nothing else.

pub mod bridge;
pub mod channel;

pub use bridge::HostBridge;
pub use channel::{ChannelError, SignalChannel};
