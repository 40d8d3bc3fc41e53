//! Signal channel back to the page context.
//!
//! After the host finishes (or fails) to process a correlated message, the
//! outcome travels back as a [`ControlSignal`] over whatever mechanism the
//! embedding exposes.  The trait keeps that mechanism abstract so the host
//! bridge is testable with an in-memory channel.

use nativebridge_core::ControlSignal;
use thiserror::Error;

/// Failure modes when dispatching a completion signal.
///
/// Both are reported by the channel implementation; the bridge logs them
/// and moves on, since a lost signal is recovered by the page-side sweep.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The page context is not reachable (webview torn down, page
    /// navigated away).
    #[error("signal channel unavailable: {0}")]
    Unavailable(String),

    /// The channel exists but delivery failed.
    #[error("signal dispatch failed: {0}")]
    Dispatch(String),
}

/// Outbound path for completion signals.
///
/// # Examples
///
/// An in-memory channel for tests:
///
/// ```
/// use nativebridge_core::ControlSignal;
/// use nativebridge_host::{ChannelError, SignalChannel};
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct RecordingChannel {
///     signals: Mutex<Vec<ControlSignal>>,
/// }
///
/// impl SignalChannel for RecordingChannel {
///     fn send_signal(&self, signal: &ControlSignal) -> Result<(), ChannelError> {
///         self.signals.lock().unwrap().push(signal.clone());
///         Ok(())
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait SignalChannel: Send + Sync {
    /// Delivers one signal to the page context.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] when the page context is unreachable or
    /// delivery fails.
    fn send_signal(&self, signal: &ControlSignal) -> Result<(), ChannelError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
