//! The host-side bridge: decode, validate, process, signal.

use std::sync::Arc;

use tracing::{debug, warn};

use nativebridge_core::{ControlSignal, FallbackKey, MessageSchema, Payload};

use crate::channel::SignalChannel;

/// Receiver-side bridge running in the host container.
///
/// Decodes the text payloads posted by the page, validates them against the
/// schema, hands validated messages to the application, and reports the
/// outcome back over the signal channel so the page can resolve its
/// fallback registration.
pub struct HostBridge<S: MessageSchema> {
    schema: Arc<S>,
    channel: Option<Arc<dyn SignalChannel>>,
}

impl<S: MessageSchema> HostBridge<S> {
    /// Creates a bridge with no signal channel.
    ///
    /// Messages are still decoded, validated, and delivered; completion
    /// signals are silently skipped, leaving resolution to the page-side
    /// sweep.
    pub fn new(schema: Arc<S>) -> Self {
        Self {
            schema,
            channel: None,
        }
    }

    /// Creates a bridge that reports outcomes over `channel`.
    pub fn with_channel(schema: Arc<S>, channel: Arc<dyn SignalChannel>) -> Self {
        Self {
            schema,
            channel: Some(channel),
        }
    }

    /// Handles one raw text payload from the page.
    ///
    /// The pipeline:
    ///
    /// 1. Decode.  Unparsable text is logged and dropped; no key can be
    ///    extracted from it, so no signal is sent either way.
    /// 2. Validate the message (with the correlation key already stripped)
    ///    against the schema.  Failure: log, and if the payload carried a
    ///    key, dispatch `Invoke` so the page runs its fallback.
    /// 3. Success: run `callback` with the typed message, then dispatch
    ///    `Discard` for the carried key, if any.
    ///
    /// Never returns an error: every failure is local to the bridge and
    /// surfaces only as a log line plus, where possible, a signal.
    pub fn handle_message(&self, raw: &str, callback: impl FnOnce(S::Message)) {
        let payload = match Payload::decode(raw) {
            Ok(p) => p,
            Err(e) => {
                warn!("inbound payload rejected: {e}");
                return;
            }
        };

        let (message, key) = payload.into_parts();
        match self.schema.validate(&message) {
            Ok(typed) => {
                callback(typed);
                if let Some(key) = key {
                    self.dispatch(ControlSignal::discard(key));
                }
            }
            Err(e) => {
                warn!("inbound message failed schema validation: {e}");
                if let Some(key) = key {
                    self.dispatch(ControlSignal::invoke(key));
                }
            }
        }
    }

    /// Reports a processing failure for `key` after the message was
    /// already delivered.
    ///
    /// For applications whose handling is fallible beyond validation: a
    /// handler that accepted the message but failed to act on it can still
    /// route the page to its fallback.
    pub fn report_failure(&self, key: FallbackKey) {
        self.dispatch(ControlSignal::invoke(key));
    }

    fn dispatch(&self, signal: ControlSignal) {
        match &self.channel {
            Some(channel) => {
                if let Err(e) = channel.send_signal(&signal) {
                    warn!("completion signal not delivered: {e}");
                }
            }
            None => debug!("no signal channel configured; completion signal skipped"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
