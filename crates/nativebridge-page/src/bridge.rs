//! The page-side bridge: validate, register, serialize, post.
//!
//! [`PageBridge`] is the API surface application code in the embedded page
//! uses to talk to the host container.  One instance owns one fallback
//! registry; everything else it needs (the schema and the environment
//! probes) is injected, so the whole send path runs in unit tests without a
//! real webview.
//!
//! # Failure semantics
//!
//! Nothing on the send path propagates as an error to the caller.  The
//! observable outcomes are exactly three: the serialized message reaches a
//! transport, the supplied fallback runs, or a diagnostic is logged and the
//! message is dropped.  In particular, a message that fails *outgoing*
//! validation is logged and dropped without touching the fallback; only a
//! delivery or receiver-side failure triggers it.

use std::sync::Arc;

use tracing::{debug, error, warn};

use nativebridge_core::{ControlSignal, FallbackKey, MessageSchema, Payload};

use crate::config::PageBridgeConfig;
use crate::registry::{FallbackFn, FallbackRegistry};
use crate::transport::{HostEnvironment, MessageTransport};

/// Sender-side bridge running in the embedded page's context.
///
/// Generic over the schema `S`, which supplies both the typed message shape
/// and the validation judgement (see
/// [`MessageSchema`](nativebridge_core::MessageSchema)).
pub struct PageBridge<S: MessageSchema> {
    schema: Arc<S>,
    environment: Arc<dyn HostEnvironment>,
    registry: Arc<FallbackRegistry>,
    config: PageBridgeConfig,
}

impl<S: MessageSchema> PageBridge<S> {
    /// Creates a bridge with the default configuration (3-second sweep).
    pub fn new(schema: Arc<S>, environment: Arc<dyn HostEnvironment>) -> Self {
        Self::with_config(schema, environment, PageBridgeConfig::default())
    }

    /// Creates a bridge with an explicit configuration.
    pub fn with_config(
        schema: Arc<S>,
        environment: Arc<dyn HostEnvironment>,
        config: PageBridgeConfig,
    ) -> Self {
        Self {
            schema,
            environment,
            registry: Arc::new(FallbackRegistry::new()),
            config,
        }
    }

    /// Sends `message` to the host container, best-effort.
    ///
    /// The full pipeline:
    ///
    /// 1. Validate against the schema.  Failure: log and drop; the
    ///    fallback is **not** invoked for outgoing validation failures.
    /// 2. If `fallback` was supplied, generate a correlation key, register
    ///    the callback, and schedule the stale-entry sweep.
    /// 3. Probe the environment: the bridge-style handler first, then the
    ///    direct handler.  Serialize to text immediately before handing the
    ///    payload to whichever transport answered.
    /// 4. If no transport is reachable and a fallback was registered,
    ///    invoke it synchronously before returning and remove its entry.
    ///    The sweep is not needed for this case.
    ///
    /// Must be called from within a Tokio runtime for the sweep to be
    /// scheduled; without one, delivery still proceeds but stale
    /// registrations are only cleaned up by a completion signal.
    pub fn send_message(&self, message: &S::Message, fallback: Option<FallbackFn>) {
        // ── Step 1: Validate ──────────────────────────────────────────────
        let value = match serde_json::to_value(message) {
            Ok(v) => v,
            Err(e) => {
                warn!("outgoing message could not be serialized: {e}; dropped");
                return;
            }
        };
        if let Err(e) = self.schema.validate(&value) {
            warn!("outgoing message failed schema validation: {e}; dropped");
            return;
        }

        // ── Step 2: Register the fallback, if any ─────────────────────────
        //
        // The correlated payload is built *before* registering so that a
        // message which cannot carry a key (not a JSON object) never leaves
        // a dangling registration behind.
        let (payload, correlation) = match fallback {
            Some(callback) => {
                let key = FallbackKey::generate();
                match Payload::correlated(value, key.clone()) {
                    Ok(payload) => {
                        self.registry.register(key.clone(), callback);
                        self.schedule_sweep(key.clone());
                        (payload, Some(key))
                    }
                    Err(e) => {
                        warn!("cannot correlate fallback with message: {e}; dropped");
                        return;
                    }
                }
            }
            None => (Payload::plain(value), None),
        };

        // ── Step 3: Probe transports and post ─────────────────────────────
        match self.probe_transport() {
            Some(transport) => match payload.encode() {
                Ok(text) => transport.post_message(&text),
                Err(e) => {
                    // Unreachable for payloads that passed correlation, but
                    // a registration left behind here is reclaimed by the
                    // sweep rather than leaked.
                    error!("payload encoding failed: {e}; dropped");
                }
            },
            // ── Step 4: No transport — resolve the fallback now ───────────
            None => {
                debug!("no host transport reachable");
                if let Some(key) = correlation {
                    if let Some(callback) = self.registry.take(&key) {
                        debug!("invoking fallback {key}: message undeliverable");
                        callback();
                    }
                }
            }
        }
    }

    /// Returns `true` iff either host messaging capability is currently
    /// reachable.  Pure probe; no side effects.
    pub fn is_webview_environment(&self) -> bool {
        self.environment.bridge_transport().is_some()
            || self.environment.direct_transport().is_some()
    }

    /// Applies a completion signal from the host to the local registry.
    ///
    /// `Invoke` runs and removes the registered fallback; `Discard` removes
    /// it without running.  A signal whose key is unknown (already
    /// resolved, already swept, or never registered) is a no-op, which is
    /// what makes duplicate signals harmless.
    pub fn apply_signal(&self, signal: &ControlSignal) {
        match signal {
            ControlSignal::Invoke { key } => match self.registry.take(key) {
                Some(callback) => {
                    debug!("invoking fallback {key}: host reported failure");
                    callback();
                }
                None => debug!("invoke signal for unknown key {key}; ignored"),
            },
            ControlSignal::Discard { key } => {
                if self.registry.discard(key) {
                    debug!("discarded fallback {key}: host reported success");
                } else {
                    debug!("discard signal for unknown key {key}; ignored");
                }
            }
        }
    }

    /// Number of fallback registrations currently pending.
    pub fn pending_fallbacks(&self) -> usize {
        self.registry.len()
    }

    /// First reachable transport, honouring the probe order: the
    /// bridge-style handler wins over the direct handler.
    fn probe_transport(&self) -> Option<Arc<dyn MessageTransport>> {
        self.environment
            .bridge_transport()
            .or_else(|| self.environment.direct_transport())
    }

    /// Schedules the fixed-delay sweep that removes a stale registration.
    ///
    /// The task holds only the registry `Arc`, not the bridge, so a dropped
    /// bridge does not keep the sweep alive beyond the registry itself.
    fn schedule_sweep(&self, key: FallbackKey) {
        let registry = Arc::clone(&self.registry);
        let delay = self.config.sweep_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if registry.discard(&key) {
                        debug!("swept stale fallback registration {key}");
                    }
                });
            }
            Err(_) => {
                warn!("no async runtime; stale fallback {key} will not be swept");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
