//! Host transport capabilities and environment probing.
//!
//! The embedding runtime exposes at most two ways for the page to hand a
//! serialized message to the native side:
//!
//! - a **bridge-style handler**, an object the container injects into the
//!   page context (the webview-SDK style), and
//! - a **direct handler**, the plain message-posting primitive of the
//!   surrounding window.
//!
//! Both reduce to the same operation: accept a flat text payload, fire and
//! forget.  [`MessageTransport`] captures that operation; [`HostEnvironment`]
//! captures the *probing*: which of the two handlers currently exists.
//! Keeping both behind traits is what lets the whole send path run in unit
//! tests with recording doubles instead of a real webview.

use std::sync::Arc;

/// A host-provided primitive that accepts one serialized text message.
///
/// Fire-and-forget: there is no return value and no delivery
/// acknowledgement.  A transport being *reachable* is the only "can
/// deliver" condition the page side can observe; whatever happens to the
/// text after `post_message` returns is out of scope.
#[cfg_attr(test, mockall::automock)]
pub trait MessageTransport: Send + Sync {
    /// Hands `text` to the host container.
    fn post_message(&self, text: &str);
}

/// Capability probe for the page's surrounding environment.
///
/// Each probe returns the transport if the corresponding handler currently
/// exists.  Probes are consulted on every send (and by
/// [`PageBridge::is_webview_environment`](crate::PageBridge::is_webview_environment)),
/// so an environment whose capabilities appear later (e.g. a handler
/// injected after page load) is picked up without re-constructing the
/// bridge.
pub trait HostEnvironment: Send + Sync {
    /// The container-injected bridge-style handler, if present.
    fn bridge_transport(&self) -> Option<Arc<dyn MessageTransport>>;

    /// The direct message-posting handler, if present.
    fn direct_transport(&self) -> Option<Arc<dyn MessageTransport>>;
}

/// A [`HostEnvironment`] with fixed capabilities.
///
/// Suitable for embedders whose handlers are known at bridge construction
/// time, and for tests.
///
/// # Examples
///
/// ```rust
/// use nativebridge_page::StaticEnvironment;
///
/// // A page running outside any webview: no transport at all.
/// let env = StaticEnvironment::none();
/// ```
#[derive(Clone, Default)]
pub struct StaticEnvironment {
    bridge: Option<Arc<dyn MessageTransport>>,
    direct: Option<Arc<dyn MessageTransport>>,
}

impl StaticEnvironment {
    /// An environment with no reachable transport.
    pub fn none() -> Self {
        Self::default()
    }

    /// An environment exposing only the bridge-style handler.
    pub fn with_bridge(transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            bridge: Some(transport),
            direct: None,
        }
    }

    /// An environment exposing only the direct handler.
    pub fn with_direct(transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            bridge: None,
            direct: Some(transport),
        }
    }

    /// An environment exposing both handlers.
    pub fn with_both(
        bridge: Arc<dyn MessageTransport>,
        direct: Arc<dyn MessageTransport>,
    ) -> Self {
        Self {
            bridge: Some(bridge),
            direct: Some(direct),
        }
    }
}

impl HostEnvironment for StaticEnvironment {
    fn bridge_transport(&self) -> Option<Arc<dyn MessageTransport>> {
        self.bridge.clone()
    }

    fn direct_transport(&self) -> Option<Arc<dyn MessageTransport>> {
        self.direct.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
