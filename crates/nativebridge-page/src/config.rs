//! Page bridge configuration.
//!
//! [`PageBridgeConfig`] is a plain struct with no global state and no
//! environment-variable reads. The embedder builds it once and hands it to
//! the bridge, which makes the bridge easy to construct in tests with a
//! short sweep delay.

use std::time::Duration;

/// Runtime settings for the page-side bridge.
#[derive(Debug, Clone)]
pub struct PageBridgeConfig {
    /// How long a fallback registration may stay pending before the sweep
    /// removes it.
    ///
    /// The sweep is the safety net for sends whose completion signal never
    /// arrives: a message that was posted successfully but never reached
    /// or never finished processing on the host side would otherwise leave
    /// its callback in the registry forever.
    pub sweep_delay: Duration,
}

impl Default for PageBridgeConfig {
    /// Returns the stock configuration: a 3-second sweep delay.
    fn default() -> Self {
        Self {
            sweep_delay: Duration::from_millis(3000),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
