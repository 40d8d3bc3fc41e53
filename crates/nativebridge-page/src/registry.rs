//! Instance-owned registry of pending fallback callbacks.
//!
//! The original design kept fallbacks in process-wide mutable state keyed by
//! generated strings.  Here the registry is an explicit object owned by the
//! bridge instance: its lifetime is the bridge's lifetime, and dropping the
//! bridge drops every pending registration with it.
//!
//! # Lifecycle of one entry
//!
//! ```text
//! Unregistered ──register──▶ Pending ──take (invoke)───▶ Invoked
//!                                    ──discard (success)▶ Discarded
//!                                    ──discard (sweep)──▶ Swept
//! ```
//!
//! All three right-hand states are terminal.  `take` and `discard` on an
//! absent key are no-ops, which is what makes late or duplicate completion
//! signals harmless.

use std::collections::HashMap;
use std::sync::Mutex;

use nativebridge_core::FallbackKey;
use tracing::debug;

/// A registered fallback: zero arguments, consumed on invocation.
pub type FallbackFn = Box<dyn FnOnce() + Send>;

/// Map of correlation keys to not-yet-resolved fallback callbacks.
///
/// A key being present means exactly one thing: the corresponding send is
/// pending and its fallback has been neither invoked, discarded, nor swept.
///
/// # Locking
///
/// All operations are single add/lookup/delete steps under a `std` mutex
/// with no user code run inside the critical section; the invoke path
/// removes the callback first and calls it only after the lock is released.
pub struct FallbackRegistry {
    entries: Mutex<HashMap<FallbackKey, FallbackFn>>,
}

impl FallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `fallback` under `key`.
    ///
    /// Keys are generated with enough randomness that collisions are not a
    /// practical concern; if one does occur, the older entry is replaced
    /// (and thereby leaks its callback without invoking it).
    pub fn register(&self, key: FallbackKey, fallback: FallbackFn) {
        let replaced = self.lock().insert(key.clone(), fallback);
        if replaced.is_some() {
            debug!("fallback key collision: replaced pending entry for {key}");
        }
    }

    /// Removes and returns the callback for `key`, if still pending.
    ///
    /// This is the only way a callback leaves the registry alive; the caller
    /// decides whether to run it.  Returns `None` if the key was never
    /// registered or was already resolved, which callers treat as a no-op.
    pub fn take(&self, key: &FallbackKey) -> Option<FallbackFn> {
        self.lock().remove(key)
    }

    /// Removes the entry for `key` without returning it.
    ///
    /// Used on the success path (the message was handled, the fallback is
    /// moot) and by the sweep.  Returns `true` if an entry was removed.
    pub fn discard(&self, key: &FallbackKey) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Returns `true` if `key` has a pending entry.
    pub fn contains(&self, key: &FallbackKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of pending registrations.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no registrations are pending.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Acquires the map, recovering from poisoning.
    ///
    /// Fallback callbacks run *outside* the lock, but a panic elsewhere in
    /// the owning thread can still poison it; a poisoned map is structurally
    /// intact, so later sends keep working.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<FallbackKey, FallbackFn>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for FallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
