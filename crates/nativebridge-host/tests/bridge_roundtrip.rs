//! End-to-end round trips between a page-side and a host-side bridge,
//! wired through in-memory transport and signal-channel doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nativebridge_core::{ControlSignal, MessageSchema, SchemaError, SerdeSchema};
use nativebridge_host::{ChannelError, HostBridge, SignalChannel};
use nativebridge_page::{
    FallbackFn, HostEnvironment, MessageTransport, PageBridge, StaticEnvironment,
};

// ── Test fixtures ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LoginMessage {
    #[serde(rename = "type")]
    message_type: String,
    data: LoginData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LoginData {
    token: String,
    #[serde(rename = "userId")]
    user_id: String,
}

fn login_message(token: &str) -> LoginMessage {
    LoginMessage {
        message_type: "login".to_string(),
        data: LoginData {
            token: token.to_string(),
            user_id: "user-123".to_string(),
        },
    }
}

/// Host-side schema stricter than the page's: structure must match *and*
/// the token must be non-empty.
struct StrictLoginSchema;

impl MessageSchema for StrictLoginSchema {
    type Message = LoginMessage;

    fn validate(&self, value: &Value) -> Result<LoginMessage, SchemaError> {
        let message: LoginMessage = serde_json::from_value(value.clone())
            .map_err(|e| SchemaError::Invalid(e.to_string()))?;
        if message.data.token.is_empty() {
            return Err(SchemaError::Invalid("empty token".to_string()));
        }
        Ok(message)
    }
}

type TestPageBridge = PageBridge<SerdeSchema<LoginMessage>>;

/// Signal channel that records every signal and routes it straight back
/// into the page bridge, optionally more than once to exercise duplicate
/// delivery.
#[derive(Default)]
struct LoopChannel {
    page: Mutex<Option<Arc<TestPageBridge>>>,
    sent: Mutex<Vec<ControlSignal>>,
    deliveries_per_signal: AtomicUsize,
}

impl LoopChannel {
    fn new(deliveries_per_signal: usize) -> Self {
        Self {
            page: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            deliveries_per_signal: AtomicUsize::new(deliveries_per_signal),
        }
    }

    fn connect(&self, page: Arc<TestPageBridge>) {
        *self.page.lock().unwrap() = Some(page);
    }

    fn sent(&self) -> Vec<ControlSignal> {
        self.sent.lock().unwrap().clone()
    }
}

impl SignalChannel for LoopChannel {
    fn send_signal(&self, signal: &ControlSignal) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(signal.clone());
        let page = self.page.lock().unwrap().clone();
        let page = page.ok_or_else(|| ChannelError::Unavailable("page not connected".into()))?;
        for _ in 0..self.deliveries_per_signal.load(Ordering::SeqCst) {
            page.apply_signal(signal);
        }
        Ok(())
    }
}

/// Transport that hands each posted payload straight to a host bridge and
/// records what the host's application callback received.
struct LoopTransport {
    host: HostBridge<StrictLoginSchema>,
    received: Mutex<Vec<LoginMessage>>,
}

impl MessageTransport for LoopTransport {
    fn post_message(&self, text: &str) {
        self.host.handle_message(text, |message| {
            self.received.lock().unwrap().push(message);
        });
    }
}

struct Harness {
    page: Arc<TestPageBridge>,
    transport: Arc<LoopTransport>,
    channel: Arc<LoopChannel>,
}

fn harness(deliveries_per_signal: usize) -> Harness {
    let channel = Arc::new(LoopChannel::new(deliveries_per_signal));
    let host = HostBridge::with_channel(
        Arc::new(StrictLoginSchema),
        channel.clone() as Arc<dyn SignalChannel>,
    );
    let transport = Arc::new(LoopTransport {
        host,
        received: Mutex::new(Vec::new()),
    });
    let environment: Arc<dyn HostEnvironment> = Arc::new(StaticEnvironment::with_bridge(
        transport.clone() as Arc<dyn MessageTransport>,
    ));
    let page: Arc<TestPageBridge> = Arc::new(PageBridge::new(Arc::new(SerdeSchema::new()), environment));
    channel.connect(page.clone());
    Harness {
        page,
        transport,
        channel,
    }
}

fn counting_fallback(counter: &Arc<AtomicUsize>) -> FallbackFn {
    let counter = Arc::clone(counter);
    Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

// ── Round trips ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_round_trip_discards_the_fallback() {
    // Arrange
    let h = harness(1);
    let fallback_runs = Arc::new(AtomicUsize::new(0));

    // Act
    h.page
        .send_message(&login_message("abc123"), Some(counting_fallback(&fallback_runs)));

    // Assert: host received the typed message, exactly one Discard crossed
    // the channel, and the fallback resolved without running.
    let received = h.transport.received.lock().unwrap().clone();
    assert_eq!(received, vec![login_message("abc123")]);

    let signals = h.channel.sent();
    assert_eq!(signals.len(), 1);
    assert!(matches!(signals[0], ControlSignal::Discard { .. }));

    assert_eq!(fallback_runs.load(Ordering::SeqCst), 0);
    assert_eq!(h.page.pending_fallbacks(), 0);
}

#[tokio::test]
async fn test_host_rejection_round_trip_invokes_the_fallback() {
    // Arrange: an empty token passes the page's shape check but fails the
    // host's stricter schema.
    let h = harness(1);
    let fallback_runs = Arc::new(AtomicUsize::new(0));

    // Act
    h.page
        .send_message(&login_message(""), Some(counting_fallback(&fallback_runs)));

    // Assert: the application callback never ran; exactly one Invoke came
    // back and the fallback ran exactly once.
    assert!(h.transport.received.lock().unwrap().is_empty());

    let signals = h.channel.sent();
    assert_eq!(signals.len(), 1);
    assert!(matches!(signals[0], ControlSignal::Invoke { .. }));

    assert_eq!(fallback_runs.load(Ordering::SeqCst), 1);
    assert_eq!(h.page.pending_fallbacks(), 0);
}

#[tokio::test]
async fn test_duplicate_signal_delivery_is_harmless() {
    // Arrange: the channel delivers every signal twice.
    let h = harness(2);
    let fallback_runs = Arc::new(AtomicUsize::new(0));

    // Act: one failing and one succeeding send.
    h.page
        .send_message(&login_message(""), Some(counting_fallback(&fallback_runs)));
    h.page
        .send_message(&login_message("abc123"), Some(counting_fallback(&fallback_runs)));

    // Assert: the duplicate Invoke found an empty slot; still exactly one
    // invocation overall.
    assert_eq!(fallback_runs.load(Ordering::SeqCst), 1);
    assert_eq!(h.page.pending_fallbacks(), 0);
}

#[tokio::test]
async fn test_round_trip_without_fallback_carries_no_signals() {
    // Arrange
    let h = harness(1);

    // Act
    h.page.send_message(&login_message("abc123"), None);

    // Assert: message delivered, no key on the wire, nothing to signal.
    assert_eq!(h.transport.received.lock().unwrap().len(), 1);
    assert!(h.channel.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lost_signal_is_recovered_by_the_sweep() {
    // Arrange: the channel records but never delivers (page disconnected),
    // so the Discard for a successful send is lost.
    let channel = Arc::new(LoopChannel::new(1));
    let host = HostBridge::with_channel(
        Arc::new(StrictLoginSchema),
        channel.clone() as Arc<dyn SignalChannel>,
    );
    let transport = Arc::new(LoopTransport {
        host,
        received: Mutex::new(Vec::new()),
    });
    let environment: Arc<dyn HostEnvironment> = Arc::new(StaticEnvironment::with_bridge(
        transport.clone() as Arc<dyn MessageTransport>,
    ));
    let page: Arc<TestPageBridge> =
        Arc::new(PageBridge::new(Arc::new(SerdeSchema::new()), environment));
    let fallback_runs = Arc::new(AtomicUsize::new(0));

    // Act
    page.send_message(&login_message("abc123"), Some(counting_fallback(&fallback_runs)));
    assert_eq!(page.pending_fallbacks(), 1);
    tokio::time::sleep(std::time::Duration::from_millis(3100)).await;

    // Assert: the stale registration was swept, not invoked.
    assert_eq!(page.pending_fallbacks(), 0);
    assert_eq!(fallback_runs.load(Ordering::SeqCst), 0);
    assert_eq!(channel.sent().len(), 1);
}
