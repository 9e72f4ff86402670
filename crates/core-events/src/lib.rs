//! Core event types and channel helpers for hostelkit.
//!
//! Every interaction the widgets react to (control clicks, viewport resizes,
//! thumbnail taps, swipes, keys, form edits, page toggles) is normalized into
//! an [`Event`] and pushed through a single bounded channel owned by the
//! runtime loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// Bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Producers await `send` and are parked while the
// loop catches up; UI events are never dropped. A closed channel means the loop is gone and every
// producer must stop.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

// -------------------------------------------------------------------------------------------------
// Telemetry
// -------------------------------------------------------------------------------------------------
// Relaxed atomic counters, inspected by tests and logged once at shutdown.
// -------------------------------------------------------------------------------------------------
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static INPUT_EVENTS_TOTAL: AtomicU64 = AtomicU64::new(0); // input events emitted by sources
pub static RESIZE_EVENTS_TOTAL: AtomicU64 = AtomicU64::new(0); // raw (pre-debounce) resize events
pub static TICKS_TOTAL: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub channel_send_failures: u64,
    pub input_events: u64,
    pub resize_events: u64,
    pub ticks: u64,
}

pub fn telemetry_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        channel_send_failures: CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
        input_events: INPUT_EVENTS_TOTAL.load(Ordering::Relaxed),
        resize_events: RESIZE_EVENTS_TOTAL.load(Ordering::Relaxed),
        ticks: TICKS_TOTAL.load(Ordering::Relaxed),
    }
}

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(InputEvent),
    Command(CommandEvent),
    /// Periodic monotonic tick used to expire deadlines (resize debounce,
    /// gallery fade) without busy polling.
    Tick,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandEvent {
    Quit,
}

/// Direction of a previous/next navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Prev,
    Next,
}

impl NavDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavDirection::Prev => "prev",
            NavDirection::Next => "next",
        }
    }
}

/// Keys the widgets listen to. Anything else is surfaced as `Other` so the
/// loop can trace it without interpreting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(char),
}

impl NavKey {
    /// Arrow keys map onto navigation directions; other keys do not navigate.
    pub fn direction(&self) -> Option<NavDirection> {
        match self {
            NavKey::ArrowLeft => Some(NavDirection::Prev),
            NavKey::ArrowRight => Some(NavDirection::Next),
            NavKey::Escape | NavKey::Other(_) => None,
        }
    }
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Activation of a carousel's previous/next control. `carousel` is the
    /// instance id (element prefix such as `latest`).
    Nav {
        carousel: String,
        direction: NavDirection,
    },
    /// Viewport resized to the given CSS pixel width. Raw, not debounced.
    Resize(u32),
    /// Gallery thumbnail activated.
    Thumbnail(usize),
    /// Completed horizontal touch gesture on the main media area.
    Swipe { start_x: f32, end_x: f32 },
    Key(NavKey),
    /// Profile form input changed. `name` is the form field name.
    Field { name: String, value: String },
    /// Profile form submitted.
    Validate,
    /// Profile picture chosen in the file picker.
    Upload { mime: String, size: u64 },
    /// FAQ question clicked.
    FaqToggle(usize),
    /// Support search box contents.
    FaqSearch(String),
    /// Compare checkbox on a hostel card clicked.
    Compare { id: String, name: String },
    ModalOpen(String),
    ModalClose(String),
    /// Click on the backdrop of the open modal.
    OverlayClick,
}

// -------------------------------------------------------------------------------------------------
// Event Transform Hooks
// -------------------------------------------------------------------------------------------------
/// Optional hooks that can observe events at the loop boundary. Hooks must
/// not block.
pub trait EventHooks: Send + Sync + 'static {
    fn pre_handle(&self, _event: &Event) {}
    fn post_handle(&self, _event: &Event) {}
}

/// Default no-op hooks implementation.
pub struct NoopEventHooks;

impl EventHooks for NoopEventHooks {}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------
// Every producer (scripted input, tick) registers through the same trait. Each source owns its task
// lifecycle and terminates as soon as a send fails (consumer dropped).
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer. Implementors usually hold
/// configuration and spawn one background task that pushes `Event`s into the
/// shared channel.
pub trait AsyncEventSource: Send + 'static {
    /// Human-readable stable identifier (used for logging / diagnostics).
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task. Implementors stop when
    /// `tx.send(..).await` returns Err or on their own stop condition.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source
    /// receives its own clone of `tx`; the registry is drained so a second call
    /// spawns nothing.
    ///
    /// During shutdown the caller should drop its final `Sender` clone before
    /// awaiting the returned handles so the sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Built-in monotonic tick source. Emits `Event::Tick` every configured
/// interval.
pub struct TickEventSource {
    interval: Duration,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
                TICKS_TOTAL.fetch_add(1, Ordering::Relaxed);
            }
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(NavKey::ArrowLeft.direction(), Some(NavDirection::Prev));
        assert_eq!(NavKey::ArrowRight.direction(), Some(NavDirection::Next));
        assert_eq!(NavKey::Escape.direction(), None);
        assert_eq!(NavKey::Other('x').direction(), None);
    }

    #[test]
    fn direction_labels() {
        assert_eq!(NavDirection::Prev.as_str(), "prev");
        assert_eq!(NavDirection::Next.as_str(), "next");
    }
}
