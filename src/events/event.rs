//! # Runtime events emitted by the pipeline.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Producer events**: pool changes and per-producer outcomes
//!   (spawned, rejected, produced, failed)
//! - **Consumption events**: items stored by the manager
//! - **Terminal events**: the run's final state (completed, failed, cancelled)
//!
//! The [`Event`] struct carries metadata such as timestamps, the producer
//! id, the active-pool gauge, and stored counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use beltline::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ProducerFailed)
//!     .with_producer(3)
//!     .with_reason("production fault");
//!
//! assert_eq!(ev.kind, EventKind::ProducerFailed);
//! assert_eq!(ev.producer, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of pipeline events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `reason` (panic info), `at`, `seq`.
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason` (e.g. "full", "closed"), `at`, `seq`.
    SubscriberOverflow,

    // === Shutdown events ===
    /// External shutdown requested (OS signal observed).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    // === Producer pool events ===
    /// A new producer was created and its driving task spawned.
    ///
    /// Sets: `producer` (id), `active` (pool gauge after the spawn),
    /// `at`, `seq`.
    ProducerSpawned,

    /// The factory rejected a creation attempt; the worker retries on the
    /// next tick.
    ///
    /// Sets: `reason`, `at`, `seq`.
    SpawnRejected,

    /// A producer yielded one item into the shared buffer.
    ///
    /// Sets: `producer` (id), `at`, `seq`.
    ItemProduced,

    /// A producer failed; its driving task ended and the slot was freed.
    ///
    /// Sets: `producer` (id), `reason`, `at`, `seq`.
    ProducerFailed,

    // === Consumption events ===
    /// The manager stored one item in the sink.
    ///
    /// Sets: `stored` (running count), `at`, `seq`.
    ItemStored,

    // === Terminal events ===
    /// The pipeline stored the target number of items and shut down.
    ///
    /// Sets: `stored`, `at`, `seq`.
    PipelineCompleted,

    /// The pipeline was torn down by a fatal failure.
    ///
    /// Sets: `reason`, `stored`, `at`, `seq`.
    PipelineFailed,

    /// The pipeline was cancelled externally before reaching the target.
    ///
    /// Sets: `stored`, `at`, `seq`.
    PipelineCancelled,
}

/// Pipeline event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Producer id, if the event concerns one producer.
    pub producer: Option<u64>,
    /// Live-producer gauge at the time of the event.
    pub active: Option<usize>,
    /// Running stored-items count.
    pub stored: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp
    /// and the next global sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            producer: None,
            active: None,
            stored: None,
            reason: None,
        }
    }

    /// Attaches a producer id.
    #[inline]
    pub fn with_producer(mut self, id: u64) -> Self {
        self.producer = Some(id);
        self
    }

    /// Attaches the live-producer gauge.
    #[inline]
    pub fn with_active(mut self, active: usize) -> Self {
        self.active = Some(active);
        self
    }

    /// Attaches the running stored-items count.
    #[inline]
    pub fn with_stored(mut self, stored: u64) -> Self {
        self.stored = Some(stored);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub(crate) fn subscriber_overflow(subscriber: &'static str, cause: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} cause={cause}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }
}
