//! # Pipeline configuration.
//!
//! [`PipelineConfig`] centralizes the knobs of a pipeline run: pool size,
//! the three rate-limiting intervals, the termination target, the manager's
//! poll budget, and the event bus capacity.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use beltline::PipelineConfig;
//!
//! let mut cfg = PipelineConfig::default();
//! cfg.max_producers = 3;
//! cfg.target_count = 10;
//!
//! assert_eq!(cfg.spawn_interval, Duration::from_millis(800));
//! ```

use std::time::Duration;

/// Configuration for a [`PipelineSupervisor`](crate::PipelineSupervisor) run.
///
/// ## Field semantics
/// - `max_producers`: hard cap on concurrently live producers; never
///   exceeded, not even transiently.
/// - `spawn_interval`: cadence of the worker's spawn loop and the global
///   minimum spacing between producer creations.
/// - `item_interval`: per-producer minimum spacing between items; each
///   producer-driving task waits this long before every `produce()` call.
/// - `poll_interval`: how long the manager sleeps when the buffer is empty.
/// - `target_count`: stored items after which the pipeline completes.
/// - `max_polls`: upper bound on manager dequeue attempts; exhausting it
///   ends the run with `PipelineError::Stalled` instead of spinning forever.
/// - `bus_capacity`: event bus ring buffer size (min 1, clamped by the bus).
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Maximum number of concurrently live producers.
    pub max_producers: usize,
    /// Interval between spawn attempts (also the factory's rate limit).
    pub spawn_interval: Duration,
    /// Minimum spacing between items of one producer.
    pub item_interval: Duration,
    /// Manager sleep when the shared buffer is empty.
    pub poll_interval: Duration,
    /// Number of stored items that completes the pipeline.
    pub target_count: u64,
    /// Upper bound on manager dequeue attempts.
    pub max_polls: u32,
    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl PipelineConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for PipelineConfig {
    /// The classic factory-floor configuration:
    ///
    /// - `max_producers = 5`
    /// - `spawn_interval = 800ms`
    /// - `item_interval = 1s`
    /// - `poll_interval = 100ms`
    /// - `target_count = 20`
    /// - `max_polls = 1000`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_producers: 5,
            spawn_interval: Duration::from_millis(800),
            item_interval: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
            target_count: 20,
            max_polls: 1000,
            bus_capacity: 1024,
        }
    }
}
