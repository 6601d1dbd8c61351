//! Error types used by the beltline pipeline.
//!
//! This module defines the pipeline's error taxonomy:
//!
//! - [`ProduceError`] — failures of an individual producer (always local).
//! - [`SpawnError`] — failures of producer creation (always local).
//! - [`StoreError`] — failure of the item sink (always fatal).
//! - [`PipelineError`] — terminal pipeline failures reported by
//!   [`PipelineSupervisor::run`](crate::PipelineSupervisor::run).
//!
//! Producer-side errors are recovered inside the worker: the failing
//! producer's slot is freed and refilled on the next spawn tick. Sink-side
//! errors tear down the whole pipeline. The two must never be conflated.
//!
//! Types provide `as_label()` helpers returning short stable snake_case
//! labels for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a single producer.
///
/// All variants are local to the producer-driving task: the task ends,
/// its pool slot is freed, and the worker keeps spawning replacements.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProduceError {
    /// `produce()` was called before the minimum inter-item spacing elapsed.
    #[error("produce called {remaining:?} before minimum spacing elapsed")]
    TooSoon {
        /// Time left until the next call would be accepted.
        remaining: Duration,
    },

    /// The producer hit a production fault and is now permanently broken.
    #[error("producer hit a production fault and is now broken")]
    Faulted,

    /// The producer was already broken; no work was attempted.
    #[error("producer is permanently broken")]
    Broken,
}

impl ProduceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use beltline::ProduceError;
    ///
    /// assert_eq!(ProduceError::Broken.as_label(), "producer_broken");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProduceError::TooSoon { .. } => "producer_too_soon",
            ProduceError::Faulted => "producer_faulted",
            ProduceError::Broken => "producer_broken",
        }
    }

    /// True once the producer can never produce again.
    ///
    /// # Example
    /// ```
    /// use beltline::ProduceError;
    /// use std::time::Duration;
    ///
    /// assert!(ProduceError::Faulted.is_permanent());
    /// assert!(!ProduceError::TooSoon { remaining: Duration::from_millis(10) }.is_permanent());
    /// ```
    pub fn is_permanent(&self) -> bool {
        matches!(self, ProduceError::Faulted | ProduceError::Broken)
    }
}

/// # Errors produced by producer creation.
///
/// Like [`ProduceError`], these are recovered locally: the worker skips
/// this spawn tick and tries again on the next one.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SpawnError {
    /// The factory was asked for a producer before the global spawn
    /// spacing elapsed.
    #[error("producer requested {remaining:?} before minimum spawn spacing elapsed")]
    TooSoon {
        /// Time left until the next creation would be accepted.
        remaining: Duration,
    },

    /// Creation failed for an implementation-specific reason.
    #[error("producer creation failed: {reason}")]
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl SpawnError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SpawnError::TooSoon { .. } => "spawn_too_soon",
            SpawnError::Failed { .. } => "spawn_failed",
        }
    }
}

/// # Failure of the item sink.
///
/// Unlike producer-side errors this is **fatal**: the manager propagates
/// it, the supervisor cancels the worker subtree and returns
/// [`PipelineResult::Failed`](crate::PipelineResult::Failed).
#[derive(Error, Debug)]
#[error("item store failed: {reason}")]
pub struct StoreError {
    /// Human-readable description of the failure.
    pub reason: String,
}

impl StoreError {
    /// Creates a store error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// # Terminal pipeline failures.
///
/// Returned inside [`PipelineResult::Failed`](crate::PipelineResult::Failed).
/// External cancellation is *not* an error and is reported separately as
/// [`PipelineResult::Cancelled`](crate::PipelineResult::Cancelled).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The sink rejected a store; the pipeline was torn down.
    #[error("item sink failed after {stored} items stored: {source}")]
    Store {
        /// Items successfully stored before the failure.
        stored: u64,
        /// The underlying sink error.
        #[source]
        source: StoreError,
    },

    /// The manager exhausted its poll budget without reaching the target.
    ///
    /// The consumption loop is bounded (never an unbounded `while true`);
    /// running out of the budget means the pipeline stalled, e.g. every
    /// producer kept failing under test fault injection.
    #[error("manager exhausted {polls} poll cycles with {stored}/{target} items stored")]
    Stalled {
        /// Dequeue attempts performed.
        polls: u32,
        /// Items stored before the budget ran out.
        stored: u64,
        /// The configured target count.
        target: u64,
    },
}

impl PipelineError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use beltline::{PipelineError, StoreError};
    ///
    /// let err = PipelineError::Store {
    ///     stored: 2,
    ///     source: StoreError::new("disk full"),
    /// };
    /// assert_eq!(err.as_label(), "pipeline_store_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PipelineError::Store { .. } => "pipeline_store_failed",
            PipelineError::Stalled { .. } => "pipeline_stalled",
        }
    }

    /// Items stored before the pipeline failed.
    pub fn stored(&self) -> u64 {
        match self {
            PipelineError::Store { stored, .. } => *stored,
            PipelineError::Stalled { stored, .. } => *stored,
        }
    }
}
