//! # Manager: the single consumer draining the buffer into the sink.
//!
//! One sequential loop: try to dequeue, sleep `poll_interval` when empty,
//! store each item, stop at the target. Being single-threaded it upholds
//! the sink's single-writer discipline by construction — a second store
//! can never start while one is outstanding.
//!
//! ## Flow
//! ```text
//! for _ in 0..max_polls {
//!   ├─► try_pop()
//!   │     ├─ None ─► sleep(poll_interval)          (cancellable)
//!   │     └─ Some(item)
//!   │           ├─► sink.store(item).await
//!   │           │     └─ Err ─► FATAL: return PipelineError::Store
//!   │           ├─► stored += 1, publish ItemStored
//!   │           └─► stored == target ─► Completed
//! }
//! return PipelineError::Stalled                    (budget exhausted)
//! ```
//!
//! ## Rules
//! - Store failures are **fatal** and propagate; producer failures never
//!   reach this loop. The two policies must not be conflated.
//! - The loop is bounded by `max_polls` dequeue attempts; it is never an
//!   unbounded `while true`.

use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;
use crate::events::{Bus, Event, EventKind};
use crate::pipeline::buffer::BufferRx;
use crate::produce::ItemSink;

/// How the manager loop ended, short of a fatal error.
#[derive(Debug)]
pub(crate) enum ManagerOutcome {
    /// The target count was reached.
    Completed(u64),
    /// External cancellation arrived first.
    Cancelled(u64),
}

/// Single consumer for one pipeline run.
pub(crate) struct Manager {
    buffer: BufferRx,
    sink: Arc<dyn ItemSink>,
    bus: Bus,
    poll_interval: Duration,
    target: u64,
    max_polls: u32,
}

impl Manager {
    pub(crate) fn new(
        buffer: BufferRx,
        sink: Arc<dyn ItemSink>,
        bus: Bus,
        poll_interval: Duration,
        target: u64,
        max_polls: u32,
    ) -> Self {
        Self {
            buffer,
            sink,
            bus,
            poll_interval,
            target,
            max_polls,
        }
    }

    /// Runs the consumption loop to one of its three ends: target reached,
    /// fatal sink failure, or poll budget exhausted. Cancellation is
    /// observed at the empty-buffer sleep.
    pub(crate) async fn run(
        mut self,
        token: CancellationToken,
    ) -> Result<ManagerOutcome, PipelineError> {
        let mut stored: u64 = 0;

        if self.target == 0 {
            return Ok(ManagerOutcome::Completed(0));
        }

        for _ in 0..self.max_polls {
            if token.is_cancelled() {
                return Ok(ManagerOutcome::Cancelled(stored));
            }

            let Some(item) = self.buffer.try_pop() else {
                select! {
                    _ = time::sleep(self.poll_interval) => continue,
                    _ = token.cancelled() => return Ok(ManagerOutcome::Cancelled(stored)),
                }
            };

            self.sink
                .store(item)
                .await
                .map_err(|source| PipelineError::Store { stored, source })?;

            stored += 1;
            self.bus
                .publish(Event::new(EventKind::ItemStored).with_stored(stored));

            if stored == self.target {
                return Ok(ManagerOutcome::Completed(stored));
            }
        }

        Err(PipelineError::Stalled {
            polls: self.max_polls,
            stored,
            target: self.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::buffer::shared_buffer;
    use crate::pipeline::fakes::{FlakySink, RecordingSink};
    use crate::produce::Item;

    fn manager_with(
        buffer: BufferRx,
        sink: Arc<dyn ItemSink>,
        target: u64,
        max_polls: u32,
    ) -> Manager {
        Manager::new(
            buffer,
            sink,
            Bus::new(64),
            Duration::from_millis(100),
            target,
            max_polls,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn stores_until_the_target_and_stops() {
        let (tx, rx) = shared_buffer();
        for i in 0..5 {
            tx.push(Item::new(i.to_string()));
        }
        let sink = Arc::new(RecordingSink::instant());

        let outcome = manager_with(rx, sink.clone(), 3, 1000)
            .run(CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, ManagerOutcome::Completed(3)));
        // Items beyond the target stay in the buffer untouched.
        assert_eq!(sink.stored_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_buffer_exhausts_the_poll_budget() {
        let (_tx, rx) = shared_buffer();
        let sink = Arc::new(RecordingSink::instant());

        let err = manager_with(rx, sink, 3, 10)
            .run(CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            PipelineError::Stalled {
                polls,
                stored,
                target,
            } => {
                assert_eq!((polls, stored, target), (10, 0, 3));
            }
            other => panic!("expected Stalled, got {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sink_failure_is_fatal_and_counts_prior_stores() {
        let (tx, rx) = shared_buffer();
        for i in 0..5 {
            tx.push(Item::new(i.to_string()));
        }
        let sink = Arc::new(FlakySink::failing_on(3));

        let err = manager_with(rx, sink.clone(), 5, 1000)
            .run(CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Store { stored: 2, .. }));
        assert_eq!(sink.calls(), 3, "no store attempts after the fatal one");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_target_completes_immediately() {
        let (_tx, rx) = shared_buffer();
        let sink = Arc::new(RecordingSink::instant());

        let outcome = manager_with(rx, sink, 0, 1000)
            .run(CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(outcome, ManagerOutcome::Completed(0)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_the_empty_poll() {
        let (_tx, rx) = shared_buffer();
        let sink = Arc::new(RecordingSink::instant());
        let token = CancellationToken::new();

        let handle = tokio::spawn(manager_with(rx, sink, 3, 1000).run(token.clone()));
        time::sleep(Duration::from_millis(250)).await;
        token.cancel();

        let outcome = handle.await.unwrap().unwrap();
        assert!(matches!(outcome, ManagerOutcome::Cancelled(0)));
    }
}
