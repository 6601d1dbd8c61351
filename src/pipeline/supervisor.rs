//! # PipelineSupervisor: owns one pipeline run end to end.
//!
//! The supervisor wires the shared buffer, spawns the [`Worker`] under a
//! child cancellation token, runs the [`Manager`] in place, and converts
//! the manager's exit into a [`PipelineResult`] after tearing the worker
//! subtree down. It also owns the event bus and fans events out to
//! subscribers.
//!
//! ## High-level architecture
//! ```text
//! run(factory, sink):
//!   ├─► shared_buffer() ─► (tx: producers, rx: manager)
//!   ├─► worker_token = token.child_token()
//!   ├─► tokio::spawn(Worker::run(worker_token))
//!   │         │ spawn loop + producer-driving tasks
//!   │         ▼
//!   │    BufferTx.push(item) ──────────────┐
//!   ├─► Manager::run(token).await          ▼
//!   │         └── try_pop ── store ── ItemStored ── target?
//!   ├─► worker_token.cancel(); join worker
//!   └─► PipelineResult::{Completed, Failed, Cancelled}
//! ```
//!
//! ## State machine
//! ```text
//! RUNNING ──(stored == target)──────────► COMPLETED   (cancel worker subtree)
//! RUNNING ──(sink store fails)──────────► FAILED      (cancel worker subtree)
//! RUNNING ──(external token cancelled)──► CANCELLED   (cancel everything)
//! ```
//! Terminal states never transition further; the worker is always joined
//! before `run` returns, so no producer activity and no store calls
//! outlive the result.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use beltline::{
//!     PipelineConfig, PipelineSupervisor, StandardItemSink, StandardProducerFactory,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = PipelineConfig::default();
//!     let factory = Arc::new(StandardProducerFactory::new(
//!         cfg.spawn_interval,
//!         cfg.item_interval,
//!     ));
//!     let sink = Arc::new(StandardItemSink::new(Duration::from_millis(500)));
//!
//!     let supervisor = PipelineSupervisor::new(cfg, Vec::new());
//!     let result = supervisor.run(factory, sink.clone()).await;
//!     println!("{result:?}; stored {} items", sink.items().len());
//! }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::events::{Bus, Event, EventKind};
use crate::pipeline::buffer::shared_buffer;
use crate::pipeline::manager::{Manager, ManagerOutcome};
use crate::pipeline::shutdown;
use crate::pipeline::worker::Worker;
use crate::produce::{ItemSink, ProducerFactory};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Terminal outcome of one pipeline run.
#[derive(Debug)]
pub enum PipelineResult {
    /// The target number of items was stored.
    Completed(u64),
    /// A fatal failure tore the pipeline down.
    Failed(PipelineError),
    /// External cancellation arrived before the target was reached.
    Cancelled,
}

impl PipelineResult {
    /// True if the run stored its full target.
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineResult::Completed(_))
    }

    /// Items stored, when the run completed.
    pub fn stored(&self) -> Option<u64> {
        match self {
            PipelineResult::Completed(n) => Some(*n),
            _ => None,
        }
    }
}

/// Coordinates the worker, the manager, event delivery, and teardown.
///
/// Create once (inside a Tokio runtime — subscriber workers are spawned on
/// construction) and call [`run`](Self::run) per pipeline execution.
pub struct PipelineSupervisor {
    cfg: PipelineConfig,
    bus: Bus,
    _subs: Arc<SubscriberSet>,
}

impl PipelineSupervisor {
    /// Creates a supervisor with the given config and event subscribers.
    pub fn new(cfg: PipelineConfig, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        Self::subscriber_listener(&bus, &subs);
        Self {
            cfg,
            bus,
            _subs: subs,
        }
    }

    /// Runs the pipeline to its natural end (target reached or fatal
    /// failure); never cancelled externally.
    pub async fn run(
        &self,
        factory: Arc<dyn ProducerFactory>,
        sink: Arc<dyn ItemSink>,
    ) -> PipelineResult {
        self.run_with_token(factory, sink, CancellationToken::new())
            .await
    }

    /// Runs the pipeline until completion, failure, or OS termination
    /// signal (SIGINT/SIGTERM/Ctrl-C), whichever comes first.
    pub async fn run_until_signal(
        &self,
        factory: Arc<dyn ProducerFactory>,
        sink: Arc<dyn ItemSink>,
    ) -> PipelineResult {
        let token = CancellationToken::new();
        let bus = self.bus.clone();
        let trigger = token.clone();
        let signal = tokio::spawn(async move {
            if shutdown::wait_for_shutdown_signal().await.is_ok() {
                bus.publish(Event::new(EventKind::ShutdownRequested));
                trigger.cancel();
            }
        });

        let result = self.run_with_token(factory, sink, token).await;
        signal.abort();
        result
    }

    /// Runs the pipeline under an externally owned cancellation token.
    ///
    /// Cancelling the token stops the manager at its next suspension point
    /// and tears down the worker subtree; the result is
    /// [`PipelineResult::Cancelled`].
    pub async fn run_with_token(
        &self,
        factory: Arc<dyn ProducerFactory>,
        sink: Arc<dyn ItemSink>,
        token: CancellationToken,
    ) -> PipelineResult {
        let (buffer_tx, buffer_rx) = shared_buffer();

        let worker_token = token.child_token();
        let worker = Worker::new(
            factory,
            buffer_tx,
            self.bus.clone(),
            self.cfg.spawn_interval,
            self.cfg.item_interval,
            self.cfg.max_producers,
        );
        let worker_handle = tokio::spawn(worker.run(worker_token.clone()));

        let manager = Manager::new(
            buffer_rx,
            sink,
            self.bus.clone(),
            self.cfg.poll_interval,
            self.cfg.target_count,
            self.cfg.max_polls,
        );
        let outcome = manager.run(token.clone()).await;

        // The manager has exited; stop the whole producer subtree and wait
        // for every driver to release its slot before reporting.
        worker_token.cancel();
        let _ = worker_handle.await;

        match outcome {
            Ok(ManagerOutcome::Completed(stored)) => {
                self.bus
                    .publish(Event::new(EventKind::PipelineCompleted).with_stored(stored));
                PipelineResult::Completed(stored)
            }
            Ok(ManagerOutcome::Cancelled(stored)) => {
                self.bus
                    .publish(Event::new(EventKind::PipelineCancelled).with_stored(stored));
                PipelineResult::Cancelled
            }
            Err(err) => {
                self.bus.publish(
                    Event::new(EventKind::PipelineFailed)
                        .with_stored(err.stored())
                        .with_reason(err.to_string()),
                );
                PipelineResult::Failed(err)
            }
        }
    }

    /// Forwards bus events to the subscriber set (fire-and-forget).
    fn subscriber_listener(bus: &Bus, subs: &Arc<SubscriberSet>) {
        let mut rx = bus.subscribe();
        let set = Arc::clone(subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }
}
