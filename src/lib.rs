//! # beltline
//!
//! **Beltline** is a bounded producer/consumer pipeline runtime for Rust.
//!
//! It maintains a capped pool of rate-limited producers feeding a shared
//! buffer, a single manager draining that buffer into a slow fallible
//! sink, and a supervisor that coordinates startup, fault handling, and
//! race-free termination. The crate is designed as a building block for
//! ingestion jobs and batch collectors with a fixed target.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            ┌─────────────────┐
//!            │ ProducerFactory │  (global spawn rate limit)
//!            └────────┬────────┘
//!                     │ create() ≤ max_producers live
//!            ┌────────▼────────────────────────────────────────┐
//!            │  Worker (spawn loop, one tick per interval)     │
//!            │  - refills freed slots                          │
//!            │  - one driving task per producer                │
//!            └──┬──────────────┬──────────────┬────────────────┘
//!               ▼              ▼              ▼
//!         ┌──────────┐   ┌──────────┐   ┌──────────┐
//!         │ Producer │   │ Producer │   │ Producer │   (item spacing,
//!         │  task 1  │   │  task 2  │   │  task N  │    faults end task)
//!         └────┬─────┘   └────┬─────┘   └────┬─────┘
//!              │ push         │ push         │ push
//!              ▼              ▼              ▼
//!            ┌─────────────────────────────────┐
//!            │        SharedBuffer (FIFO)      │
//!            └────────────────┬────────────────┘
//!                             │ try_pop (bounded poll loop)
//!                    ┌────────▼────────┐
//!                    │     Manager     │  single consumer
//!                    └────────┬────────┘
//!                             │ store().await   (never overlaps)
//!                    ┌────────▼────────┐
//!                    │     ItemSink    │  slow, fallible, fatal on error
//!                    └─────────────────┘
//!
//! Every component publishes Events to the Bus; the supervisor's
//! listener forwards them to the SubscriberSet (per-subscriber bounded
//! queue + worker, panic-isolated).
//! ```
//!
//! ### Lifecycle
//! ```text
//! PipelineSupervisor::run(factory, sink)
//!   ├─► shared buffer wired between worker and manager
//!   ├─► worker spawned under a child cancellation token
//!   ├─► manager runs in place:
//!   │     ├─ target reached        ─► Completed
//!   │     ├─ sink store failed     ─► Failed(Store)
//!   │     ├─ poll budget exhausted ─► Failed(Stalled)
//!   │     └─ token cancelled       ─► Cancelled
//!   └─► worker subtree cancelled and joined before the result returns
//! ```
//!
//! ## Features
//! | Area            | Description                                               | Key types / traits                                |
//! |-----------------|-----------------------------------------------------------|---------------------------------------------------|
//! | **Production**  | Rate-limited, fault-prone item sources and their factory. | [`Producer`], [`ProducerFactory`], [`Item`]       |
//! | **Storage**     | Slow, fallible, single-writer item persistence.           | [`ItemSink`]                                      |
//! | **Supervision** | One pipeline run end to end, with coordinated teardown.   | [`PipelineSupervisor`], [`PipelineResult`]        |
//! | **Events**      | Hook into pipeline events (logging, metrics, tests).      | [`Subscribe`], [`Event`], [`EventKind`], [`Bus`]  |
//! | **Errors**      | Typed errors for production, spawning, storage, the run.  | [`ProduceError`], [`StoreError`], [`PipelineError`] |
//! | **Configuration** | Centralize intervals, caps, and budgets.                | [`PipelineConfig`]                                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
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
//!
//!     let factory = Arc::new(StandardProducerFactory::new(
//!         cfg.spawn_interval,
//!         cfg.item_interval,
//!     ));
//!     let sink = Arc::new(StandardItemSink::new(Duration::from_millis(500)));
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn beltline::Subscribe>> = {
//!         use beltline::LogWriter;
//!         vec![Arc::new(LogWriter)]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn beltline::Subscribe>> = Vec::new();
//!
//!     let supervisor = PipelineSupervisor::new(cfg, subs);
//!     let result = supervisor.run_until_signal(factory, sink.clone()).await;
//!     println!("{result:?}; stored {} items", sink.items().len());
//! }
//! ```

mod config;
mod error;
mod events;
mod pipeline;
mod produce;
mod subscribers;

// ---- Public re-exports ----

pub use config::PipelineConfig;
pub use error::{PipelineError, ProduceError, SpawnError, StoreError};
pub use events::{Bus, Event, EventKind};
pub use pipeline::{PipelineResult, PipelineSupervisor};
pub use produce::{
    Item, ItemSink, Producer, ProducerFactory, StandardItemSink, StandardProducer,
    StandardProducerFactory,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
