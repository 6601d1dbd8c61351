//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [spawned] producer=1 active=1
//! [spawn-rejected] reason="too soon: 400ms remaining"
//! [produced] producer=1
//! [producer-failed] producer=2 reason="production fault"
//! [stored] count=7
//! [completed] stored=20
//! [failed] stored=4 reason="store failed: disk full"
//! [shutdown-requested]
//! ```
//!
//! ## Example
//! ```no_run
//! # use beltline::{LogWriter, PipelineConfig, PipelineSupervisor};
//! # use std::sync::Arc;
//! let supervisor = PipelineSupervisor::new(
//!     PipelineConfig::default(),
//!     vec![Arc::new(LogWriter)],
//! );
//! // LogWriter will print all events to stdout.
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use — implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ProducerSpawned => {
                if let (Some(id), Some(active)) = (e.producer, e.active) {
                    println!("[spawned] producer={id} active={active}");
                }
            }
            EventKind::SpawnRejected => {
                println!("[spawn-rejected] reason={:?}", e.reason.as_deref());
            }
            EventKind::ItemProduced => {
                if let Some(id) = e.producer {
                    println!("[produced] producer={id}");
                }
            }
            EventKind::ProducerFailed => {
                println!(
                    "[producer-failed] producer={:?} reason={:?}",
                    e.producer,
                    e.reason.as_deref()
                );
            }
            EventKind::ItemStored => {
                if let Some(stored) = e.stored {
                    println!("[stored] count={stored}");
                }
            }
            EventKind::PipelineCompleted => {
                println!("[completed] stored={:?}", e.stored);
            }
            EventKind::PipelineFailed => {
                println!(
                    "[failed] stored={:?} reason={:?}",
                    e.stored,
                    e.reason.as_deref()
                );
            }
            EventKind::PipelineCancelled => {
                println!("[cancelled] stored={:?}", e.stored);
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] {:?}", e.reason.as_deref());
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] {:?}", e.reason.as_deref());
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
