//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery
//! delivering pipeline [`Event`](crate::Event)s to user code (logging,
//! metrics, assertions in tests).
//!
//! ## Architecture
//! ```text
//! Worker / Manager / Supervisor ── publish ──► Bus
//!                                               │
//!                                    subscriber_listener
//!                                               │
//!                                        SubscriberSet::emit
//!                             ┌─────────────────┼─────────────────┐
//!                             ▼                 ▼                 ▼
//!                        [queue S1]        [queue S2]        [queue SN]
//!                         worker S1         worker S2         worker SN
//!                             ▼                 ▼                 ▼
//!                      S1.on_event()     S2.on_event()     SN.on_event()
//! ```
//!
//! ## Implementing a custom subscriber
//! ```no_run
//! use beltline::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ProducerFailed {
//!             // increment a metric...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
