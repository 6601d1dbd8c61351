//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the worker, the producer-driving
//! tasks, the manager and the supervisor.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `PipelineSupervisor`, `Worker`, producer-driving
//!   tasks, `Manager`, `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: `PipelineSupervisor::subscriber_listener()`, which fans
//!   events out to the [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
