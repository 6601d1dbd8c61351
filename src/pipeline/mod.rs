//! Pipeline core: wiring and lifecycle.
//!
//! The only public API from this module is [`PipelineSupervisor`] (and its
//! [`PipelineResult`]), which wires the shared buffer, spawns the worker,
//! runs the manager, and owns the cancellation scope of the whole run.
//!
//! Internal modules:
//! - [`buffer`]: multi-writer/single-reader hand-off queue;
//! - [`worker`]: spawn loop and producer-driving tasks;
//! - [`manager`]: single consumer with the bounded poll loop;
//! - [`supervisor`]: top-level coordination and teardown;
//! - [`shutdown`]: cross-platform OS-signal handling.

mod buffer;
mod manager;
mod shutdown;
mod supervisor;
mod worker;

#[cfg(test)]
pub(crate) mod fakes;

pub use supervisor::{PipelineResult, PipelineSupervisor};
