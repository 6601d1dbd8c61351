//! # Production-side abstractions and standard implementations.
//!
//! This module provides the collaborator contracts the pipeline drives:
//! - [`Producer`] - stateful unit yielding one [`Item`] per call
//! - [`ProducerFactory`] - rate-limited producer creation
//! - [`ItemSink`] - slow, fallible, single-writer item storage
//!
//! plus the standard implementations used by demos and the default wiring:
//! [`StandardProducer`], [`StandardProducerFactory`], [`StandardItemSink`].

mod factory;
mod item;
mod producer;
mod sink;

pub use factory::{ProducerFactory, StandardProducerFactory};
pub use item::Item;
pub use producer::{Producer, StandardProducer};
pub use sink::{ItemSink, StandardItemSink};
