//! # Rate-limited producer creation.
//!
//! [`ProducerFactory`] is the external collaborator the worker asks for a
//! fresh producer whenever a pool slot is free. Creation carries a
//! **global** rate limit shared across the whole pool, unlike the
//! per-producer item spacing.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::SpawnError;
use crate::produce::producer::{Producer, StandardProducer};

/// # Producer creation contract.
///
/// Called only from the worker's spawn loop, but behind `&self` so one
/// factory instance can be shared (and inspected) across the run.
/// Implementations with creation state use interior mutability.
pub trait ProducerFactory: Send + Sync + 'static {
    /// Creates a new producer, or rejects the attempt.
    ///
    /// [`SpawnError::TooSoon`] means the global spawn spacing has not
    /// elapsed since the previous **successful** creation; the worker will
    /// simply try again on its next tick.
    fn create(&self) -> Result<Box<dyn Producer>, SpawnError>;
}

/// Standard factory: enforces the global spawn spacing and hands out
/// [`StandardProducer`]s.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use beltline::{ProducerFactory, StandardProducerFactory};
///
/// # #[tokio::main(flavor = "current_thread")] async fn main() {
/// let factory = StandardProducerFactory::new(
///     Duration::from_millis(800), // spawn spacing
///     Duration::from_secs(1),     // item spacing of created producers
/// );
/// let producer = factory.create().unwrap();
/// assert!(factory.create().is_err()); // too soon
/// # drop(producer); }
/// ```
pub struct StandardProducerFactory {
    spawn_spacing: Duration,
    item_spacing: Duration,
    fault_odds: u32,
    last_created_at: Mutex<Option<Instant>>,
}

impl StandardProducerFactory {
    /// Creates a factory with the given global spawn spacing; producers it
    /// hands out enforce `item_spacing` and carry the default fault odds.
    pub fn new(spawn_spacing: Duration, item_spacing: Duration) -> Self {
        Self {
            spawn_spacing,
            item_spacing,
            fault_odds: 8,
            last_created_at: Mutex::new(None),
        }
    }

    /// Overrides the fault odds of created producers (`0` = never fault).
    pub fn with_fault_odds(mut self, odds: u32) -> Self {
        self.fault_odds = odds;
        self
    }
}

impl ProducerFactory for StandardProducerFactory {
    fn create(&self) -> Result<Box<dyn Producer>, SpawnError> {
        let mut last = self
            .last_created_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.spawn_spacing {
                return Err(SpawnError::TooSoon {
                    remaining: self.spawn_spacing - elapsed,
                });
            }
        }
        *last = Some(Instant::now());

        Ok(Box::new(
            StandardProducer::new(self.item_spacing).with_fault_odds(self.fault_odds),
        ))
    }
}
