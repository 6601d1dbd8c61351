//! # Worker: supervises the bounded pool of producer-driving tasks.
//!
//! The worker runs a single spawn loop: every `spawn_interval` it checks
//! the live-producer gauge and, if a slot is free, asks the factory for a
//! new producer and spawns a task that drives it. A producer failure ends
//! only that one task; the freed slot is refilled on a later tick.
//!
//! ## Flow
//! ```text
//! loop {
//!   ├─► sleep(spawn_interval)            (cancellable)
//!   ├─► reap finished driver tasks
//!   ├─► active == max? ─► skip tick
//!   ├─► factory.create()
//!   │     ├─ Err ─► publish SpawnRejected, skip tick     (local failure)
//!   │     └─ Ok  ─► acquire slot, publish ProducerSpawned,
//!   │               spawn drive_producer(...)
//! }
//! ```
//!
//! ## Rules
//! - The gauge is incremented **only** here, in the single spawn loop,
//!   after the `active < max` check; it therefore never exceeds the cap,
//!   not even transiently, under concurrent slot releases.
//! - Each driver task holds a [`SlotGuard`]; the decrement happens in its
//!   `Drop`, so the slot is released on failure **and** on cancellation.
//! - Cancelling the worker token cancels the spawn loop and every driver
//!   at its next suspension point.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::{select, task::JoinSet, time};
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::pipeline::buffer::BufferTx;
use crate::produce::{Producer, ProducerFactory};

/// Supervises the producer pool for one pipeline run.
pub(crate) struct Worker {
    factory: Arc<dyn ProducerFactory>,
    buffer: BufferTx,
    bus: Bus,
    spawn_interval: Duration,
    item_interval: Duration,
    max_producers: usize,
}

impl Worker {
    pub(crate) fn new(
        factory: Arc<dyn ProducerFactory>,
        buffer: BufferTx,
        bus: Bus,
        spawn_interval: Duration,
        item_interval: Duration,
        max_producers: usize,
    ) -> Self {
        Self {
            factory,
            buffer,
            bus,
            spawn_interval,
            item_interval,
            max_producers,
        }
    }

    /// Runs the spawn loop until the token is cancelled, then drains the
    /// pool (every driver observes the same cancellation).
    pub(crate) async fn run(self, token: CancellationToken) {
        let active = Arc::new(AtomicUsize::new(0));
        let mut pool: JoinSet<()> = JoinSet::new();
        let mut next_id: u64 = 1;

        loop {
            select! {
                _ = time::sleep(self.spawn_interval) => {}
                _ = token.cancelled() => break,
            }

            // Keep the join set from accumulating finished drivers.
            while pool.try_join_next().is_some() {}

            if active.load(Ordering::Acquire) >= self.max_producers {
                continue;
            }

            match self.factory.create() {
                Ok(producer) => {
                    let id = next_id;
                    next_id += 1;

                    let slot = SlotGuard::acquire(&active);
                    self.bus.publish(
                        Event::new(EventKind::ProducerSpawned)
                            .with_producer(id)
                            .with_active(slot.count()),
                    );
                    pool.spawn(drive_producer(
                        id,
                        producer,
                        self.buffer.clone(),
                        self.item_interval,
                        slot,
                        token.child_token(),
                        self.bus.clone(),
                    ));
                }
                Err(e) => {
                    self.bus
                        .publish(Event::new(EventKind::SpawnRejected).with_reason(e.to_string()));
                }
            }
        }

        while pool.join_next().await.is_some() {}
    }
}

/// One occupied slot of the producer pool.
///
/// Incrementing happens on acquisition in the spawn loop; the matching
/// decrement lives in `Drop`, which also runs when the driver task is
/// cancelled mid-flight. That keeps the gauge exact on every exit path.
struct SlotGuard {
    active: Arc<AtomicUsize>,
}

impl SlotGuard {
    fn acquire(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self {
            active: Arc::clone(active),
        }
    }

    fn count(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Drives one producer at its own pace: wait, produce, hand off; stop on
/// the first failure or on cancellation.
async fn drive_producer(
    id: u64,
    mut producer: Box<dyn Producer>,
    buffer: BufferTx,
    item_interval: Duration,
    slot: SlotGuard,
    token: CancellationToken,
    bus: Bus,
) {
    // Moved into the task so cancellation releases the slot via Drop.
    let _slot = slot;

    loop {
        select! {
            _ = time::sleep(item_interval) => {}
            _ = token.cancelled() => return,
        }

        match producer.produce() {
            Ok(item) => {
                bus.publish(Event::new(EventKind::ItemProduced).with_producer(id));
                if !buffer.push(item) {
                    // Consumer is gone; nothing left to produce for.
                    return;
                }
            }
            Err(e) => {
                bus.publish(
                    Event::new(EventKind::ProducerFailed)
                        .with_producer(id)
                        .with_reason(e.to_string()),
                );
                return;
            }
        }
    }
}
