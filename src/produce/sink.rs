//! # Durable item storage.
//!
//! [`ItemSink`] is the external collaborator the manager stores items
//! into. The operation is slow and fallible, and must never overlap with
//! itself; the pipeline upholds that single-writer discipline by
//! construction, because only the single-threaded manager ever calls it.
//!
//! A sink failure is **fatal** to the pipeline; see
//! [`PipelineError::Store`](crate::PipelineError::Store).

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;

use crate::error::StoreError;
use crate::produce::item::Item;

/// # Item storage contract.
///
/// `store` may take a long time (it is a suspension point of the
/// pipeline). The caller guarantees calls never overlap.
#[async_trait]
pub trait ItemSink: Send + Sync + 'static {
    /// Durably stores one item.
    async fn store(&self, item: Item) -> Result<(), StoreError>;
}

/// Standard sink: simulates a slow store and enforces the single-writer
/// discipline itself.
///
/// Each store sleeps for the configured delay. If a second store arrives
/// while one is in flight, the sink breaks permanently and every call from
/// then on fails — the same behavior as the factory-floor storage this
/// models, where an overlap wrecks the control unit.
pub struct StandardItemSink {
    store_delay: Duration,
    busy: AtomicBool,
    broken: AtomicBool,
    items: Mutex<Vec<Item>>,
}

impl StandardItemSink {
    /// Creates a sink whose stores take `store_delay`.
    pub fn new(store_delay: Duration) -> Self {
        Self {
            store_delay,
            busy: AtomicBool::new(false),
            broken: AtomicBool::new(false),
            items: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything stored so far.
    pub fn items(&self) -> Vec<Item> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// True once an overlapping store has broken the sink.
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ItemSink for StandardItemSink {
    async fn store(&self, item: Item) -> Result<(), StoreError> {
        if self.broken.load(Ordering::Acquire) {
            return Err(StoreError::new("sink is broken after overlapping stores"));
        }
        if self.busy.swap(true, Ordering::AcqRel) {
            self.broken.store(true, Ordering::Release);
            return Err(StoreError::new("two store calls overlapped"));
        }

        time::sleep(self.store_delay).await;

        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(item);
        self.busy.store(false, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stores_sequentially() {
        let sink = StandardItemSink::new(Duration::from_millis(500));
        sink.store(Item::new("one")).await.unwrap();
        sink.store(Item::new("two")).await.unwrap();

        let items = sink.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].code(), "one");
        assert_eq!(items[1].code(), "two");
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_stores_break_the_sink() {
        let sink = std::sync::Arc::new(StandardItemSink::new(Duration::from_millis(500)));

        let first = {
            let sink = sink.clone();
            tokio::spawn(async move { sink.store(Item::new("a")).await })
        };
        // Let the first store reach its sleep, then overlap.
        tokio::task::yield_now().await;
        time::advance(Duration::from_millis(1)).await;
        let overlap = sink.store(Item::new("b")).await;

        assert!(overlap.is_err());
        assert!(sink.is_broken());
        first.await.unwrap().unwrap();

        // Broken stays broken.
        assert!(sink.store(Item::new("c")).await.is_err());
    }
}
