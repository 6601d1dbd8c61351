//! Deterministic fakes shared by the pipeline tests: perfect and
//! always-failing producers, a scriptable factory instrumented with a
//! live-producer gauge, and recording/flaky sinks.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{ProduceError, SpawnError, StoreError};
use crate::produce::{Item, ItemSink, Producer, ProducerFactory};

/// Producer that always succeeds, yielding sequential codes and bumping a
/// shared production counter.
struct PerfectProducer {
    produced: Arc<AtomicU64>,
}

impl Producer for PerfectProducer {
    fn produce(&mut self) -> Result<Item, ProduceError> {
        let n = self.produced.fetch_add(1, Ordering::SeqCst);
        Ok(Item::new(n.to_string()))
    }
}

/// Producer that fails permanently on its first call.
struct FailingProducer;

impl Producer for FailingProducer {
    fn produce(&mut self) -> Result<Item, ProduceError> {
        Err(ProduceError::Faulted)
    }
}

/// Wraps a producer so the factory's live gauge drops when the driving
/// task releases the producer (including on cancellation).
struct Gauged {
    inner: Box<dyn Producer>,
    _live: LiveGuard,
}

struct LiveGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Producer for Gauged {
    fn produce(&mut self) -> Result<Item, ProduceError> {
        self.inner.produce()
    }
}

/// Scriptable factory with instrumentation: counts creations, tracks the
/// live-producer gauge and its high-water mark, and shares one production
/// counter across every producer it hands out.
pub(crate) struct FakeFactory {
    make: Mutex<Box<dyn FnMut(&Arc<AtomicU64>) -> Box<dyn Producer> + Send>>,
    produced: Arc<AtomicU64>,
    created: AtomicUsize,
    live: Arc<AtomicUsize>,
    peak_live: AtomicUsize,
}

impl FakeFactory {
    fn with_script(
        make: impl FnMut(&Arc<AtomicU64>) -> Box<dyn Producer> + Send + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            make: Mutex::new(Box::new(make)),
            produced: Arc::new(AtomicU64::new(0)),
            created: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
            peak_live: AtomicUsize::new(0),
        })
    }

    /// Every producer succeeds forever.
    pub(crate) fn perfect() -> Arc<Self> {
        Self::with_script(|produced| {
            Box::new(PerfectProducer {
                produced: Arc::clone(produced),
            })
        })
    }

    /// Every producer fails on its first call.
    pub(crate) fn failing() -> Arc<Self> {
        Self::with_script(|_| Box::new(FailingProducer))
    }

    /// Producers alternate failing/perfect, starting with a failing one.
    pub(crate) fn alternating() -> Arc<Self> {
        let mut next_is_perfect = false;
        Self::with_script(move |produced| {
            let p: Box<dyn Producer> = if next_is_perfect {
                Box::new(PerfectProducer {
                    produced: Arc::clone(produced),
                })
            } else {
                Box::new(FailingProducer)
            };
            next_is_perfect = !next_is_perfect;
            p
        })
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn produced(&self) -> u64 {
        self.produced.load(Ordering::SeqCst)
    }

    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }
}

impl ProducerFactory for FakeFactory {
    fn create(&self) -> Result<Box<dyn Producer>, SpawnError> {
        self.created.fetch_add(1, Ordering::SeqCst);

        let now_live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_live.fetch_max(now_live, Ordering::SeqCst);

        let inner = (self
            .make
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()))(&self.produced);

        Ok(Box::new(Gauged {
            inner,
            _live: LiveGuard {
                live: Arc::clone(&self.live),
            },
        }))
    }
}

/// Sink that records every store instantly.
pub(crate) struct RecordingSink {
    calls: AtomicU64,
    items: Mutex<Vec<Item>>,
}

impl RecordingSink {
    pub(crate) fn instant() -> Self {
        Self {
            calls: AtomicU64::new(0),
            items: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stored_count(&self) -> u64 {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len() as u64
    }
}

#[async_trait]
impl ItemSink for RecordingSink {
    async fn store(&self, item: Item) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(item);
        Ok(())
    }
}

/// Sink that fails on the n-th call (1-based) and keeps counting calls so
/// tests can assert that nothing stores after the fatal one.
pub(crate) struct FlakySink {
    fail_on: u64,
    calls: AtomicU64,
}

impl FlakySink {
    pub(crate) fn failing_on(call: u64) -> Self {
        Self {
            fail_on: call,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSink for FlakySink {
    async fn store(&self, _item: Item) -> Result<(), StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= self.fail_on {
            return Err(StoreError::new(format!("injected failure on call {call}")));
        }
        Ok(())
    }
}
