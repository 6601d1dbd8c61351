//! # Producer contract and the standard fault-injecting implementation.
//!
//! A [`Producer`] yields one [`Item`] per `produce()` call, enforces a
//! minimum spacing between calls, and can permanently fail. Once broken it
//! must never attempt work again; every further call returns
//! [`ProduceError::Broken`].
//!
//! Time is measured with [`tokio::time::Instant`], so producers follow the
//! runtime clock: in tests running under a paused clock the spacing checks
//! are exact and deterministic.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use crate::error::ProduceError;
use crate::produce::item::Item;

const CODE_LEN: usize = 5;
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// # A stateful, rate-limited, breakable item source.
///
/// Implementations are owned exclusively by the producer-driving task that
/// the worker spawned for them; `produce` therefore takes `&mut self` and
/// needs no internal locking.
///
/// ## Contract
/// - On success, record the call time and enforce the minimum spacing
///   against the next call ([`ProduceError::TooSoon`]).
/// - A fault breaks the producer permanently: the failing call returns
///   [`ProduceError::Faulted`], every later call [`ProduceError::Broken`].
pub trait Producer: Send + 'static {
    /// Yields the next item or fails.
    fn produce(&mut self) -> Result<Item, ProduceError>;
}

/// Standard producer: random 5-character codes, random permanent faults.
///
/// Mirrors a flaky machine on a factory floor: each call has a
/// 1-in-`fault_odds` chance of breaking the machine for good.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use beltline::{Producer, StandardProducer};
///
/// let mut producer = StandardProducer::new(Duration::from_secs(1)).with_fault_odds(0);
/// let item = producer.produce().unwrap();
/// assert_eq!(item.code().len(), 5);
/// ```
pub struct StandardProducer {
    min_spacing: Duration,
    fault_odds: u32,
    last_item_at: Option<Instant>,
    broken: bool,
}

impl StandardProducer {
    /// Creates a producer with the given minimum inter-item spacing and
    /// the default fault odds (1 in 8 per call).
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            fault_odds: 8,
            last_item_at: None,
            broken: false,
        }
    }

    /// Overrides the fault odds: a fault occurs with probability
    /// `1/odds` per call; `0` disables faults entirely.
    pub fn with_fault_odds(mut self, odds: u32) -> Self {
        self.fault_odds = odds;
        self
    }

    /// True once this producer has permanently failed.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    fn roll_fault(&self) -> bool {
        self.fault_odds != 0 && rand::rng().random_range(0..self.fault_odds) == 0
    }
}

impl Producer for StandardProducer {
    fn produce(&mut self) -> Result<Item, ProduceError> {
        if self.broken {
            return Err(ProduceError::Broken);
        }
        if let Some(last) = self.last_item_at {
            let elapsed = last.elapsed();
            if elapsed < self.min_spacing {
                return Err(ProduceError::TooSoon {
                    remaining: self.min_spacing - elapsed,
                });
            }
        }
        if self.roll_fault() {
            self.broken = true;
            return Err(ProduceError::Faulted);
        }
        self.last_item_at = Some(Instant::now());
        Ok(Item::new(random_code()))
    }
}

fn random_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn produces_codes_when_spacing_elapsed() {
        let mut p = StandardProducer::new(Duration::from_secs(1)).with_fault_odds(0);

        let first = p.produce().unwrap();
        assert_eq!(first.code().len(), CODE_LEN);
        assert!(first.code().bytes().all(|b| CODE_ALPHABET.contains(&b)));

        time::advance(Duration::from_secs(1)).await;
        p.produce().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_calls_before_spacing_elapsed() {
        let mut p = StandardProducer::new(Duration::from_secs(1)).with_fault_odds(0);
        p.produce().unwrap();

        time::advance(Duration::from_millis(400)).await;
        match p.produce() {
            Err(ProduceError::TooSoon { remaining }) => {
                assert_eq!(remaining, Duration::from_millis(600));
            }
            other => panic!("expected TooSoon, got {other:?}"),
        }

        // A rejected call must not reset the spacing window.
        time::advance(Duration::from_millis(600)).await;
        p.produce().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn fault_breaks_the_producer_permanently() {
        // fault_odds = 1 makes the roll deterministic.
        let mut p = StandardProducer::new(Duration::from_millis(1)).with_fault_odds(1);

        assert!(matches!(p.produce(), Err(ProduceError::Faulted)));
        assert!(p.is_broken());
        for _ in 0..3 {
            time::advance(Duration::from_secs(5)).await;
            assert!(matches!(p.produce(), Err(ProduceError::Broken)));
        }
    }
}
