//! # Shared hand-off buffer between producers and the manager.
//!
//! An unbounded multi-writer/single-reader queue built on
//! [`tokio::sync::mpsc`]. Every producer-driving task holds a clone of
//! [`BufferTx`]; the manager exclusively owns the [`BufferRx`] end.
//!
//! ## Guarantees
//! - An item is visible to the reader only after its enqueue completed
//!   (enqueue/dequeue are linearizable); nothing is lost or duplicated.
//! - Items from one producer arrive in the order that producer pushed
//!   them. Interleaving **across** producers follows arrival order and is
//!   otherwise unspecified.

use tokio::sync::mpsc;

use crate::produce::Item;

/// Creates a connected buffer pair.
pub(crate) fn shared_buffer() -> (BufferTx, BufferRx) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BufferTx { tx }, BufferRx { rx })
}

/// Write end of the shared buffer; one clone per producer-driving task.
#[derive(Clone)]
pub(crate) struct BufferTx {
    tx: mpsc::UnboundedSender<Item>,
}

impl BufferTx {
    /// Enqueues one item. Returns `false` when the reader is gone, which
    /// tells the producer task to stop.
    pub(crate) fn push(&self, item: Item) -> bool {
        self.tx.send(item).is_ok()
    }
}

/// Read end of the shared buffer; owned exclusively by the manager.
pub(crate) struct BufferRx {
    rx: mpsc::UnboundedReceiver<Item>,
}

impl BufferRx {
    /// Dequeues one item without waiting. `None` means the buffer is
    /// currently empty (or fully drained after all writers dropped).
    pub(crate) fn try_pop(&mut self) -> Option<Item> {
        self.rx.try_recv().ok()
    }
}
