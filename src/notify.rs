//! Render → controller notifications.
//!
//! A fixed-capacity SPSC ring of `Copy` messages, so the render step can
//! report swaps without allocating. If the ring is full the render step keeps
//! the notification armed and retries on the next block.

use ampswap_neural::{ModelPath, RecommendedLevels};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// Path of the model now live. Empty after a clear.
    ModelPath(ModelPath),
    /// Trims recommended by the model now live. Zero after a clear.
    RecommendedLevels(RecommendedLevels),
}

pub(crate) struct NotificationSender {
    producer: HeapProd<Notification>,
}

impl NotificationSender {
    /// Returns `false` if the ring is full.
    #[inline]
    pub(crate) fn try_send(&mut self, notification: Notification) -> bool {
        self.producer.try_push(notification).is_ok()
    }
}

pub(crate) struct NotificationReceiver {
    consumer: HeapCons<Notification>,
}

impl NotificationReceiver {
    pub(crate) fn try_recv(&mut self) -> Option<Notification> {
        self.consumer.try_pop()
    }
}

pub(crate) fn channel(capacity: usize) -> (NotificationSender, NotificationReceiver) {
    let (producer, consumer) = HeapRb::<Notification>::new(capacity).split();
    (
        NotificationSender { producer },
        NotificationReceiver { consumer },
    )
}
