//! Notification id generators.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use inbox_common::NotificationId;
use uuid::Uuid;

/// Hands out ids that are never reused for the generator's lifetime.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> NotificationId;
}

/// `notif_1`, `notif_2`, ... from a shared counter.
///
/// Clones share the counter, so every clone keeps handing out fresh ids.
/// The counter only ever moves forward.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: Arc<AtomicU64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> NotificationId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        NotificationId::new(format!("notif_{n}"))
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> NotificationId {
        NotificationId::new(Uuid::new_v4().to_string())
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Arc<G> {
    fn next_id(&self) -> NotificationId {
        (**self).next_id()
    }
}
