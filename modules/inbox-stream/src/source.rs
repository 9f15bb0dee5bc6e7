//! Simulated push channel.
//!
//! An `EventSource` yields notifications at random intervals, either as a
//! raw `Stream` (`arrivals`) or driven on its own task (`spawn`), where each
//! notification goes to whatever handler sits in the `HandlerSlot` when the
//! timer fires.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_stream::stream;
use chrono::Utc;
use futures::{Stream, StreamExt};
use inbox_common::{Notification, SourceConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::factory::NotificationFactory;
use crate::ids::IdGenerator;

pub type Handler = Arc<dyn Fn(Notification) + Send + Sync>;

/// The current delivery handler. Read at fire time, so a replacement takes
/// effect on the next delivery, including one whose timer is already running.
#[derive(Clone, Default)]
pub struct HandlerSlot {
    current: Arc<Mutex<Option<Handler>>>,
}

impl HandlerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(handler: impl Fn(Notification) + Send + Sync + 'static) -> Self {
        let slot = Self::new();
        slot.set(handler);
        slot
    }

    /// Replace the handler.
    pub fn set(&self, handler: impl Fn(Notification) + Send + Sync + 'static) {
        *self.lock() = Some(Arc::new(handler));
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Hand `notification` to the current handler. Returns false if the slot
    /// is empty and the notification was dropped.
    pub fn deliver(&self, notification: Notification) -> bool {
        // Clone out so the handler runs without the lock held; it may replace itself.
        let handler = self.lock().clone();
        match handler {
            Some(handler) => {
                handler(notification);
                true
            }
            None => {
                debug!(id = %notification.id, "No handler set, dropping notification");
                false
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Handler>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Lazy, infinite, single-use source of notification arrivals.
pub struct EventSource<G> {
    config: SourceConfig,
    factory: NotificationFactory<G>,
    rng: StdRng,
}

impl<G: IdGenerator + 'static> EventSource<G> {
    pub fn new(config: SourceConfig, ids: G) -> Self {
        Self {
            config,
            factory: NotificationFactory::new(ids),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a caller-provided RNG (seeded in tests).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// The arrival sequence itself. Each item is produced only when polled,
    /// after a fresh uniform delay from the configured interval.
    pub fn arrivals(self) -> impl Stream<Item = Notification> + Send {
        let Self {
            config,
            factory,
            mut rng,
        } = self;
        let min_ms = duration_ms(config.arrival_min);
        let max_ms = duration_ms(config.arrival_max).max(min_ms);

        stream! {
            loop {
                let delay = Duration::from_millis(rng.random_range(min_ms..=max_ms));
                tokio::time::sleep(delay).await;
                yield factory.build(&mut rng, Utc::now());
            }
        }
    }

    /// Drive the arrivals on a new task, delivering each one through `slot`.
    pub fn spawn(self, slot: HandlerSlot) -> SourceHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let arrivals = self.arrivals();
            futures::pin_mut!(arrivals);
            let mut delivered = 0u64;

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    next = arrivals.next() => {
                        let Some(notification) = next else { break };
                        // Teardown may have landed while this tick was pending.
                        if *shutdown_rx.borrow() {
                            debug!(id = %notification.id, "Suppressed arrival after teardown");
                            break;
                        }
                        debug!(id = %notification.id, category = %notification.category, "Notification arrived");
                        if slot.deliver(notification) {
                            delivered += 1;
                        }
                    }
                }
            }

            info!(delivered, "Event source stopped");
            delivered
        });

        SourceHandle {
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Teardown handle for a spawned source. Dropping it also tears down.
pub struct SourceHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<u64>>,
}

impl SourceHandle {
    /// Signal teardown. No delivery happens after this returns.
    pub fn cancel(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Cancel and wait for the task to finish. Returns how many
    /// notifications were delivered to a handler.
    pub async fn stop(mut self) -> u64 {
        self.cancel();
        match self.task.take() {
            Some(task) => task.await.unwrap_or(0),
            None => 0,
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
