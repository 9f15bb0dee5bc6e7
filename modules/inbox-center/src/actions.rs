//! Mark-read / mark-unread with optimistic apply and rollback.

use std::sync::Arc;

use inbox_common::{Command, NotificationId};
use inbox_engine::{InboxHandle, StoreError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::transport::ReadStatusTransport;

/// How a round trip ended. Carries the `is_read` value left in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Confirmed { is_read: bool },
    RolledBack { is_read: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No notification with that id.
    Unknown,
    /// A previous toggle for the id has not resolved yet.
    InFlight,
}

#[derive(Debug)]
pub enum Toggle {
    /// The optimistic flip was applied; the task resolves the round trip.
    Pending(JoinHandle<Result<Resolution, StoreError>>),
    Skipped(SkipReason),
}

/// Flips `is_read` optimistically, then confirms or rolls back depending on
/// what the transport says.
#[derive(Clone)]
pub struct ReadToggler {
    store: InboxHandle,
    transport: Arc<dyn ReadStatusTransport>,
}

impl ReadToggler {
    pub fn new(store: InboxHandle, transport: Arc<dyn ReadStatusTransport>) -> Self {
        Self { store, transport }
    }

    pub async fn toggle(&self, id: &NotificationId) -> Result<Toggle, StoreError> {
        let transition = self.store.dispatch_and_wait(Command::start(id.clone())).await?;

        let previous = match transition.before.get(id) {
            Some(notification) if transition.applied() => notification.is_read,
            Some(_) => {
                debug!(%id, "Toggle ignored: update already in flight");
                return Ok(Toggle::Skipped(SkipReason::InFlight));
            }
            None => {
                debug!(%id, "Toggle ignored: unknown notification");
                return Ok(Toggle::Skipped(SkipReason::Unknown));
            }
        };
        let target = !previous;

        let store = self.store.clone();
        let transport = Arc::clone(&self.transport);
        let id = id.clone();

        let task = tokio::spawn(async move {
            match transport.set_read(&id, target).await {
                Ok(()) => {
                    store.dispatch_and_wait(Command::success(id.clone())).await?;
                    info!(%id, is_read = target, "Read status confirmed");
                    Ok(Resolution::Confirmed { is_read: target })
                }
                Err(err) => {
                    store.dispatch_and_wait(Command::failure(id.clone(), previous)).await?;
                    warn!(%id, error = %err, "Read status rejected, rolled back");
                    Ok(Resolution::RolledBack { is_read: previous })
                }
            }
        });

        Ok(Toggle::Pending(task))
    }
}
