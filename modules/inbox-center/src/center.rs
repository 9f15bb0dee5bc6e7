//! Wires the event source, the store, and the read toggler together.

use std::sync::Arc;

use inbox_common::{
    group_by_day, ApplicationState, CenterConfig, Command, Notification, NotificationId, Pager,
};
use inbox_engine::{spawn_inbox, InboxHandle, LoggedCommand, MemoryCommandLog, StoreError};
use inbox_stream::{EventSource, HandlerSlot, IdGenerator, SequentialIds, SourceHandle};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actions::{ReadToggler, Toggle};
use crate::transport::{ReadStatusTransport, SimulatedTransport};

/// One notification as a list consumer needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: NotificationId,
    pub message: String,
    pub is_read: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub label: String,
    pub items: Vec<ItemView>,
}

/// The current page of day groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: usize,
    pub page_count: usize,
    pub groups: Vec<GroupView>,
}

pub struct NotificationCenter {
    store: InboxHandle,
    store_task: JoinHandle<()>,
    source: SourceHandle,
    slot: HandlerSlot,
    toggler: ReadToggler,
    pager: Pager,
    log: Arc<MemoryCommandLog>,
}

impl NotificationCenter {
    /// Start with `notif_<n>` ids and the simulated transport.
    pub fn start(config: &CenterConfig) -> Self {
        let source = EventSource::new(config.source.clone(), SequentialIds::new());
        let transport = Arc::new(SimulatedTransport::new(config.transport.clone()));
        Self::with_parts(config, source, transport)
    }

    pub fn with_parts<G: IdGenerator + 'static>(
        config: &CenterConfig,
        source: EventSource<G>,
        transport: Arc<dyn ReadStatusTransport>,
    ) -> Self {
        let log = Arc::new(MemoryCommandLog::new());
        let (store, store_task) = spawn_inbox(Arc::clone(&log));

        let slot = HandlerSlot::new();
        let arrivals = store.clone();
        slot.set(move |notification: Notification| {
            if let Err(err) = arrivals.dispatch(Command::arrival(notification)) {
                warn!(error = %err, "Dropping arrival");
            }
        });
        let source = source.spawn(slot.clone());
        info!("Notification center started");

        Self {
            toggler: ReadToggler::new(store.clone(), transport),
            store,
            store_task,
            source,
            slot,
            pager: Pager::new(config.page_size),
            log,
        }
    }

    /// Inbound delivery, same path the event source uses.
    pub fn deliver(&self, notification: Notification) -> Result<(), StoreError> {
        self.store.dispatch(Command::arrival(notification))
    }

    pub fn dispatch(&self, command: Command) -> Result<(), StoreError> {
        self.store.dispatch(command)
    }

    pub async fn toggle_read(&self, id: &NotificationId) -> Result<Toggle, StoreError> {
        self.toggler.toggle(id).await
    }

    pub fn state(&self) -> Arc<ApplicationState> {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ApplicationState>> {
        self.store.subscribe()
    }

    /// Replace what happens on arrival. The store no longer sees source
    /// arrivals unless the new handler forwards them.
    pub fn on_arrival(&self, handler: impl Fn(Notification) + Send + Sync + 'static) {
        self.slot.set(handler);
    }

    pub fn command_log(&self) -> Vec<LoggedCommand> {
        self.log.entries()
    }

    pub fn step_page(&mut self, delta: isize) -> usize {
        let state = self.state();
        let total = group_by_day(&state.notifications).len();
        self.pager.step(delta, total)
    }

    pub fn page_view(&mut self) -> PageView {
        let state = self.state();
        let groups = group_by_day(&state.notifications);
        let page_count = self.pager.page_count(groups.len());

        let groups = self
            .pager
            .page(&groups)
            .iter()
            .map(|group| GroupView {
                label: group.label.clone(),
                items: group
                    .notifications
                    .iter()
                    .map(|n| {
                        let status = state.status(&n.id);
                        ItemView {
                            id: n.id.clone(),
                            message: n.message.clone(),
                            is_read: n.is_read,
                            loading: status.is_some_and(|s| s.loading),
                            error: status.and_then(|s| s.error.clone()),
                        }
                    })
                    .collect(),
            })
            .collect();

        PageView {
            page: self.pager.current(),
            page_count,
            groups,
        }
    }

    /// Tear down the event source and let the store drain. Returns how many
    /// arrivals the source delivered.
    pub async fn shutdown(self) -> u64 {
        let delivered = self.source.stop().await;
        self.slot.clear();
        drop(self.toggler);
        drop(self.store);
        // Pending toggles hold store handles; the loop ends once they resolve.
        let _ = self.store_task.await;
        info!(delivered, "Notification center stopped");
        delivered
    }
}
