//! Command store for the notification inbox.
//!
//! A pure `Reducer` decides every transition; the `Store` owns the current
//! state and records each command; `spawn_store` puts the store behind a
//! single-consumer channel so timers and transport tasks can feed it.

pub mod engine;
pub mod persist;
pub mod reducer;
pub mod traits;

use inbox_common::{ApplicationState, Command};

pub use engine::{spawn_store, Store, StoreError, StoreHandle, Transition};
pub use persist::{LoggedCommand, MemoryCommandLog, NoopCommandSink};
pub use reducer::NotificationReducer;
pub use traits::{CommandLike, CommandSink, Reducer};

/// The store specialised to notifications.
pub type InboxStore<P> = Store<Command, ApplicationState, NotificationReducer, P>;

/// Handle to a spawned notification store.
pub type InboxHandle = StoreHandle<Command, ApplicationState>;

/// Spawn a notification store with an empty initial state.
pub fn spawn_inbox<P: CommandSink + 'static>(sink: P) -> (InboxHandle, tokio::task::JoinHandle<()>) {
    spawn_store(Store::new(NotificationReducer, sink, ApplicationState::default()))
}
