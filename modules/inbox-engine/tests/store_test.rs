//! Integration tests for the store and its dispatch loop.

use std::sync::Arc;

use chrono::Utc;
use inbox_common::{ActionStatus, ApplicationState, Category, Command, Notification};
use inbox_engine::{spawn_inbox, InboxStore, MemoryCommandLog, NoopCommandSink, NotificationReducer, Store, StoreError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn notification(id: &str) -> Notification {
    Notification::new(id, Category::Like, Utc::now())
}

fn store_with_log() -> (InboxStore<Arc<MemoryCommandLog>>, Arc<MemoryCommandLog>) {
    let log = Arc::new(MemoryCommandLog::new());
    let store = Store::new(NotificationReducer, log.clone(), ApplicationState::default());
    (store, log)
}

// =========================================================================
// Synchronous store
// =========================================================================

#[test]
fn concrete_optimistic_failure_scenario() {
    let (mut store, _log) = store_with_log();
    store.dispatch(Command::arrival(notification("a")));

    let started = store.dispatch(Command::start("a"));
    assert!(started.applied());
    assert!(started.after.notifications[0].is_read);
    assert_eq!(
        started.after.status(&"a".into()),
        Some(&ActionStatus {
            loading: true,
            error: None
        })
    );

    let failed = store.dispatch(Command::failure("a", false));
    let state = failed.after;
    assert!(!state.notifications[0].is_read);
    let status = state.status(&"a".into()).unwrap();
    assert!(!status.loading);
    assert_eq!(status.error.as_deref(), Some("Failed to update. Please try again."));
}

#[test]
fn arrival_twice_keeps_one_entry() {
    let (mut store, _log) = store_with_log();
    let n1 = notification("n1");

    let first = store.dispatch(Command::arrival(n1.clone()));
    let second = store.dispatch(Command::arrival(n1));

    assert!(first.applied());
    assert!(!second.applied());
    assert_eq!(*first.after, *second.after);
    assert_eq!(
        store.state().notifications.iter().filter(|n| n.id.as_str() == "n1").count(),
        1
    );
}

#[test]
fn log_records_commands_in_processing_order() {
    let (mut store, log) = store_with_log();

    store.dispatch(Command::arrival(notification("a")));
    store.dispatch(Command::start("ghost"));
    store.dispatch(Command::start("a"));
    store.dispatch(Command::success("a"));

    let entries = log.entries();
    let types: Vec<_> = entries.iter().map(|e| e.command_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["arrival", "mutation_start", "mutation_start", "mutation_success"]
    );
    let seqs: Vec<_> = entries.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert!(!entries[1].applied);
    assert_eq!(entries[2].payload["id"], "a");
}

// =========================================================================
// Spawned store
// =========================================================================

#[tokio::test]
async fn spawned_store_reduces_in_send_order() {
    let (handle, _task) = spawn_inbox(NoopCommandSink);

    handle.dispatch(Command::arrival(notification("n1"))).unwrap();
    handle.dispatch(Command::arrival(notification("n2"))).unwrap();
    handle.dispatch(Command::start("n1")).unwrap();
    let last = handle.dispatch_and_wait(Command::success("n1")).await.unwrap();

    let ids: Vec<_> = last.after.notifications.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n2", "n1"]);
    assert!(last.after.get(&"n1".into()).unwrap().is_read);
    assert_eq!(handle.state(), last.after);
}

#[tokio::test]
async fn subscribers_see_applied_transitions() {
    let (handle, _task) = spawn_inbox(NoopCommandSink);
    let mut updates = handle.subscribe();

    handle
        .dispatch_and_wait(Command::arrival(notification("n1")))
        .await
        .unwrap();

    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().notifications.len(), 1);

    // No-op: nothing new is published.
    handle.dispatch_and_wait(Command::start("ghost")).await.unwrap();
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test]
async fn dispatch_after_loop_stops_is_closed() {
    let (handle, task) = spawn_inbox(NoopCommandSink);
    task.abort();
    let _ = task.await;

    assert_eq!(
        handle.dispatch(Command::start("a")),
        Err(StoreError::Closed)
    );
    assert!(matches!(
        handle.dispatch_and_wait(Command::start("a")).await,
        Err(StoreError::Closed)
    ));
}
