//! Core traits for the command store.

use std::sync::Arc;

use crate::persist::LoggedCommand;

/// Commands carry a type string and know how to serialize for the command log.
pub trait CommandLike: Clone + Send + Sync + 'static {
    fn command_type_str(&self) -> &'static str;

    fn to_log_payload(&self) -> serde_json::Value;
}

/// Pure state transitions. No I/O, no side effects.
///
/// Takes the current state by shared reference and returns the next one.
/// A command that changes nothing must hand back the same `Arc`, so callers
/// can tell applied transitions from no-ops with `Arc::ptr_eq`.
pub trait Reducer<C: CommandLike, S: Send + Sync>: Send + Sync {
    fn reduce(&self, state: &Arc<S>, command: &C) -> Arc<S>;
}

/// Records every command the store processes, in processing order.
///
/// Implemented by `MemoryCommandLog` (tests, demo) and `NoopCommandSink`.
/// Also implemented for `Arc<P>` so a log can be shared for assertions.
pub trait CommandSink: Send + Sync {
    fn record(&self, entry: LoggedCommand);
}
