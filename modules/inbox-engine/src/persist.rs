//! CommandSink implementations.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::CommandSink;

/// A command as seen by the store, after reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedCommand {
    /// Processing order, starting at 1.
    pub seq: i64,
    pub ts: DateTime<Utc>,
    pub command_type: String,
    pub payload: serde_json::Value,
    /// False when the reducer returned the state unchanged.
    pub applied: bool,
}

// ---------------------------------------------------------------------------
// MemoryCommandLog
// ---------------------------------------------------------------------------

/// In-memory command log. Thread-safe.
#[derive(Default)]
pub struct MemoryCommandLog {
    entries: Mutex<Vec<LoggedCommand>>,
}

impl MemoryCommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in processing order.
    pub fn entries(&self) -> Vec<LoggedCommand> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommandSink for MemoryCommandLog {
    fn record(&self, entry: LoggedCommand) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

// ---------------------------------------------------------------------------
// NoopCommandSink
// ---------------------------------------------------------------------------

/// Discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCommandSink;

impl CommandSink for NoopCommandSink {
    fn record(&self, _entry: LoggedCommand) {}
}

// ---------------------------------------------------------------------------
// Arc<P> blanket: lets tests keep a handle on the log
// ---------------------------------------------------------------------------

impl<P: CommandSink + ?Sized> CommandSink for Arc<P> {
    fn record(&self, entry: LoggedCommand) {
        (**self).record(entry)
    }
}
