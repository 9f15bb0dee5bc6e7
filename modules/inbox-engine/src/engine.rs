//! The dispatch loop.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::persist::LoggedCommand;
use crate::traits::{CommandLike, CommandSink, Reducer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store loop has stopped")]
    Closed,
}

/// The states on either side of one reduced command.
#[derive(Debug)]
pub struct Transition<S> {
    pub before: Arc<S>,
    pub after: Arc<S>,
}

impl<S> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            before: Arc::clone(&self.before),
            after: Arc::clone(&self.after),
        }
    }
}

impl<S> Transition<S> {
    /// False when the reducer handed back the input state.
    pub fn applied(&self) -> bool {
        !Arc::ptr_eq(&self.before, &self.after)
    }
}

/// Owns the authoritative state and the only place commands are reduced.
///
/// Reduce → record → swap, one command at a time.
pub struct Store<C, S, Red, P>
where
    C: CommandLike,
    S: Send + Sync,
    Red: Reducer<C, S>,
    P: CommandSink,
{
    reducer: Red,
    sink: P,
    state: Arc<S>,
    next_seq: i64,
    _phantom: PhantomData<fn() -> C>,
}

impl<C, S, Red, P> Store<C, S, Red, P>
where
    C: CommandLike,
    S: Send + Sync,
    Red: Reducer<C, S>,
    P: CommandSink,
{
    pub fn new(reducer: Red, sink: P, initial: S) -> Self {
        Self {
            reducer,
            sink,
            state: Arc::new(initial),
            next_seq: 1,
            _phantom: PhantomData,
        }
    }

    /// Reduce one command against the current state and make the result current.
    pub fn dispatch(&mut self, command: C) -> Transition<S> {
        let before = Arc::clone(&self.state);
        let after = self.reducer.reduce(&before, &command);
        let transition = Transition { before, after };

        let seq = self.next_seq;
        self.next_seq += 1;
        let applied = transition.applied();
        debug!(seq, command_type = command.command_type_str(), applied, "Command reduced");

        self.sink.record(LoggedCommand {
            seq,
            ts: Utc::now(),
            command_type: command.command_type_str().to_string(),
            payload: command.to_log_payload(),
            applied,
        });

        self.state = Arc::clone(&transition.after);
        transition
    }

    pub fn state(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }
}

// ---------------------------------------------------------------------------
// Store task: single consumer of a command channel
// ---------------------------------------------------------------------------

enum Envelope<C, S> {
    Fire(C),
    Ask(C, oneshot::Sender<Transition<S>>),
}

/// Cloneable entry point to a spawned store.
pub struct StoreHandle<C, S> {
    commands: mpsc::UnboundedSender<Envelope<C, S>>,
    state: watch::Receiver<Arc<S>>,
}

impl<C, S> Clone for StoreHandle<C, S> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            state: self.state.clone(),
        }
    }
}

impl<C, S> StoreHandle<C, S>
where
    C: Send + 'static,
    S: Send + Sync + 'static,
{
    /// Queue a command without waiting for it to be reduced.
    pub fn dispatch(&self, command: C) -> Result<(), StoreError> {
        self.commands
            .send(Envelope::Fire(command))
            .map_err(|_| StoreError::Closed)
    }

    /// Queue a command and wait for its transition.
    pub async fn dispatch_and_wait(&self, command: C) -> Result<Transition<S>, StoreError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Envelope::Ask(command, reply_tx))
            .map_err(|_| StoreError::Closed)?;
        reply_rx.await.map_err(|_| StoreError::Closed)
    }

    /// Latest published state.
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver that is notified after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
        self.state.clone()
    }
}

/// Run `store` on its own task. Commands from every handle are reduced in
/// the order they were sent. The task ends once all handles are dropped.
pub fn spawn_store<C, S, Red, P>(mut store: Store<C, S, Red, P>) -> (StoreHandle<C, S>, JoinHandle<()>)
where
    C: CommandLike,
    S: Send + Sync + 'static,
    Red: Reducer<C, S> + 'static,
    P: CommandSink + 'static,
{
    let (commands_tx, mut commands_rx) = mpsc::unbounded_channel::<Envelope<C, S>>();
    let (state_tx, state_rx) = watch::channel(store.state());

    let task = tokio::spawn(async move {
        while let Some(envelope) = commands_rx.recv().await {
            let (command, reply) = match envelope {
                Envelope::Fire(command) => (command, None),
                Envelope::Ask(command, reply) => (command, Some(reply)),
            };

            let transition = store.dispatch(command);
            if transition.applied() {
                state_tx.send_replace(Arc::clone(&transition.after));
            }
            if let Some(reply) = reply {
                // Caller may have stopped waiting; the command still counts.
                let _ = reply.send(transition);
            }
        }
        info!("Store loop stopped: all handles dropped");
    });

    (
        StoreHandle {
            commands: commands_tx,
            state: state_rx,
        },
        task,
    )
}
