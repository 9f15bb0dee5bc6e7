//! Simulated push channel for the notification inbox.
//!
//! Owns id generation and synthetic payloads; knows nothing about the store.

pub mod factory;
pub mod ids;
pub mod source;

pub use factory::NotificationFactory;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use source::{EventSource, Handler, HandlerSlot, SourceHandle};
