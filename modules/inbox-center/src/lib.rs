//! The notification center: event source → store, plus optimistic
//! read toggling against a simulated transport.

pub mod actions;
pub mod center;
pub mod transport;

pub use actions::{ReadToggler, Resolution, SkipReason, Toggle};
pub use center::{GroupView, ItemView, NotificationCenter, PageView};
pub use transport::{ReadStatusTransport, SimulatedTransport};
