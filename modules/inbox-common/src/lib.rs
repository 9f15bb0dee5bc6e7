//! Shared model for the notification inbox.
//!
//! Plain data only: notifications, per-item action status, the application
//! state value, the closed command set, configuration, and the read-only
//! view derivations (day grouping, pagination). No I/O beyond reading env.

pub mod commands;
pub mod config;
pub mod error;
pub mod types;
pub mod view;

pub use commands::Command;
pub use config::{CenterConfig, SourceConfig, TransportConfig};
pub use error::{ConfigError, TransportError, UPDATE_FAILED_MESSAGE};
pub use types::{ActionStatus, ApplicationState, Category, Notification, NotificationId};
pub use view::{group_by_day, DayGroup, Pager};
