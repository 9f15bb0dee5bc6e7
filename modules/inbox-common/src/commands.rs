//! The closed command set driving the state store.

use serde::{Deserialize, Serialize};

use crate::types::{Notification, NotificationId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// A notification became known. Duplicate ids are ignored.
    Arrival { notification: Notification },
    /// Optimistically flip `is_read` and mark the id in flight.
    MutationStart { id: NotificationId },
    /// The transport confirmed; the optimistic value stands.
    MutationSuccess { id: NotificationId },
    /// The transport rejected; restore the value from before the flip.
    #[serde(rename_all = "camelCase")]
    MutationFailure {
        id: NotificationId,
        previous_is_read: bool,
    },
}

impl Command {
    pub fn arrival(notification: Notification) -> Self {
        Command::Arrival { notification }
    }

    pub fn start(id: impl Into<NotificationId>) -> Self {
        Command::MutationStart { id: id.into() }
    }

    pub fn success(id: impl Into<NotificationId>) -> Self {
        Command::MutationSuccess { id: id.into() }
    }

    pub fn failure(id: impl Into<NotificationId>, previous_is_read: bool) -> Self {
        Command::MutationFailure {
            id: id.into(),
            previous_is_read,
        }
    }

    /// The serde tag, used as the command type in the command log.
    pub fn command_type(&self) -> &'static str {
        match self {
            Command::Arrival { .. } => "arrival",
            Command::MutationStart { .. } => "mutation_start",
            Command::MutationSuccess { .. } => "mutation_success",
            Command::MutationFailure { .. } => "mutation_failure",
        }
    }

    /// Id the command targets.
    pub fn target(&self) -> &NotificationId {
        match self {
            Command::Arrival { notification } => &notification.id,
            Command::MutationStart { id }
            | Command::MutationSuccess { id }
            | Command::MutationFailure { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::Utc;

    #[test]
    fn command_type_matches_serde_tag() {
        let commands = vec![
            Command::arrival(Notification::new("n1", Category::Like, Utc::now())),
            Command::start("n1"),
            Command::success("n1"),
            Command::failure("n1", false),
        ];

        for command in commands {
            let value = serde_json::to_value(&command).unwrap();
            assert_eq!(value["type"], command.command_type());
        }
    }

    #[test]
    fn failure_payload_carries_previous_value() {
        let value = serde_json::to_value(Command::failure("a", true)).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["previousIsRead"], true);
    }
}
