use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque notification identifier. Assigned once by the id generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Comment,
    Like,
    Follow,
    Mention,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Comment,
        Category::Like,
        Category::Follow,
        Category::Mention,
    ];

    /// Display text for a notification of this category.
    pub fn message(self) -> &'static str {
        match self {
            Category::Comment => "Someone commented on your post.",
            Category::Like => "Someone liked your photo.",
            Category::Follow => "You have a new follower!",
            Category::Mention => "You were mentioned in a post.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Comment => "comment",
            Category::Like => "like",
            Category::Follow => "follow",
            Category::Mention => "mention",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub category: Category,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl Notification {
    /// Build an unread notification whose message follows from its category.
    pub fn new(id: impl Into<NotificationId>, category: Category, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            category,
            message: category.message().to_string(),
            timestamp,
            is_read: false,
        }
    }
}

/// In-flight status of the most recent mutation for one notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl ActionStatus {
    pub fn pending() -> Self {
        Self {
            loading: true,
            error: None,
        }
    }

    pub fn settled() -> Self {
        Self::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
        }
    }
}

/// The single authoritative state value. Replaced, never edited, by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    /// Newest arrival first.
    pub notifications: Vec<Notification>,
    /// Only ids that have seen at least one mutation attempt.
    pub action_status: HashMap<NotificationId, ActionStatus>,
}

impl ApplicationState {
    pub fn position(&self, id: &NotificationId) -> Option<usize> {
        self.notifications.iter().position(|n| &n.id == id)
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.position(id).is_some()
    }

    pub fn status(&self, id: &NotificationId) -> Option<&ActionStatus> {
        self.action_status.get(id)
    }

    pub fn is_loading(&self, id: &NotificationId) -> bool {
        self.status(id).is_some_and(|s| s.loading)
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_follows_category() {
        let n = Notification::new("notif_1", Category::Follow, Utc::now());
        assert_eq!(n.message, "You have a new follower!");
        assert!(!n.is_read);
    }

    #[test]
    fn notification_serializes_with_camel_case_fields() {
        let ts = DateTime::parse_from_rfc3339("2024-06-09T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let n = Notification::new("notif_7", Category::Mention, ts);
        let value = serde_json::to_value(&n).unwrap();

        assert_eq!(value["id"], "notif_7");
        assert_eq!(value["category"], "mention");
        assert_eq!(value["isRead"], false);
        assert_eq!(value["timestamp"], "2024-06-09T10:00:00Z");
    }

    #[test]
    fn loading_is_false_without_status_entry() {
        let state = ApplicationState::default();
        assert!(!state.is_loading(&NotificationId::from("missing")));
    }
}
