//! The notification reducer: dedup on arrival, optimistic flip on start,
//! confirm on success, roll back on failure.

use std::sync::Arc;

use inbox_common::{ActionStatus, ApplicationState, Command, NotificationId, UPDATE_FAILED_MESSAGE};

use crate::traits::{CommandLike, Reducer};

impl CommandLike for Command {
    fn command_type_str(&self) -> &'static str {
        self.command_type()
    }

    fn to_log_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationReducer;

impl Reducer<Command, ApplicationState> for NotificationReducer {
    fn reduce(&self, state: &Arc<ApplicationState>, command: &Command) -> Arc<ApplicationState> {
        match command {
            Command::Arrival { notification } => {
                if state.contains(&notification.id) {
                    return Arc::clone(state);
                }
                let mut next = ApplicationState::clone(state);
                next.notifications.insert(0, notification.clone());
                Arc::new(next)
            }

            Command::MutationStart { id } => {
                let Some(idx) = state.position(id) else {
                    return Arc::clone(state);
                };
                // A second start while the first is in flight would flip twice
                // and race two outcomes.
                if state.is_loading(id) {
                    return Arc::clone(state);
                }
                let mut next = ApplicationState::clone(state);
                let notification = &mut next.notifications[idx];
                notification.is_read = !notification.is_read;
                set_status(&mut next, id, ActionStatus::pending());
                Arc::new(next)
            }

            Command::MutationSuccess { id } => {
                if state.status(id) == Some(&ActionStatus::settled()) {
                    return Arc::clone(state);
                }
                let mut next = ApplicationState::clone(state);
                set_status(&mut next, id, ActionStatus::settled());
                Arc::new(next)
            }

            Command::MutationFailure {
                id,
                previous_is_read,
            } => {
                let Some(idx) = state.position(id) else {
                    return Arc::clone(state);
                };
                let mut next = ApplicationState::clone(state);
                next.notifications[idx].is_read = *previous_is_read;
                set_status(&mut next, id, ActionStatus::failed(UPDATE_FAILED_MESSAGE));
                Arc::new(next)
            }
        }
    }
}

fn set_status(state: &mut ApplicationState, id: &NotificationId, status: ActionStatus) {
    state.action_status.insert(id.clone(), status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use inbox_common::{Category, Notification};

    fn notification(id: &str) -> Notification {
        let ts = DateTime::parse_from_rfc3339("2024-06-09T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Notification::new(id, Category::Comment, ts)
    }

    fn state_with(ids: &[&str]) -> Arc<ApplicationState> {
        let mut state = Arc::new(ApplicationState::default());
        for id in ids {
            state = NotificationReducer.reduce(&state, &Command::arrival(notification(id)));
        }
        state
    }

    fn reduce_all(state: &Arc<ApplicationState>, commands: &[Command]) -> Arc<ApplicationState> {
        commands
            .iter()
            .fold(Arc::clone(state), |s, c| NotificationReducer.reduce(&s, c))
    }

    fn ids(state: &ApplicationState) -> Vec<&str> {
        state.notifications.iter().map(|n| n.id.as_str()).collect()
    }

    // ---------------------------------------------------------------------
    // Arrival
    // ---------------------------------------------------------------------

    #[test]
    fn arrival_prepends_newest_first() {
        let state = state_with(&["n1", "n2", "n3"]);
        assert_eq!(ids(&state), vec!["n3", "n2", "n1"]);
    }

    #[test]
    fn duplicate_arrival_is_idempotent() {
        let once = state_with(&["n1"]);
        let twice = NotificationReducer.reduce(&once, &Command::arrival(notification("n1")));

        assert!(Arc::ptr_eq(&once, &twice));
        assert_eq!(twice.notifications.len(), 1);
        assert_eq!(twice.notifications[0].id.as_str(), "n1");
    }

    #[test]
    fn duplicate_arrival_keeps_order_and_payload() {
        let state = state_with(&["n1", "n2"]);
        let mut replay = notification("n1");
        replay.is_read = true;

        let after = NotificationReducer.reduce(&state, &Command::arrival(replay));

        assert_eq!(ids(&after), vec!["n2", "n1"]);
        assert!(!after.get(&"n1".into()).unwrap().is_read);
    }

    // ---------------------------------------------------------------------
    // Mutation lifecycle
    // ---------------------------------------------------------------------

    #[test]
    fn start_then_failure_rolls_back() {
        let state = state_with(&["a"]);

        let started = NotificationReducer.reduce(&state, &Command::start("a"));
        assert!(started.notifications[0].is_read);
        assert_eq!(started.status(&"a".into()), Some(&ActionStatus::pending()));

        let failed = NotificationReducer.reduce(&started, &Command::failure("a", false));
        assert!(!failed.notifications[0].is_read);
        let status = failed.status(&"a".into()).unwrap();
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("Failed to update. Please try again."));

        // Only the action status differs from the pre-start state.
        assert_eq!(failed.notifications, state.notifications);
    }

    #[test]
    fn rollback_restores_read_items_too() {
        let state = reduce_all(&state_with(&["a"]), &[Command::start("a"), Command::success("a")]);
        assert!(state.notifications[0].is_read);

        let after = reduce_all(&state, &[Command::start("a"), Command::failure("a", true)]);
        assert!(after.notifications[0].is_read);
        assert_eq!(after.notifications, state.notifications);
    }

    #[test]
    fn start_then_success_keeps_optimistic_value() {
        let state = reduce_all(&state_with(&["a"]), &[Command::start("a"), Command::success("a")]);

        assert!(state.notifications[0].is_read);
        assert_eq!(state.status(&"a".into()), Some(&ActionStatus::settled()));
    }

    #[test]
    fn next_start_clears_sticky_error() {
        let failed = reduce_all(&state_with(&["a"]), &[Command::start("a"), Command::failure("a", false)]);
        assert!(failed.status(&"a".into()).unwrap().error.is_some());

        let retried = NotificationReducer.reduce(&failed, &Command::start("a"));
        assert_eq!(retried.status(&"a".into()), Some(&ActionStatus::pending()));
    }

    #[test]
    fn start_while_loading_is_ignored() {
        let started = NotificationReducer.reduce(&state_with(&["a"]), &Command::start("a"));
        let again = NotificationReducer.reduce(&started, &Command::start("a"));

        assert!(Arc::ptr_eq(&started, &again));
        assert!(again.notifications[0].is_read);
    }

    #[test]
    fn mutations_touch_only_their_target() {
        let state = state_with(&["a", "b"]);
        let after = NotificationReducer.reduce(&state, &Command::start("a"));

        assert!(!after.get(&"b".into()).unwrap().is_read);
        assert!(after.status(&"b".into()).is_none());
    }

    // ---------------------------------------------------------------------
    // Unknown ids
    // ---------------------------------------------------------------------

    #[test]
    fn start_on_unknown_id_returns_same_state() {
        let state = state_with(&["a"]);
        let after = NotificationReducer.reduce(&state, &Command::start("ghost"));
        assert!(Arc::ptr_eq(&state, &after));
    }

    #[test]
    fn failure_on_unknown_id_returns_same_state() {
        let state = state_with(&["a"]);
        let after = NotificationReducer.reduce(&state, &Command::failure("ghost", true));
        assert!(Arc::ptr_eq(&state, &after));
    }
}
