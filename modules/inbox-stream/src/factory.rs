use chrono::{DateTime, Duration, Utc};
use inbox_common::{Category, Notification};
use rand::Rng;

use crate::ids::IdGenerator;

/// Builds synthetic notifications: fresh id, random category, and a
/// timestamp of either now or exactly one day earlier so consumers get more
/// than one day group.
#[derive(Debug, Clone)]
pub struct NotificationFactory<G> {
    ids: G,
}

impl<G: IdGenerator> NotificationFactory<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    pub fn build<R: Rng>(&self, rng: &mut R, now: DateTime<Utc>) -> Notification {
        let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
        let days_back = rng.random_range(0..=1);
        Notification::new(self.ids.next_id(), category, now - Duration::days(days_back))
    }
}
