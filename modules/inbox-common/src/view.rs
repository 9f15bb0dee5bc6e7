//! Read-only derivations over `ApplicationState` for list consumers:
//! grouping by calendar day and paging through the groups.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::Notification;

/// Notifications sharing one UTC calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    /// `YYYY-MM-DD`.
    pub label: String,
    pub notifications: Vec<&'a Notification>,
}

/// Group notifications by the date part of their timestamp.
///
/// Groups come out newest label first. Within a group the input order is
/// kept, so a newest-first state yields newest-first groups.
pub fn group_by_day(notifications: &[Notification]) -> Vec<DayGroup<'_>> {
    let mut groups: BTreeMap<String, Vec<&Notification>> = BTreeMap::new();
    for notification in notifications {
        let label = notification.timestamp.format("%Y-%m-%d").to_string();
        groups.entry(label).or_default().push(notification);
    }

    groups
        .into_iter()
        .rev()
        .map(|(label, notifications)| DayGroup {
            label,
            notifications,
        })
        .collect()
}

/// Cursor over pages of day groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    page: usize,
}

impl Pager {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based current page.
    pub fn current(&self) -> usize {
        self.page
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Move by `delta` pages, clamped to the pages that exist for `total` items.
    pub fn step(&mut self, delta: isize, total: usize) -> usize {
        let last = self.page_count(total).saturating_sub(1);
        let target = self.page.saturating_add_signed(delta);
        self.page = target.min(last);
        self.page
    }

    /// The slice of `items` on the current page. Clamps first if the item
    /// count shrank below the current page.
    pub fn page<'s, T>(&mut self, items: &'s [T]) -> &'s [T] {
        let last = self.page_count(items.len()).saturating_sub(1);
        self.page = self.page.min(last);
        let start = (self.page * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}
