//! Grouping by position and item reconciliation.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::ids::NotificationId;
use crate::item::{ItemPhase, NotificationItem, TimerKind, TimerOutcome, TimerSink, ToastView};
use crate::notification::{Notification, Position};

/// Notifications rendered at `position`, in insertion order.
///
/// Entries without a position belong to `default`.
pub fn group(
    notifications: &[Notification],
    position: Position,
    default: Position,
) -> Vec<&Notification> {
    notifications
        .iter()
        .filter(|n| n.resolved_position(default) == position)
        .collect()
}

/// Positions with at least one notification, in [`Position::ALL`] order.
pub fn occupied_positions(notifications: &[Notification], default: Position) -> Vec<Position> {
    Position::ALL
        .into_iter()
        .filter(|position| {
            notifications
                .iter()
                .any(|n| n.resolved_position(default) == *position)
        })
        .collect()
}

/// The mounted items, keyed by notification ID.
///
/// Items survive list changes that don't concern them, so their timers keep
/// running undisturbed.
#[derive(Debug, Default)]
pub struct NotificationContainer {
    items: HashMap<NotificationId, NotificationItem>,
}

impl NotificationContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: &NotificationId) -> Option<&NotificationItem> {
        self.items.get(id)
    }

    pub(crate) fn item_mut(&mut self, id: &NotificationId) -> Option<&mut NotificationItem> {
        self.items.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bring the mounted items in line with `next`.
    ///
    /// New notifications are mounted, changed ones updated, and items whose
    /// notification left the list are unmounted. Returns the notifications
    /// that left, taken from `prev`.
    pub(crate) fn reconcile(
        &mut self,
        prev: &[Notification],
        next: &[Notification],
        exit_delay: Duration,
        sink: &dyn TimerSink,
    ) -> Vec<Notification> {
        let live: HashSet<&NotificationId> = next.iter().map(|n| &n.id).collect();

        let mut removed = Vec::new();
        for notification in prev {
            if live.contains(&notification.id) {
                continue;
            }
            if let Some(mut item) = self.items.remove(&notification.id) {
                item.unmount();
                tracing::debug!(id = %notification.id, "notification unmounted");
                removed.push(notification.clone());
            }
        }

        for notification in next {
            match self.items.get_mut(&notification.id) {
                Some(item) => item.apply_update(notification, sink),
                None => {
                    let item = NotificationItem::mount(notification, exit_delay, sink);
                    tracing::debug!(id = %notification.id, kind = %notification.kind, "notification mounted");
                    self.items.insert(notification.id.clone(), item);
                }
            }
        }

        removed
    }

    /// Route a timer expiry to its item.
    pub(crate) fn on_timer(
        &mut self,
        id: &NotificationId,
        epoch: u64,
        kind: TimerKind,
        sink: &dyn TimerSink,
    ) -> TimerOutcome {
        match self.items.get_mut(id) {
            Some(item) => item.on_timer(epoch, kind, sink),
            None => TimerOutcome::Ignored,
        }
    }

    /// Views of every mounted notification, in list order.
    pub fn views(
        &self,
        notifications: &[Notification],
        default: Position,
        now: Duration,
    ) -> Vec<ToastView> {
        notifications
            .iter()
            .filter_map(|n| {
                self.items
                    .get(&n.id)
                    .map(|item| ToastView::new(n, item, default, now))
            })
            .collect()
    }

    pub fn phase(&self, id: &NotificationId) -> Option<ItemPhase> {
        self.items.get(id).map(NotificationItem::phase)
    }

    /// Unmount one item ahead of a reconcile, so a replacement with the same
    /// ID mounts fresh.
    pub(crate) fn unmount(&mut self, id: &NotificationId) -> bool {
        match self.items.remove(id) {
            Some(mut item) => {
                item.unmount();
                true
            }
            None => false,
        }
    }

    /// Unmount everything.
    pub(crate) fn clear(&mut self) {
        for item in self.items.values_mut() {
            item.unmount();
        }
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::tests::RecordingSink;
    use crate::notification::sample;

    const EXIT: Duration = Duration::from_millis(300);

    fn positioned(id: &str, position: Option<Position>) -> Notification {
        let mut n = sample(id);
        n.position = position;
        n
    }

    // === Grouping Tests ===

    #[test]
    fn test_group_filters_and_keeps_order() {
        let list = vec![
            positioned("a", Some(Position::TopLeft)),
            positioned("b", None),
            positioned("c", Some(Position::TopLeft)),
            positioned("d", Some(Position::TopRight)),
        ];

        let left: Vec<&str> = group(&list, Position::TopLeft, Position::TopRight)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(left, vec!["a", "c"]);

        let right: Vec<&str> = group(&list, Position::TopRight, Position::TopRight)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(right, vec!["b", "d"]);

        assert!(group(&list, Position::BottomCenter, Position::TopRight).is_empty());
    }

    #[test]
    fn test_occupied_positions() {
        let list = vec![
            positioned("a", Some(Position::BottomLeft)),
            positioned("b", None),
        ];

        assert_eq!(
            occupied_positions(&list, Position::TopRight),
            vec![Position::TopRight, Position::BottomLeft]
        );
        assert!(occupied_positions(&[], Position::TopRight).is_empty());
    }

    // === Reconcile Tests ===

    #[test]
    fn test_reconcile_mounts_and_unmounts() {
        let sink = RecordingSink::new();
        let mut container = NotificationContainer::new();
        let first = vec![sample("a"), sample("b")];

        let removed = container.reconcile(&[], &first, EXIT, &sink);
        assert!(removed.is_empty());
        assert_eq!(container.len(), 2);

        let second = vec![sample("b")];
        let removed = container.reconcile(&first, &second, EXIT, &sink);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id.as_str(), "a");
        assert!(container.item(&"a".into()).is_none());
        assert_eq!(sink.clock.pending(), 1);
    }

    #[test]
    fn test_reconcile_leaves_unrelated_items_alone() {
        let sink = RecordingSink::new();
        let mut container = NotificationContainer::new();
        let first = vec![sample("a")];
        container.reconcile(&[], &first, EXIT, &sink);
        let epoch = container.item(&"a".into()).unwrap().epoch();

        sink.advance(2000);
        let second = vec![sample("a"), sample("b")];
        container.reconcile(&first, &second, EXIT, &sink);

        let item = container.item(&"a".into()).unwrap();
        assert_eq!(item.epoch(), epoch);
        assert_eq!(item.remaining_at(sink.now()), Duration::from_millis(3000));
    }

    #[test]
    fn test_views_follow_list_order() {
        let sink = RecordingSink::new();
        let mut container = NotificationContainer::new();
        let list = vec![sample("x"), sample("y")];
        container.reconcile(&[], &list, EXIT, &sink);

        let views = container.views(&list, Position::TopRight, sink.now());
        let ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert!(views.iter().all(|v| v.phase == ItemPhase::Running));
    }

    #[test]
    fn test_clear_cancels_all_timers() {
        let sink = RecordingSink::new();
        let mut container = NotificationContainer::new();
        container.reconcile(&[], &[sample("a"), sample("b")], EXIT, &sink);

        container.clear();

        assert!(container.is_empty());
        assert_eq!(sink.clock.pending(), 0);
    }
}
