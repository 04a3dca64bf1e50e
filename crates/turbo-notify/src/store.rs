//! Notification list reducer.
//!
//! Every mutation of the list is expressed as an [`Action`] and applied by
//! [`NotificationState::reduce`]. The reducer is pure and synchronous; the
//! center funnels all entry points through it so updates are totally ordered.

use crate::config::NotificationConfig;
use crate::ids::NotificationId;
use crate::notification::{Notification, NotificationPatch, Position};

/// A state transition of the notification list.
#[derive(Debug, Clone)]
pub enum Action {
    /// Append a notification, evicting the oldest entries over the cap.
    Add(Notification),
    /// Remove one notification. No-op if absent.
    Remove(NotificationId),
    /// Remove everything, or only the notifications resolved to a position.
    RemoveAll(Option<Position>),
    /// Merge a patch into one notification. No-op if absent.
    Update {
        id: NotificationId,
        patch: NotificationPatch,
    },
    SetDefaultPosition(Position),
    SetMaxNotifications(usize),
}

/// State owned by a notification center.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationState {
    /// Insertion order is display order within a position group.
    pub notifications: Vec<Notification>,
    pub default_position: Position,
    pub max_notifications: usize,
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

impl NotificationState {
    pub fn new(default_position: Position, max_notifications: usize) -> Self {
        Self {
            notifications: Vec::new(),
            default_position,
            max_notifications: max_notifications.max(1),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.default_position, config.max_notifications)
    }

    /// Apply an action, returning the new state.
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::Add(notification) => self.add(notification),
            Action::Remove(id) => self.remove(&id),
            Action::RemoveAll(position) => self.remove_all(position),
            Action::Update { id, patch } => self.update(&id, &patch),
            Action::SetDefaultPosition(position) => self.set_default_position(position),
            Action::SetMaxNotifications(max) => self.set_max_notifications(max),
        }
    }

    /// Append a notification.
    ///
    /// An entry with the same ID is replaced. While the list is at the cap
    /// the oldest entry is dropped first, so afterwards
    /// `len() <= max_notifications`.
    pub fn add(mut self, notification: Notification) -> Self {
        self.notifications.retain(|n| n.id != notification.id);

        while !self.notifications.is_empty()
            && self.notifications.len() >= self.max_notifications
        {
            let evicted = self.notifications.remove(0);
            tracing::debug!(id = %evicted.id, "evicting oldest notification");
        }

        self.notifications.push(notification);
        self
    }

    pub fn remove(mut self, id: &NotificationId) -> Self {
        self.notifications.retain(|n| &n.id != id);
        self
    }

    /// Clear notifications. With a position, only entries resolving to it
    /// (explicitly, or through the current default) are removed.
    pub fn remove_all(mut self, position: Option<Position>) -> Self {
        match position {
            Some(position) => {
                let default = self.default_position;
                self.notifications
                    .retain(|n| n.resolved_position(default) != position);
            }
            None => self.notifications.clear(),
        }
        self
    }

    pub fn update(mut self, id: &NotificationId, patch: &NotificationPatch) -> Self {
        if let Some(notification) = self.notifications.iter_mut().find(|n| &n.id == id) {
            patch.apply(notification);
        }
        self
    }

    pub fn set_default_position(mut self, position: Position) -> Self {
        self.default_position = position;
        self
    }

    /// Set the cap. Takes effect on the next add; values below 1 become 1.
    pub fn set_max_notifications(mut self, max: usize) -> Self {
        self.max_notifications = max.max(1);
        self
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}
