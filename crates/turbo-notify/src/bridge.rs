//! Process-wide access to the mounted center.
//!
//! Code outside the UI tree (services, data loaders) reaches the center
//! through this slot. Calls made while nothing is mounted are logged and
//! dropped; only [`try_active`] reports the absence as an error.

use parking_lot::RwLock;

use crate::center::NotificationCenter;
use crate::NotifyError;

static ACTIVE: RwLock<Option<NotificationCenter>> = parking_lot::const_rwlock(None);

/// Publish `center`, replacing any previously mounted one.
pub fn register(center: NotificationCenter) {
    let mut slot = ACTIVE.write();
    if slot.is_some() {
        tracing::debug!("replacing mounted notification center");
    }
    *slot = Some(center);
}

/// Clear the slot if it still holds `center`.
pub fn deregister(center: &NotificationCenter) {
    let mut slot = ACTIVE.write();
    if slot.as_ref().is_some_and(|active| active.ptr_eq(center)) {
        *slot = None;
    }
}

/// The mounted center, if any.
pub fn active() -> Option<NotificationCenter> {
    ACTIVE.read().clone()
}

/// The mounted center, or [`NotifyError::NoActiveCenter`].
pub fn try_active() -> Result<NotificationCenter, NotifyError> {
    active().ok_or(NotifyError::NoActiveCenter)
}

pub fn is_mounted() -> bool {
    ACTIVE.read().is_some()
}

/// Run `f` against the mounted center, or log and return `None`.
///
/// The slot lock is released before `f` runs.
pub fn with_active<R>(f: impl FnOnce(&NotificationCenter) -> R) -> Option<R> {
    match active() {
        Some(center) => Some(f(&center)),
        None => {
            tracing::warn!("notification system not initialized");
            None
        }
    }
}

/// The bridge as a value, for APIs that take a notifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bridge;
