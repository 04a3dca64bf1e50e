//! Free functions over the mounted center.
//!
//! ```rust,ignore
//! use turbo_notify::toast;
//!
//! toast::success("Added to cart");
//! toast::error(("Checkout failed", "Card declined"));
//! ```
//!
//! Every call goes through the global bridge; before a center is mounted the
//! call is logged and returns `None`.

use crate::bridge;
use crate::center::LoadingHandle;
use crate::ids::NotificationId;
use crate::notification::{NotificationPatch, Position};
use crate::options::{NotifyRequest, ToastArgs};

pub fn success(args: impl Into<ToastArgs>) -> Option<NotificationId> {
    bridge::with_active(|center| center.success(args))
}

pub fn error(args: impl Into<ToastArgs>) -> Option<NotificationId> {
    bridge::with_active(|center| center.error(args))
}

pub fn warning(args: impl Into<ToastArgs>) -> Option<NotificationId> {
    bridge::with_active(|center| center.warning(args))
}

pub fn info(args: impl Into<ToastArgs>) -> Option<NotificationId> {
    bridge::with_active(|center| center.info(args))
}

pub fn notify(request: impl Into<NotifyRequest>) -> Option<NotificationId> {
    bridge::with_active(|center| center.notify(request)).flatten()
}

pub fn loading(args: impl Into<ToastArgs>) -> Option<LoadingHandle> {
    bridge::with_active(|center| center.loading(args))
}

pub fn update(id: &NotificationId, patch: NotificationPatch) {
    bridge::with_active(|center| center.update_notification(id, patch));
}

pub fn remove(id: &NotificationId) {
    bridge::with_active(|center| center.remove_notification(id));
}

pub fn clear_all(position: Option<Position>) {
    bridge::with_active(|center| center.clear_all(position));
}
