//! Reactive access to the notification center.

use std::ops::Deref;

use leptos::prelude::*;
use turbo_notify::{NotificationCenter, NotificationConfig, NotifyError, ToastView};

use crate::scheduler::default_scheduler;

/// The center provided to a component tree, plus a signal of its views.
#[derive(Debug, Clone)]
pub struct ToastContext {
    pub center: NotificationCenter,
    pub views: RwSignal<Vec<ToastView>>,
}

impl ToastContext {
    /// Mirror `center` into a signal and publish it on the global bridge.
    ///
    /// Both are undone when the current reactive owner is cleaned up.
    pub fn new(center: NotificationCenter) -> Self {
        let views = RwSignal::new(center.views());
        let subscription = center.subscribe(move |snapshot| {
            views.try_set(snapshot.to_vec());
        });
        let mounted = center.mount();

        on_cleanup(move || {
            drop(subscription);
            drop(mounted);
        });

        Self { center, views }
    }
}

impl Deref for ToastContext {
    type Target = NotificationCenter;

    fn deref(&self) -> &Self::Target {
        &self.center
    }
}

/// Create a center for `config` and provide it to the current tree.
pub fn provide_notification_center(config: NotificationConfig) -> ToastContext {
    let context = ToastContext::new(NotificationCenter::with_scheduler(config, default_scheduler()));
    provide_context(context.clone());
    context
}

/// The nearest provided center.
pub fn try_use_notifications() -> Result<ToastContext, NotifyError> {
    use_context::<ToastContext>().ok_or(NotifyError::NoActiveCenter)
}

/// The nearest provided center.
///
/// # Panics
///
/// Outside a `NotificationProvider`.
pub fn use_notifications() -> ToastContext {
    match try_use_notifications() {
        Ok(context) => context,
        Err(err) => panic!("{}", err),
    }
}
