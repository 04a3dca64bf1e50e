//! The notification center.
//!
//! [`NotificationCenter`] owns the notification list and the mounted items.
//! Every entry point (direct API, bridge, service helpers, timer callbacks)
//! ends in the same locked dispatch, so changes are totally ordered. User
//! callbacks run only after the lock is released.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use crate::bridge;
use crate::config::NotificationConfig;
use crate::container::NotificationContainer;
use crate::ids::NotificationId;
use crate::item::{ItemPhase, NotificationItem, TimerKind, TimerOutcome, TimerSink, ToastView};
use crate::notification::{Notification, NotificationKind, NotificationPatch, Position};
use crate::options::{CanonicalToast, NotificationOptions, NotifyRequest, ToastArgs};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::store::{Action, NotificationState};

/// Message of a loading notification created without one.
pub const DEFAULT_LOADING_MESSAGE: &str = "Please wait...";

/// Receives a fresh snapshot after every change.
pub type Listener = Arc<dyn Fn(&[ToastView]) + Send + Sync>;

struct Shared {
    inner: Mutex<Inner>,
    scheduler: Arc<dyn Scheduler>,
    config: NotificationConfig,
}

struct Inner {
    state: NotificationState,
    container: NotificationContainer,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
}

/// Work left over after a change, run without the lock held.
#[derive(Default)]
struct Effects {
    closed: Vec<Notification>,
    listeners: Vec<Listener>,
    views: Vec<ToastView>,
}

impl Effects {
    fn run(self) {
        for notification in &self.closed {
            if let Some(on_close) = &notification.on_close {
                on_close.call(&notification.id);
            }
        }
        for listener in &self.listeners {
            listener(&self.views);
        }
    }
}

struct CenterSink<'a> {
    shared: &'a Arc<Shared>,
}

impl TimerSink for CenterSink<'_> {
    fn now(&self) -> Duration {
        self.shared.scheduler.now()
    }

    fn arm(
        &self,
        id: &NotificationId,
        epoch: u64,
        kind: TimerKind,
        delay: Duration,
    ) -> TimerHandle {
        let shared = Arc::downgrade(self.shared);
        let id = id.clone();
        self.shared.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    NotificationCenter { shared }.on_timer(&id, epoch, kind);
                }
            }),
        )
    }
}

/// Owner of the notification list and its imperative API.
///
/// Cheap to clone; clones share state.
///
/// ```rust,ignore
/// let center = NotificationCenter::new(NotificationConfig::default());
/// let _mounted = center.mount();
///
/// center.success("Profile saved");
/// let saving = center.loading(("Saving", "Uploading photo..."));
/// saving.success_with("Photo uploaded");
/// ```
#[derive(Clone)]
pub struct NotificationCenter {
    shared: Arc<Shared>,
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("NotificationCenter")
            .field("notifications", &inner.state.len())
            .field("default_position", &inner.state.default_position)
            .field("max_notifications", &inner.state.max_notifications)
            .finish()
    }
}

#[cfg(feature = "tokio")]
impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

impl NotificationCenter {
    /// Create a center whose timers run on tokio.
    #[cfg(feature = "tokio")]
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_scheduler(config, Arc::new(crate::scheduler::TokioScheduler::new()))
    }

    /// Create a center on a custom clock.
    pub fn with_scheduler(config: NotificationConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        let inner = Inner {
            state: NotificationState::from_config(&config),
            container: NotificationContainer::new(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                scheduler,
                config,
            }),
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.shared.config
    }

    /// Whether both handles refer to the same center.
    pub fn ptr_eq(&self, other: &NotificationCenter) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Publish this center on the global bridge until the guard drops.
    pub fn mount(&self) -> MountGuard {
        bridge::register(self.clone());
        tracing::debug!("notification center mounted");
        MountGuard {
            center: self.clone(),
        }
    }

    fn sink(&self) -> CenterSink<'_> {
        CenterSink {
            shared: &self.shared,
        }
    }

    // === Dispatch ===

    fn dispatch(&self, action: Action) {
        let effects = {
            let mut inner = self.shared.inner.lock();
            let closed = self.apply(&mut inner, action);
            self.effects(&inner, closed)
        };
        effects.run();
    }

    fn apply(&self, inner: &mut Inner, action: Action) -> Vec<Notification> {
        let sink = self.sink();
        let mut closed = Vec::new();

        if let Action::Add(notification) = &action {
            if let Some(replaced) = inner.state.get(&notification.id) {
                closed.push(replaced.clone());
                inner.container.unmount(&notification.id);
            }
        }

        let prev = std::mem::take(&mut inner.state);
        let prev_list = prev.notifications.clone();
        inner.state = prev.reduce(action);

        closed.extend(inner.container.reconcile(
            &prev_list,
            &inner.state.notifications,
            self.shared.config.exit_delay(),
            &sink,
        ));
        closed
    }

    fn effects(&self, inner: &Inner, closed: Vec<Notification>) -> Effects {
        if inner.listeners.is_empty() {
            return Effects {
                closed,
                ..Default::default()
            };
        }
        Effects {
            closed,
            listeners: inner.listeners.iter().map(|(_, l)| l.clone()).collect(),
            views: inner.container.views(
                &inner.state.notifications,
                inner.state.default_position,
                self.shared.scheduler.now(),
            ),
        }
    }

    fn with_item(
        &self,
        id: &NotificationId,
        f: impl FnOnce(&mut NotificationItem, &dyn TimerSink) -> bool,
    ) -> bool {
        let effects = {
            let mut inner = self.shared.inner.lock();
            let sink = self.sink();
            let changed = match inner.container.item_mut(id) {
                Some(item) => f(item, &sink),
                None => false,
            };
            if !changed {
                return false;
            }
            self.effects(&inner, Vec::new())
        };
        effects.run();
        true
    }

    fn on_timer(&self, id: &NotificationId, epoch: u64, kind: TimerKind) {
        let effects = {
            let mut inner = self.shared.inner.lock();
            let sink = self.sink();
            match inner.container.on_timer(id, epoch, kind, &sink) {
                TimerOutcome::Ignored => return,
                TimerOutcome::Closing => self.effects(&inner, Vec::new()),
                TimerOutcome::Remove => {
                    tracing::debug!(id = %id, "exit delay elapsed, removing");
                    let closed = self.apply(&mut inner, Action::Remove(id.clone()));
                    self.effects(&inner, closed)
                }
            }
        };
        effects.run();
    }

    // === Direct API ===

    /// Add a notification. Unset options fall back to `info`, the configured
    /// default duration, and auto-close.
    pub fn add_notification(
        &self,
        title: impl ToString,
        message: impl ToString,
        options: NotificationOptions,
    ) -> NotificationId {
        let NotificationOptions {
            id,
            kind,
            title: title_override,
            duration,
            auto_close,
            position,
            actions,
            on_close,
        } = options;

        let notification = Notification {
            id: id.unwrap_or_else(NotificationId::generate),
            kind: kind.unwrap_or_default(),
            title: title_override.unwrap_or_else(|| title.to_string()),
            message: message.to_string(),
            created_at: Utc::now(),
            duration: duration.unwrap_or_else(|| self.shared.config.default_duration()),
            auto_close: auto_close.unwrap_or(true),
            position,
            actions,
            on_close,
        };
        let id = notification.id.clone();

        tracing::debug!(id = %id, kind = %notification.kind, "adding notification");
        self.dispatch(Action::Add(notification));
        id
    }

    /// Remove a notification immediately, skipping the exit transition.
    pub fn remove_notification(&self, id: &NotificationId) {
        tracing::debug!(id = %id, "removing notification");
        self.dispatch(Action::Remove(id.clone()));
    }

    pub fn update_notification(&self, id: &NotificationId, patch: NotificationPatch) {
        tracing::debug!(id = %id, "updating notification");
        self.dispatch(Action::Update {
            id: id.clone(),
            patch,
        });
    }

    /// Remove every notification, or only those resolved to `position`.
    pub fn remove_all(&self, position: Option<Position>) {
        tracing::debug!(position = ?position, "removing notifications");
        self.dispatch(Action::RemoveAll(position));
    }

    pub fn clear_all(&self, position: Option<Position>) {
        self.remove_all(position);
    }

    // === Shorthands ===

    fn show(&self, toast: CanonicalToast) -> NotificationId {
        self.add_notification(toast.title, toast.message, toast.options)
    }

    pub fn success(&self, args: impl Into<ToastArgs>) -> NotificationId {
        self.show(args.into().resolve(NotificationKind::Success))
    }

    pub fn error(&self, args: impl Into<ToastArgs>) -> NotificationId {
        self.show(args.into().resolve(NotificationKind::Error))
    }

    pub fn warning(&self, args: impl Into<ToastArgs>) -> NotificationId {
        self.show(args.into().resolve(NotificationKind::Warning))
    }

    pub fn info(&self, args: impl Into<ToastArgs>) -> NotificationId {
        self.show(args.into().resolve(NotificationKind::Info))
    }

    /// Show a notification from a message or structured request.
    ///
    /// Returns `None`, and logs, when the request has neither title nor
    /// message.
    pub fn notify(&self, request: impl Into<NotifyRequest>) -> Option<NotificationId> {
        match request.into().normalize() {
            Some(toast) => Some(self.show(toast)),
            None => {
                tracing::error!("notification request has neither title nor message");
                None
            }
        }
    }

    /// Show a loading notification that stays until resolved.
    pub fn loading(&self, args: impl Into<ToastArgs>) -> LoadingHandle {
        let mut args = args.into();
        if args.message.is_none() {
            args.message = Some(DEFAULT_LOADING_MESSAGE.to_string());
        }

        let CanonicalToast {
            title,
            message,
            mut options,
            ..
        } = args.resolve(NotificationKind::Loading);
        options.auto_close = Some(false);
        options.duration = Some(Duration::ZERO);

        let id = self.add_notification(&title, &message, options);
        LoadingHandle {
            center: self.clone(),
            id,
            title,
            message,
        }
    }

    // === Configuration ===

    pub fn set_position(&self, position: Position) {
        self.dispatch(Action::SetDefaultPosition(position));
    }

    pub fn set_max_notifications(&self, max: usize) {
        self.dispatch(Action::SetMaxNotifications(max));
    }

    pub fn position(&self) -> Position {
        self.shared.inner.lock().state.default_position
    }

    pub fn max_notifications(&self) -> usize {
        self.shared.inner.lock().state.max_notifications
    }

    // === Queries ===

    /// Snapshot of the list, in insertion order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.shared.inner.lock().state.notifications.clone()
    }

    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.shared.inner.lock().state.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.shared.inner.lock().state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.inner.lock().state.is_empty()
    }

    pub fn item_phase(&self, id: &NotificationId) -> Option<ItemPhase> {
        self.shared.inner.lock().container.phase(id)
    }

    /// Render views of every notification, in insertion order.
    pub fn views(&self) -> Vec<ToastView> {
        let inner = self.shared.inner.lock();
        inner.container.views(
            &inner.state.notifications,
            inner.state.default_position,
            self.shared.scheduler.now(),
        )
    }

    /// Render views of the notifications at `position`.
    pub fn views_at(&self, position: Position) -> Vec<ToastView> {
        self.views()
            .into_iter()
            .filter(|view| view.position == position)
            .collect()
    }

    /// Call `listener` with fresh views after every change until the
    /// returned guard drops.
    pub fn subscribe(
        &self,
        listener: impl Fn(&[ToastView]) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = self.shared.inner.lock();
        let key = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((key, Arc::new(listener)));

        Subscription {
            shared: Arc::downgrade(&self.shared),
            key,
        }
    }

    // === Item events ===

    /// Pause the countdown while the pointer is over the notification.
    pub fn pointer_enter(&self, id: &NotificationId) -> bool {
        self.with_item(id, |item, sink| item.pointer_enter(sink))
    }

    pub fn pointer_leave(&self, id: &NotificationId) -> bool {
        self.with_item(id, |item, sink| item.pointer_leave(sink))
    }

    /// Start the exit transition. The notification is removed once the exit
    /// delay elapses.
    pub fn close(&self, id: &NotificationId) -> bool {
        self.with_item(id, |item, sink| item.request_close(sink))
    }

    /// Keyboard input on a focused notification. Escape closes it.
    pub fn key_down(&self, id: &NotificationId, key: &str) -> bool {
        key == "Escape" && self.close(id)
    }

    /// Click the action at `index`.
    pub fn trigger_action(&self, id: &NotificationId, index: usize) -> bool {
        let action = {
            let inner = self.shared.inner.lock();
            inner
                .state
                .get(id)
                .and_then(|n| n.actions.get(index).cloned())
        };
        let Some(action) = action else {
            return false;
        };

        if let Some(on_click) = &action.on_click {
            on_click.call(&CloseHandle {
                shared: Arc::downgrade(&self.shared),
                id: id.clone(),
            });
        }
        if action.close_on_click {
            self.close(id);
        }
        true
    }
}

/// Keeps a center registered on the global bridge.
#[derive(Debug)]
#[must_use = "the center is unregistered when the guard drops"]
pub struct MountGuard {
    center: NotificationCenter,
}

impl MountGuard {
    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        bridge::deregister(&self.center);
        tracing::debug!("notification center unmounted");
    }
}

/// Listener registration. Unsubscribes on drop.
#[must_use = "the listener is removed when the subscription drops"]
pub struct Subscription {
    shared: Weak<Shared>,
    key: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.inner.lock().listeners.retain(|(key, _)| *key != self.key);
        }
    }
}

/// Passed to action handlers to close the notification they belong to.
#[derive(Clone)]
pub struct CloseHandle {
    shared: Weak<Shared>,
    id: NotificationId,
}

impl CloseHandle {
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn close(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => NotificationCenter { shared }.close(&self.id),
            None => false,
        }
    }
}

impl fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseHandle").field("id", &self.id).finish()
    }
}

/// Overrides applied when a loading notification resolves.
///
/// Unset title and message keep the loading notification's own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub title: Option<String>,
    pub message: Option<String>,
    pub options: NotificationOptions,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(message: impl ToString) -> Self {
        Self::new().with_message(message)
    }

    pub fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn with_title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_options(mut self, options: NotificationOptions) -> Self {
        self.options = options;
        self
    }
}

impl From<&str> for Resolution {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<String> for Resolution {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

impl From<(&str, &str)> for Resolution {
    fn from((title, message): (&str, &str)) -> Self {
        Self::message(message).with_title(title)
    }
}

impl From<NotificationOptions> for Resolution {
    fn from(options: NotificationOptions) -> Self {
        Self::new().with_options(options)
    }
}

/// Accessor onto the notification created by [`NotificationCenter::loading`].
#[derive(Debug, Clone)]
pub struct LoadingHandle {
    center: NotificationCenter,
    id: NotificationId,
    title: String,
    message: String,
}

impl LoadingHandle {
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Turn into a success notification, keeping the loading texts.
    pub fn success(&self) {
        self.resolve(NotificationKind::Success, Resolution::default());
    }

    /// Turn into an error notification, keeping the loading texts.
    pub fn error(&self) {
        self.resolve(NotificationKind::Error, Resolution::default());
    }

    pub fn success_with(&self, resolution: impl Into<Resolution>) {
        self.resolve(NotificationKind::Success, resolution.into());
    }

    pub fn error_with(&self, resolution: impl Into<Resolution>) {
        self.resolve(NotificationKind::Error, resolution.into());
    }

    pub fn update(&self, patch: NotificationPatch) {
        self.center.update_notification(&self.id, patch);
    }

    pub fn remove(&self) {
        self.center.remove_notification(&self.id);
    }

    /// One atomic update: kind, texts, and auto-close with the default
    /// duration unless the resolution overrides them.
    fn resolve(&self, kind: NotificationKind, resolution: Resolution) {
        let Resolution {
            title,
            message,
            mut options,
        } = resolution;
        let title = options
            .title
            .take()
            .or(title)
            .unwrap_or_else(|| self.title.clone());
        let defaults = NotificationOptions::new()
            .auto_close(true)
            .duration(self.center.config().default_duration());

        let mut patch = options.or(defaults).into_patch();
        patch.kind = Some(kind);
        patch.title = Some(title);
        patch.message = Some(message.unwrap_or_else(|| self.message.clone()));

        self.center.update_notification(&self.id, patch);
    }
}
