//! Per-notification lifecycle and timer.
//!
//! ```text
//! Entering -> Running <-> Paused
//!                |          |
//!                +-> Exiting <+
//!                      |
//!                   Removed
//! ```
//!
//! Each item owns at most one [`TimerHandle`]. Every transition that replaces
//! or drops the timer also bumps the item's epoch, so a callback that was
//! already in flight when its timer got cancelled is recognised as stale.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::NotificationId;
use crate::notification::{ActionVariant, Notification, NotificationKind, Position};
use crate::scheduler::TimerHandle;

/// Lifecycle phase of a mounted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPhase {
    Entering,
    Running,
    Paused,
    Exiting,
    Removed,
}

impl ItemPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemPhase::Entering => "entering",
            ItemPhase::Running => "running",
            ItemPhase::Paused => "paused",
            ItemPhase::Exiting => "exiting",
            ItemPhase::Removed => "removed",
        }
    }

    /// Still on screen and accepting input.
    pub fn is_visible(&self) -> bool {
        matches!(
            self,
            ItemPhase::Entering | ItemPhase::Running | ItemPhase::Paused
        )
    }
}

impl fmt::Display for ItemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which timer an expiry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    AutoClose,
    Exit,
}

/// What the owner must do after a timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerOutcome {
    /// Stale or irrelevant expiry.
    Ignored,
    /// Auto-close elapsed; the item started exiting.
    Closing,
    /// Exit delay elapsed; remove the notification from the store.
    Remove,
}

/// Clock and timer factory used by items.
pub(crate) trait TimerSink {
    fn now(&self) -> Duration;

    fn arm(
        &self,
        id: &NotificationId,
        epoch: u64,
        kind: TimerKind,
        delay: Duration,
    ) -> TimerHandle;
}

/// Timer state of one mounted notification.
#[derive(Debug)]
pub struct NotificationItem {
    id: NotificationId,
    phase: ItemPhase,
    duration: Duration,
    auto_close: bool,
    /// Time left on the auto-close timer as of `armed_at`.
    remaining: Duration,
    armed_at: Option<Duration>,
    exit_delay: Duration,
    epoch: u64,
    timer: Option<TimerHandle>,
}

impl NotificationItem {
    /// Mount an item for `notification` and start it.
    pub(crate) fn mount(
        notification: &Notification,
        exit_delay: Duration,
        sink: &dyn TimerSink,
    ) -> Self {
        let mut item = Self {
            id: notification.id.clone(),
            phase: ItemPhase::Entering,
            duration: notification.duration,
            auto_close: notification.auto_close,
            remaining: notification.duration,
            armed_at: None,
            exit_delay,
            epoch: 0,
            timer: None,
        };
        item.start(sink);
        item
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_auto_closing(&self) -> bool {
        self.auto_close && !self.duration.is_zero()
    }

    /// Whether a timer is currently armed.
    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Auto-close time left at `now`.
    pub fn remaining_at(&self, now: Duration) -> Duration {
        match (self.phase, self.armed_at) {
            (ItemPhase::Running, Some(armed_at)) => self
                .remaining
                .saturating_sub(now.saturating_sub(armed_at)),
            (ItemPhase::Exiting | ItemPhase::Removed, _) => Duration::ZERO,
            _ => self.remaining,
        }
    }

    /// Progress bar fill in percent, `None` when the item never auto-closes.
    pub fn progress(&self, now: Duration) -> Option<f32> {
        if !self.is_auto_closing() {
            return None;
        }
        let left = self.remaining_at(now).as_secs_f32();
        Some((left / self.duration.as_secs_f32() * 100.0).clamp(0.0, 100.0))
    }

    fn start(&mut self, sink: &dyn TimerSink) {
        if self.phase != ItemPhase::Entering {
            return;
        }
        self.phase = ItemPhase::Running;
        if self.is_auto_closing() {
            self.arm_auto_close(sink);
        }
    }

    fn arm_auto_close(&mut self, sink: &dyn TimerSink) {
        self.cancel_timer();
        self.armed_at = Some(sink.now());
        self.timer = Some(sink.arm(&self.id, self.epoch, TimerKind::AutoClose, self.remaining));
        tracing::debug!(id = %self.id, remaining = ?self.remaining, "auto-close timer armed");
    }

    fn cancel_timer(&mut self) {
        self.epoch += 1;
        self.armed_at = None;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Pause the countdown. Only a running, auto-closing item pauses.
    pub(crate) fn pointer_enter(&mut self, sink: &dyn TimerSink) -> bool {
        if self.phase != ItemPhase::Running || !self.is_auto_closing() {
            return false;
        }
        self.remaining = self.remaining_at(sink.now());
        self.cancel_timer();
        self.phase = ItemPhase::Paused;
        tracing::debug!(id = %self.id, remaining = ?self.remaining, "notification paused");
        true
    }

    /// Resume the countdown for exactly the time that was left.
    pub(crate) fn pointer_leave(&mut self, sink: &dyn TimerSink) -> bool {
        if self.phase != ItemPhase::Paused {
            return false;
        }
        self.phase = ItemPhase::Running;
        if self.is_auto_closing() {
            self.arm_auto_close(sink);
        }
        true
    }

    /// Begin the exit transition. A second request while exiting is a no-op.
    pub(crate) fn request_close(&mut self, sink: &dyn TimerSink) -> bool {
        if !self.phase.is_visible() {
            return false;
        }
        self.cancel_timer();
        self.phase = ItemPhase::Exiting;
        self.timer = Some(sink.arm(&self.id, self.epoch, TimerKind::Exit, self.exit_delay));
        tracing::debug!(id = %self.id, "notification exiting");
        true
    }

    pub(crate) fn on_timer(
        &mut self,
        epoch: u64,
        kind: TimerKind,
        sink: &dyn TimerSink,
    ) -> TimerOutcome {
        if epoch != self.epoch {
            return TimerOutcome::Ignored;
        }

        match (kind, self.phase) {
            (TimerKind::AutoClose, ItemPhase::Running) => {
                tracing::debug!(id = %self.id, "auto-close timer expired");
                self.request_close(sink);
                TimerOutcome::Closing
            }
            (TimerKind::Exit, ItemPhase::Exiting) => {
                self.cancel_timer();
                self.phase = ItemPhase::Removed;
                TimerOutcome::Remove
            }
            _ => TimerOutcome::Ignored,
        }
    }

    /// Pick up a store update.
    ///
    /// A change of `duration` or `auto_close` restarts the countdown from the
    /// new full duration.
    pub(crate) fn apply_update(&mut self, notification: &Notification, sink: &dyn TimerSink) {
        if notification.duration == self.duration && notification.auto_close == self.auto_close {
            return;
        }

        self.duration = notification.duration;
        self.auto_close = notification.auto_close;
        self.remaining = notification.duration;

        match self.phase {
            ItemPhase::Running => {
                self.cancel_timer();
                if self.is_auto_closing() {
                    self.arm_auto_close(sink);
                }
            }
            ItemPhase::Paused if !self.is_auto_closing() => {
                self.phase = ItemPhase::Running;
            }
            _ => {}
        }
    }

    /// Tear down. Cancels any pending timer.
    pub(crate) fn unmount(&mut self) {
        self.cancel_timer();
        self.phase = ItemPhase::Removed;
    }
}

/// An action button as rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionView {
    pub label: String,
    pub variant: Option<ActionVariant>,
}

impl ActionView {
    pub fn class_name(&self) -> String {
        match self.variant {
            Some(variant) => format!(
                "notification-action-btn notification-action-btn-{}",
                variant.as_str()
            ),
            None => "notification-action-btn".to_string(),
        }
    }
}

/// Everything a renderer needs to draw one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub position: Position,
    pub phase: ItemPhase,
    /// Percent of the auto-close countdown left.
    pub progress: Option<f32>,
    pub actions: Vec<ActionView>,
}

impl ToastView {
    /// The same for every toast, so renderers may bind them statically.
    pub const ROLE: &'static str = "alert";
    pub const ARIA_LIVE: &'static str = "assertive";
    pub const TAB_INDEX: i32 = 0;

    pub(crate) fn new(
        notification: &Notification,
        item: &NotificationItem,
        default_position: Position,
        now: Duration,
    ) -> Self {
        Self {
            id: notification.id.clone(),
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            position: notification.resolved_position(default_position),
            phase: item.phase(),
            progress: item.progress(now),
            actions: notification
                .actions
                .iter()
                .map(|action| ActionView {
                    label: action.label.clone(),
                    variant: action.variant,
                })
                .collect(),
        }
    }

    pub fn role(&self) -> &'static str {
        Self::ROLE
    }

    pub fn aria_live(&self) -> &'static str {
        Self::ARIA_LIVE
    }

    pub fn tab_index(&self) -> i32 {
        Self::TAB_INDEX
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, ItemPhase::Exiting | ItemPhase::Removed)
    }

    pub fn class_name(&self) -> String {
        format!(
            "notification-item notification-{} {}",
            self.kind.as_str(),
            if self.is_exiting() { "exit" } else { "enter" }
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::notification::sample;
    use crate::scheduler::{ManualScheduler, Scheduler};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records expiries instead of delivering them.
    pub(crate) struct RecordingSink {
        pub clock: ManualScheduler,
        pub fired: Arc<Mutex<Vec<(NotificationId, u64, TimerKind)>>>,
    }

    impl RecordingSink {
        pub(crate) fn new() -> Self {
            Self {
                clock: ManualScheduler::new(),
                fired: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn advance(&self, millis: u64) -> Vec<(NotificationId, u64, TimerKind)> {
            self.clock.advance(Duration::from_millis(millis));
            std::mem::take(&mut *self.fired.lock())
        }
    }

    impl TimerSink for RecordingSink {
        fn now(&self) -> Duration {
            self.clock.now()
        }

        fn arm(
            &self,
            id: &NotificationId,
            epoch: u64,
            kind: TimerKind,
            delay: Duration,
        ) -> TimerHandle {
            let fired = self.fired.clone();
            let id = id.clone();
            self.clock
                .schedule(delay, Box::new(move || fired.lock().push((id, epoch, kind))))
        }
    }

    fn fire_all(item: &mut NotificationItem, sink: &RecordingSink, millis: u64) -> Vec<TimerOutcome> {
        sink.advance(millis)
            .into_iter()
            .map(|(_, epoch, kind)| item.on_timer(epoch, kind, sink))
            .collect()
    }

    // === Lifecycle Tests ===

    #[test]
    fn test_mount_arms_auto_close() {
        let sink = RecordingSink::new();
        let item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        assert_eq!(item.phase(), ItemPhase::Running);
        assert!(item.has_timer());
        assert_eq!(sink.clock.pending(), 1);
    }

    #[test]
    fn test_mount_without_auto_close_has_no_timer() {
        let sink = RecordingSink::new();
        let mut notification = sample("a");
        notification.auto_close = false;

        let item = NotificationItem::mount(&notification, Duration::from_millis(300), &sink);

        assert_eq!(item.phase(), ItemPhase::Running);
        assert!(!item.has_timer());
        assert_eq!(item.progress(Duration::ZERO), None);
    }

    #[test]
    fn test_expiry_then_exit_delay_removes() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        assert!(fire_all(&mut item, &sink, 4999).is_empty());
        assert_eq!(fire_all(&mut item, &sink, 1), vec![TimerOutcome::Closing]);
        assert_eq!(item.phase(), ItemPhase::Exiting);

        assert!(fire_all(&mut item, &sink, 299).is_empty());
        assert_eq!(fire_all(&mut item, &sink, 1), vec![TimerOutcome::Remove]);
        assert_eq!(item.phase(), ItemPhase::Removed);
        assert!(!item.has_timer());
    }

    // === Pause/Resume Tests ===

    #[test]
    fn test_pause_preserves_remaining_time() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        sink.advance(3000);
        assert!(item.pointer_enter(&sink));
        assert_eq!(item.phase(), ItemPhase::Paused);
        assert_eq!(item.remaining_at(sink.now()), Duration::from_millis(2000));
        assert_eq!(sink.clock.pending(), 0);

        assert!(fire_all(&mut item, &sink, 10_000).is_empty());
        assert_eq!(item.phase(), ItemPhase::Paused);

        assert!(item.pointer_leave(&sink));
        assert!(fire_all(&mut item, &sink, 1999).is_empty());
        assert_eq!(fire_all(&mut item, &sink, 1), vec![TimerOutcome::Closing]);
    }

    #[test]
    fn test_pause_ignored_without_auto_close() {
        let sink = RecordingSink::new();
        let mut notification = sample("a");
        notification.duration = Duration::ZERO;
        let mut item = NotificationItem::mount(&notification, Duration::from_millis(300), &sink);

        assert!(!item.pointer_enter(&sink));
        assert_eq!(item.phase(), ItemPhase::Running);
        assert!(!item.pointer_leave(&sink));
    }

    #[test]
    fn test_progress_tracks_remaining() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        assert_eq!(item.progress(sink.now()), Some(100.0));
        sink.advance(2500);
        assert_eq!(item.progress(sink.now()), Some(50.0));

        item.pointer_enter(&sink);
        sink.advance(1000);
        assert_eq!(item.progress(sink.now()), Some(50.0));
    }

    // === Close Tests ===

    #[test]
    fn test_close_is_idempotent() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        assert!(item.request_close(&sink));
        let epoch = item.epoch();
        assert!(!item.request_close(&sink));
        assert_eq!(item.epoch(), epoch);
        assert_eq!(sink.clock.pending(), 1);
    }

    #[test]
    fn test_close_cancels_auto_close_timer() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        sink.advance(1000);
        item.request_close(&sink);

        let fired = sink.advance(10_000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].2, TimerKind::Exit);
    }

    #[test]
    fn test_close_while_paused() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        item.pointer_enter(&sink);
        assert!(item.request_close(&sink));
        assert_eq!(fire_all(&mut item, &sink, 300), vec![TimerOutcome::Remove]);
    }

    #[test]
    fn test_stale_epoch_is_ignored() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);
        let stale = item.epoch();

        item.pointer_enter(&sink);
        item.pointer_leave(&sink);

        assert_eq!(
            item.on_timer(stale, TimerKind::AutoClose, &sink),
            TimerOutcome::Ignored
        );
        assert_eq!(item.phase(), ItemPhase::Running);
    }

    #[test]
    fn test_unmount_cancels_timer() {
        let sink = RecordingSink::new();
        let mut item = NotificationItem::mount(&sample("a"), Duration::from_millis(300), &sink);

        item.unmount();

        assert_eq!(item.phase(), ItemPhase::Removed);
        assert_eq!(sink.clock.pending(), 0);
    }

    // === Update Tests ===

    #[test]
    fn test_update_enables_auto_close() {
        let sink = RecordingSink::new();
        let mut notification = sample("a");
        notification.auto_close = false;
        notification.duration = Duration::ZERO;
        let mut item = NotificationItem::mount(&notification, Duration::from_millis(300), &sink);
        sink.advance(10_000);

        notification.auto_close = true;
        notification.duration = Duration::from_millis(5000);
        item.apply_update(&notification, &sink);

        assert!(item.has_timer());
        assert!(fire_all(&mut item, &sink, 4999).is_empty());
        assert_eq!(fire_all(&mut item, &sink, 1), vec![TimerOutcome::Closing]);
    }

    #[test]
    fn test_update_disabling_auto_close_resumes_paused_item() {
        let sink = RecordingSink::new();
        let mut notification = sample("a");
        let mut item = NotificationItem::mount(&notification, Duration::from_millis(300), &sink);
        item.pointer_enter(&sink);

        notification.auto_close = false;
        item.apply_update(&notification, &sink);

        assert_eq!(item.phase(), ItemPhase::Running);
        assert!(!item.has_timer());
    }

    #[test]
    fn test_update_with_same_timing_keeps_timer() {
        let sink = RecordingSink::new();
        let mut notification = sample("a");
        let mut item = NotificationItem::mount(&notification, Duration::from_millis(300), &sink);
        let epoch = item.epoch();

        notification.title = "Renamed".to_string();
        item.apply_update(&notification, &sink);

        assert_eq!(item.epoch(), epoch);
    }

    // === View Tests ===

    #[test]
    fn test_view_contract() {
        let sink = RecordingSink::new();
        let mut notification = sample("a");
        notification.kind = NotificationKind::Warning;
        notification.actions = vec![crate::notification::NotificationAction::new("Undo")
            .variant(ActionVariant::Secondary)];
        let mut item = NotificationItem::mount(&notification, Duration::from_millis(300), &sink);

        let view = ToastView::new(&notification, &item, Position::BottomLeft, sink.now());
        assert_eq!(view.role(), "alert");
        assert_eq!(view.aria_live(), "assertive");
        assert_eq!(view.tab_index(), 0);
        assert_eq!(view.position, Position::BottomLeft);
        assert_eq!(view.class_name(), "notification-item notification-warning enter");
        assert_eq!(
            view.actions[0].class_name(),
            "notification-action-btn notification-action-btn-secondary"
        );

        item.request_close(&sink);
        let view = ToastView::new(&notification, &item, Position::BottomLeft, sink.now());
        assert_eq!(view.class_name(), "notification-item notification-warning exit");
        assert_eq!(view.progress, Some(0.0));
    }
}
