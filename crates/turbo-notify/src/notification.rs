//! Notification data model.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::center::CloseHandle;
use crate::ids::NotificationId;
use crate::NotifyError;

/// The kind of a notification, which drives its styling and icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
    Loading,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 5] = [
        NotificationKind::Success,
        NotificationKind::Error,
        NotificationKind::Warning,
        NotificationKind::Info,
        NotificationKind::Loading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
            NotificationKind::Loading => "loading",
        }
    }

    /// Capitalized name, used as the default title.
    pub fn display_name(&self) -> &'static str {
        match self {
            NotificationKind::Success => "Success",
            NotificationKind::Error => "Error",
            NotificationKind::Warning => "Warning",
            NotificationKind::Info => "Info",
            NotificationKind::Loading => "Loading",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NotifyError::InvalidKind(s.to_string()))
    }
}

/// Screen anchor a notification is rendered at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    TopRight,
    TopLeft,
    TopCenter,
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::TopRight,
        Position::TopLeft,
        Position::TopCenter,
        Position::BottomRight,
        Position::BottomLeft,
        Position::BottomCenter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
            Position::TopCenter => "top-center",
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomCenter => "bottom-center",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|position| position.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NotifyError::InvalidPosition(s.to_string()))
    }
}

/// Visual weight of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVariant {
    Primary,
    Secondary,
    Text,
}

impl ActionVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionVariant::Primary => "primary",
            ActionVariant::Secondary => "secondary",
            ActionVariant::Text => "text",
        }
    }
}

/// Click handler of an action button. Receives a handle that closes the
/// notification it belongs to.
#[derive(Clone)]
pub struct ActionHandler(Arc<dyn Fn(&CloseHandle) + Send + Sync>);

impl ActionHandler {
    pub fn new(f: impl Fn(&CloseHandle) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, close: &CloseHandle) {
        (self.0)(close)
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler")
    }
}

impl PartialEq for ActionHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Callback fired once when a notification leaves the center.
#[derive(Clone)]
pub struct CloseCallback(Arc<dyn Fn(&NotificationId) + Send + Sync>);

impl CloseCallback {
    pub fn new(f: impl Fn(&NotificationId) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, id: &NotificationId) {
        (self.0)(id)
    }
}

impl fmt::Debug for CloseCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CloseCallback")
    }
}

impl PartialEq for CloseCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A button rendered inside a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationAction {
    pub label: String,
    pub on_click: Option<ActionHandler>,
    pub variant: Option<ActionVariant>,
    /// Close the notification after `on_click` runs.
    pub close_on_click: bool,
}

impl NotificationAction {
    pub fn new(label: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            on_click: None,
            variant: None,
            close_on_click: true,
        }
    }

    pub fn on_click(mut self, f: impl Fn(&CloseHandle) + Send + Sync + 'static) -> Self {
        self.on_click = Some(ActionHandler::new(f));
        self
    }

    pub fn variant(mut self, variant: ActionVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Leave the notification open after the click.
    pub fn keep_open(mut self) -> Self {
        self.close_on_click = false;
        self
    }
}

/// A transient, typed user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Auto-close delay. Zero means the notification never auto-closes.
    pub duration: Duration,
    pub auto_close: bool,
    /// `None` falls back to the center's default position.
    pub position: Option<Position>,
    pub actions: Vec<NotificationAction>,
    pub on_close: Option<CloseCallback>,
}

impl Notification {
    /// Whether a timer should run for this notification.
    pub fn is_auto_closing(&self) -> bool {
        self.auto_close && !self.duration.is_zero()
    }

    /// The position this notification renders at.
    pub fn resolved_position(&self, default: Position) -> Position {
        self.position.unwrap_or(default)
    }
}

/// Partial update merged into an existing notification.
///
/// Fields left as `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationPatch {
    pub kind: Option<NotificationKind>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub duration: Option<Duration>,
    pub auto_close: Option<bool>,
    pub position: Option<Option<Position>>,
    pub actions: Option<Vec<NotificationAction>>,
    pub on_close: Option<Option<CloseCallback>>,
}

impl NotificationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn position(mut self, position: Option<Position>) -> Self {
        self.position = Some(position);
        self
    }

    pub fn actions(mut self, actions: Vec<NotificationAction>) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Merge this patch into `notification`.
    pub fn apply(&self, notification: &mut Notification) {
        if let Some(kind) = self.kind {
            notification.kind = kind;
        }
        if let Some(title) = &self.title {
            notification.title = title.clone();
        }
        if let Some(message) = &self.message {
            notification.message = message.clone();
        }
        if let Some(duration) = self.duration {
            notification.duration = duration;
        }
        if let Some(auto_close) = self.auto_close {
            notification.auto_close = auto_close;
        }
        if let Some(position) = self.position {
            notification.position = position;
        }
        if let Some(actions) = &self.actions {
            notification.actions = actions.clone();
        }
        if let Some(on_close) = &self.on_close {
            notification.on_close = on_close.clone();
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(id: &str) -> Notification {
    Notification {
        id: NotificationId::new(id),
        kind: NotificationKind::Info,
        title: "Info".to_string(),
        message: format!("message {}", id),
        created_at: Utc::now(),
        duration: Duration::from_millis(5000),
        auto_close: true,
        position: None,
        actions: Vec::new(),
        on_close: None,
    }
}
