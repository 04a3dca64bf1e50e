//! Call-site options and the canonical request types.
//!
//! The public API accepts a handful of call shapes (`"message"`,
//! `("title", "message")`, `("message", options)`, ...). They are all
//! converted here, at the boundary, into one canonical request so the center
//! never has to inspect argument shapes.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::ids::NotificationId;
use crate::notification::{
    CloseCallback, NotificationAction, NotificationKind, NotificationPatch, Position,
};
use crate::NotifyError;

/// Optional settings recognised by every constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationOptions {
    /// Use a caller-chosen ID instead of a generated one.
    pub id: Option<NotificationId>,
    pub kind: Option<NotificationKind>,
    /// Overrides any positional title.
    pub title: Option<String>,
    pub duration: Option<Duration>,
    pub auto_close: Option<bool>,
    pub position: Option<Position>,
    pub actions: Vec<NotificationAction>,
    pub on_close: Option<CloseCallback>,
}

impl NotificationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn duration_ms(self, millis: u64) -> Self {
        self.duration(Duration::from_millis(millis))
    }

    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(mut self, actions: Vec<NotificationAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn on_close(mut self, f: impl Fn(&NotificationId) + Send + Sync + 'static) -> Self {
        self.on_close = Some(CloseCallback::new(f));
        self
    }

    /// Fill unset fields from `defaults`. Fields already set win.
    pub fn or(mut self, defaults: NotificationOptions) -> Self {
        self.id = self.id.or(defaults.id);
        self.kind = self.kind.or(defaults.kind);
        self.title = self.title.or(defaults.title);
        self.duration = self.duration.or(defaults.duration);
        self.auto_close = self.auto_close.or(defaults.auto_close);
        self.position = self.position.or(defaults.position);
        if self.actions.is_empty() {
            self.actions = defaults.actions;
        }
        self.on_close = self.on_close.or(defaults.on_close);
        self
    }

    /// Convert the set fields into an update patch.
    pub fn into_patch(self) -> NotificationPatch {
        NotificationPatch {
            kind: self.kind,
            title: self.title,
            message: None,
            duration: self.duration,
            auto_close: self.auto_close,
            position: self.position.map(Some),
            actions: if self.actions.is_empty() {
                None
            } else {
                Some(self.actions)
            },
            on_close: self.on_close.map(Some),
        }
    }
}

/// Arguments of the shorthand constructors (`success`, `error`, ...).
///
/// A single string is always the message; the title then defaults to the
/// capitalized kind name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastArgs {
    pub title: Option<String>,
    pub message: Option<String>,
    pub options: NotificationOptions,
}

impl ToastArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn options(mut self, options: NotificationOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve title and message for a notification of `kind`.
    ///
    /// `options.title` wins over the positional title, which wins over the
    /// kind name.
    pub(crate) fn resolve(self, kind: NotificationKind) -> CanonicalToast {
        let ToastArgs {
            title,
            message,
            mut options,
        } = self;
        let title = options
            .title
            .take()
            .or(title)
            .unwrap_or_else(|| kind.display_name().to_string());
        options.kind = Some(kind);

        CanonicalToast {
            kind,
            title,
            message: message.unwrap_or_default(),
            options,
        }
    }
}

impl From<()> for ToastArgs {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<NotificationOptions> for ToastArgs {
    fn from(options: NotificationOptions) -> Self {
        Self {
            title: None,
            message: None,
            options,
        }
    }
}

macro_rules! toast_args_from_text {
    ($($text:ty),*) => {
        $(
            impl From<$text> for ToastArgs {
                fn from(message: $text) -> Self {
                    Self::new().message(message)
                }
            }

            impl From<($text, NotificationOptions)> for ToastArgs {
                fn from((message, options): ($text, NotificationOptions)) -> Self {
                    Self::new().message(message).options(options)
                }
            }

            toast_args_from_pair!($text; &str, String, &String);
        )*
    };
}

macro_rules! toast_args_from_pair {
    ($title:ty; $($message:ty),*) => {
        $(
            impl From<($title, $message)> for ToastArgs {
                fn from((title, message): ($title, $message)) -> Self {
                    Self::new().title(title).message(message)
                }
            }

            impl From<($title, $message, NotificationOptions)> for ToastArgs {
                fn from((title, message, options): ($title, $message, NotificationOptions)) -> Self {
                    Self::new().title(title).message(message).options(options)
                }
            }
        )*
    };
}

toast_args_from_text!(&str, String, &String);

/// A fully resolved constructor call.
#[derive(Debug, Clone)]
pub(crate) struct CanonicalToast {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub options: NotificationOptions,
}

/// Request accepted by `notify`.
///
/// Built either from a message (`"Saved"`, `("Saved", options)`) or as a
/// structured request, possibly deserialized from JSON:
///
/// ```rust,ignore
/// let request = NotifyRequest::from_json(r#"{"type": "warning", "message": "Low stock"}"#)?;
/// center.notify(request);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifyRequest {
    pub kind: Option<NotificationKind>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub options: NotificationOptions,
}

impl NotifyRequest {
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

    pub fn options(mut self, options: NotificationOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a structured request. Non-string `title`/`message` values are
    /// converted to their string form.
    pub fn from_json(json: &str) -> Result<Self, NotifyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalize into a canonical toast.
    ///
    /// Returns `None` when neither a title nor a message is present.
    pub(crate) fn normalize(self) -> Option<CanonicalToast> {
        let NotifyRequest {
            kind,
            title,
            message,
            mut options,
        } = self;
        let kind = kind.or(options.kind).unwrap_or_default();
        let title = title.or_else(|| options.title.take());
        options.title = None;
        options.kind = Some(kind);

        let (title, message) = match (title, message) {
            (Some(title), Some(message)) => (title, message),
            (None, Some(message)) => (kind.display_name().to_string(), message),
            (Some(title), None) => (kind.display_name().to_string(), title),
            (None, None) => return None,
        };

        Some(CanonicalToast {
            kind,
            title,
            message,
            options,
        })
    }
}

impl From<&str> for NotifyRequest {
    fn from(message: &str) -> Self {
        Self::new().message(message)
    }
}

impl From<String> for NotifyRequest {
    fn from(message: String) -> Self {
        Self::new().message(message)
    }
}

impl From<(&str, NotificationOptions)> for NotifyRequest {
    fn from((message, options): (&str, NotificationOptions)) -> Self {
        Self::new().message(message).options(options)
    }
}

impl From<(String, NotificationOptions)> for NotifyRequest {
    fn from((message, options): (String, NotificationOptions)) -> Self {
        Self::new().message(message).options(options)
    }
}

impl From<ToastArgs> for NotifyRequest {
    fn from(args: ToastArgs) -> Self {
        Self {
            kind: args.options.kind,
            title: args.title,
            message: args.message,
            options: args.options,
        }
    }
}

/// Wire shape of a structured `notify` request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotifyPayload {
    #[serde(default, rename = "type")]
    kind: Option<NotificationKind>,
    #[serde(default, deserialize_with = "coerce_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "coerce_text")]
    message: Option<String>,
    #[serde(default)]
    id: Option<NotificationId>,
    /// Milliseconds.
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    auto_close: Option<bool>,
    #[serde(default)]
    position: Option<Position>,
}

impl<'de> Deserialize<'de> for NotifyRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let payload = NotifyPayload::deserialize(deserializer)?;
        Ok(Self {
            kind: payload.kind,
            title: payload.title,
            message: payload.message,
            options: NotificationOptions {
                id: payload.id,
                duration: payload.duration.map(Duration::from_millis),
                auto_close: payload.auto_close,
                position: payload.position,
                ..Default::default()
            },
        })
    }
}

/// Accept any JSON value as text: strings verbatim, `null` as absent,
/// everything else in its JSON string form.
fn coerce_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
