//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use turbo_notify::prelude::*;
//! ```

pub use crate::service::{handle_api_call, handle_loading_operation, ServiceOptions};
pub use crate::{
    toast, ApiError, Bridge, LoadingHandle, NotificationAction, NotificationCenter,
    NotificationConfig, NotificationId, NotificationKind, NotificationOptions, NotificationPatch,
    NotifyError, NotifyRequest, Position, Resolution, ToastView,
};
