//! TurboCommerce notification center.
//!
//! Transient success/error/warning/info/loading notifications for storefront
//! screens, independent of any UI framework.
//!
//! # Architecture
//!
//! - [`NotificationState`] is a pure reducer over the ordered notification
//!   list, with a capacity cap (oldest evicted first).
//! - [`NotificationCenter`] owns the state and exposes the imperative API.
//! - Each mounted notification has a [`NotificationItem`] with its own
//!   cancellable timer: hover pauses it, leaving resumes it with the time
//!   that was left.
//! - [`bridge`] publishes the mounted center process-wide so services can
//!   reach it; [`toast`] wraps it in free functions.
//! - [`service`] drives the loading → success/error lifecycle around async
//!   operations.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use turbo_notify::prelude::*;
//!
//! let center = NotificationCenter::new(NotificationConfig::default());
//! let _mounted = center.mount();
//!
//! center.success("Added to cart");
//! center.error(("Checkout failed", "Card declined"));
//!
//! let saving = center.loading("Saving your address...");
//! saving.success_with("Address saved");
//! ```

pub mod bridge;
pub mod prelude;
pub mod scheduler;
pub mod service;
pub mod toast;

mod api_error;
mod center;
mod config;
mod container;
mod error;
mod ids;
mod item;
mod notification;
mod options;
mod store;

pub use api_error::ApiError;
pub use bridge::Bridge;
pub use center::{
    CloseHandle, Listener, LoadingHandle, MountGuard, NotificationCenter, Resolution,
    Subscription, DEFAULT_LOADING_MESSAGE,
};
pub use config::{KindDurations, NotificationConfig};
pub use container::{group, occupied_positions, NotificationContainer};
pub use error::NotifyError;
pub use ids::NotificationId;
pub use item::{ActionView, ItemPhase, NotificationItem, ToastView};
pub use notification::{
    ActionHandler, ActionVariant, CloseCallback, Notification, NotificationAction,
    NotificationKind, NotificationPatch, Position,
};
pub use options::{NotificationOptions, NotifyRequest, ToastArgs};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle};
pub use service::{Notifier, ResponseMessage, ServiceOptions, UserFacingError};
pub use store::{Action, NotificationState};

#[cfg(feature = "tokio")]
pub use scheduler::TokioScheduler;
