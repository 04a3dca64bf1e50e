//! Leptos components for the TurboCommerce notification center.
//!
//! Wrap the app in [`NotificationProvider`]; any component below it can
//! reach the center through [`use_notifications`], and non-UI code through
//! `turbo_notify::toast`.
//!
//! ```rust,ignore
//! use leptos::prelude::*;
//! use turbo_toast::{use_notifications, NotificationProvider};
//!
//! #[component]
//! fn App() -> impl IntoView {
//!     view! {
//!         <NotificationProvider>
//!             <SaveButton/>
//!         </NotificationProvider>
//!     }
//! }
//!
//! #[component]
//! fn SaveButton() -> impl IntoView {
//!     let notifications = use_notifications();
//!     view! {
//!         <button on:click=move |_| { notifications.success("Saved"); }>"Save"</button>
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - `hydrate` / `csr`: timers run on `window.setTimeout`.
//! - `ssr`: timers run on tokio.

mod components;
mod context;
mod scheduler;

pub use components::{
    icon, NotificationContainer, NotificationProvider, NotificationToast, NotificationViewport,
    ToastBindings,
};
pub use context::{
    provide_notification_center, try_use_notifications, use_notifications, ToastContext,
};
pub use scheduler::default_scheduler;

#[cfg(any(feature = "hydrate", feature = "csr"))]
pub use scheduler::BrowserScheduler;

pub use turbo_notify;
