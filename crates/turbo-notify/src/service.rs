//! Notification lifecycle around async operations.
//!
//! [`handle_api_call`] reports the outcome of an operation; [`handle_loading_operation`]
//! additionally shows a loading notification while it runs. Both hand the
//! operation's result back unchanged, so errors still reach the caller.
//!
//! ```rust,ignore
//! let order = handle_loading_operation(
//!     || api.place_order(&cart),
//!     &Bridge,
//!     &ServiceOptions::new().success_message("Order placed"),
//! )
//! .await?;
//! ```

use std::future::Future;

use crate::api_error::ApiError;
use crate::bridge::{self, Bridge};
use crate::center::{LoadingHandle, NotificationCenter};
use crate::config::KindDurations;
use crate::ids::NotificationId;
use crate::notification::NotificationKind;
use crate::options::{NotificationOptions, ToastArgs};

/// Success message used when neither the options nor the result supply one.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully";

/// Something that can show notifications.
pub trait Notifier {
    fn success(&self, args: ToastArgs) -> Option<NotificationId>;

    fn error(&self, args: ToastArgs) -> Option<NotificationId>;

    fn loading(&self, args: ToastArgs) -> Option<LoadingHandle>;

    /// Auto-close durations for service notifications.
    fn durations(&self) -> KindDurations {
        KindDurations::default()
    }
}

impl Notifier for NotificationCenter {
    fn success(&self, args: ToastArgs) -> Option<NotificationId> {
        Some(NotificationCenter::success(self, args))
    }

    fn error(&self, args: ToastArgs) -> Option<NotificationId> {
        Some(NotificationCenter::error(self, args))
    }

    fn loading(&self, args: ToastArgs) -> Option<LoadingHandle> {
        Some(NotificationCenter::loading(self, args))
    }

    fn durations(&self) -> KindDurations {
        self.config().durations
    }
}

impl Notifier for Bridge {
    fn success(&self, args: ToastArgs) -> Option<NotificationId> {
        bridge::with_active(|center| center.success(args))
    }

    fn error(&self, args: ToastArgs) -> Option<NotificationId> {
        bridge::with_active(|center| center.error(args))
    }

    fn loading(&self, args: ToastArgs) -> Option<LoadingHandle> {
        bridge::with_active(|center| center.loading(args))
    }

    fn durations(&self) -> KindDurations {
        bridge::active()
            .map(|center| center.config().durations)
            .unwrap_or_default()
    }
}

/// Message carried by a successful operation's result.
pub trait ResponseMessage {
    fn response_message(&self) -> Option<String> {
        None
    }
}

impl ResponseMessage for () {}

impl ResponseMessage for serde_json::Value {
    fn response_message(&self) -> Option<String> {
        match self.get("message")? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl<T: ResponseMessage> ResponseMessage for Option<T> {
    fn response_message(&self) -> Option<String> {
        self.as_ref().and_then(ResponseMessage::response_message)
    }
}

/// An error that can explain itself to a user.
pub trait UserFacingError {
    fn user_message(&self) -> String;
}

impl UserFacingError for ApiError {
    fn user_message(&self) -> String {
        ApiError::user_message(self)
    }
}

impl UserFacingError for anyhow::Error {
    fn user_message(&self) -> String {
        match self.downcast_ref::<ApiError>() {
            Some(api_error) => api_error.user_message(),
            None => ApiError::unknown(self).user_message(),
        }
    }
}

impl UserFacingError for String {
    fn user_message(&self) -> String {
        ApiError::unknown(self).user_message()
    }
}

impl UserFacingError for &'static str {
    fn user_message(&self) -> String {
        ApiError::unknown(self).user_message()
    }
}

/// How a service call reports its outcome.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub show_success_notification: bool,
    pub show_error_notification: bool,
    pub success_title: Option<String>,
    /// Overrides the message taken from the result.
    pub success_message: Option<String>,
    pub error_title: Option<String>,
    /// Overrides the message derived from the error.
    pub error_message: Option<String>,
    pub loading_title: String,
    pub loading_message: String,
    pub success_options: NotificationOptions,
    pub error_options: NotificationOptions,
    pub loading_options: NotificationOptions,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            show_success_notification: true,
            show_error_notification: true,
            success_title: None,
            success_message: None,
            error_title: None,
            error_message: None,
            loading_title: "Loading".to_string(),
            loading_message: "Processing request...".to_string(),
            success_options: NotificationOptions::default(),
            error_options: NotificationOptions::default(),
            loading_options: NotificationOptions::default(),
        }
    }
}

impl ServiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Don't notify on success.
    pub fn quiet_success(mut self) -> Self {
        self.show_success_notification = false;
        self
    }

    /// Don't notify on failure.
    pub fn quiet_error(mut self) -> Self {
        self.show_error_notification = false;
        self
    }

    pub fn success_title(mut self, title: impl ToString) -> Self {
        self.success_title = Some(title.to_string());
        self
    }

    pub fn success_message(mut self, message: impl ToString) -> Self {
        self.success_message = Some(message.to_string());
        self
    }

    pub fn error_title(mut self, title: impl ToString) -> Self {
        self.error_title = Some(title.to_string());
        self
    }

    pub fn error_message(mut self, message: impl ToString) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    pub fn loading_title(mut self, title: impl ToString) -> Self {
        self.loading_title = title.to_string();
        self
    }

    pub fn loading_message(mut self, message: impl ToString) -> Self {
        self.loading_message = message.to_string();
        self
    }

    pub fn success_options(mut self, options: NotificationOptions) -> Self {
        self.success_options = options;
        self
    }

    pub fn error_options(mut self, options: NotificationOptions) -> Self {
        self.error_options = options;
        self
    }

    pub fn loading_options(mut self, options: NotificationOptions) -> Self {
        self.loading_options = options;
        self
    }
}

fn outcome_args(
    kind: NotificationKind,
    title: Option<&String>,
    message: String,
    options: &NotificationOptions,
    durations: KindDurations,
) -> ToastArgs {
    let defaults = NotificationOptions::new()
        .duration(durations.for_kind(kind))
        .auto_close(true);

    ToastArgs::new()
        .title(title.map_or(kind.display_name(), String::as_str))
        .message(message)
        .options(options.clone().or(defaults))
}

/// Show the success notification for `response`.
pub fn handle_success<N, T>(
    notifier: &N,
    response: &T,
    options: &ServiceOptions,
) -> Option<NotificationId>
where
    N: Notifier + ?Sized,
    T: ResponseMessage + ?Sized,
{
    let message = options
        .success_message
        .clone()
        .or_else(|| response.response_message())
        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());

    notifier.success(outcome_args(
        NotificationKind::Success,
        options.success_title.as_ref(),
        message,
        &options.success_options,
        notifier.durations(),
    ))
}

/// Show the error notification for `error`.
pub fn handle_error<N, E>(notifier: &N, error: &E, options: &ServiceOptions) -> Option<NotificationId>
where
    N: Notifier + ?Sized,
    E: UserFacingError + ?Sized,
{
    let message = options
        .error_message
        .clone()
        .unwrap_or_else(|| error.user_message());

    notifier.error(outcome_args(
        NotificationKind::Error,
        options.error_title.as_ref(),
        message,
        &options.error_options,
        notifier.durations(),
    ))
}

fn report<N, T, E>(notifier: &N, result: &Result<T, E>, options: &ServiceOptions)
where
    N: Notifier + ?Sized,
    T: ResponseMessage,
    E: UserFacingError,
{
    match result {
        Ok(response) if options.show_success_notification => {
            handle_success(notifier, response, options);
        }
        Err(error) => {
            tracing::debug!(reason = %error.user_message(), "service operation failed");
            if options.show_error_notification {
                handle_error(notifier, error, options);
            }
        }
        Ok(_) => {}
    }
}

/// Run `operation` and notify about its outcome.
///
/// The result is returned unchanged; an error is reported and then handed
/// back to the caller.
pub async fn handle_api_call<N, F, Fut, T, E>(
    operation: F,
    notifier: &N,
    options: &ServiceOptions,
) -> Result<T, E>
where
    N: Notifier + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: ResponseMessage,
    E: UserFacingError,
{
    let result = operation().await;
    report(notifier, &result, options);
    result
}

/// Removes the loading notification, even if the operation is dropped
/// mid-flight.
struct LoadingGuard(Option<LoadingHandle>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.remove();
        }
    }
}

/// Like [`handle_api_call`], with a loading notification shown while
/// `operation` runs.
pub async fn handle_loading_operation<N, F, Fut, T, E>(
    operation: F,
    notifier: &N,
    options: &ServiceOptions,
) -> Result<T, E>
where
    N: Notifier + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: ResponseMessage,
    E: UserFacingError,
{
    let loading = notifier.loading(
        ToastArgs::new()
            .title(&options.loading_title)
            .message(&options.loading_message)
            .options(options.loading_options.clone()),
    );
    let guard = LoadingGuard(loading);

    let result = operation().await;
    drop(guard);

    report(notifier, &result, options);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::scheduler::ManualScheduler;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn center() -> NotificationCenter {
        NotificationCenter::with_scheduler(
            NotificationConfig::default(),
            Arc::new(ManualScheduler::new()),
        )
    }

    // === handle_api_call Tests ===

    #[tokio::test]
    async fn test_api_call_success_uses_result_message() {
        let center = center();

        let result = handle_api_call(
            || async { Ok::<_, ApiError>(json!({"message": "Cart updated", "items": 3})) },
            &center,
            &ServiceOptions::new(),
        )
        .await;

        assert_eq!(result.unwrap()["items"], 3);
        let n = &center.notifications()[0];
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.title, "Success");
        assert_eq!(n.message, "Cart updated");
        assert_eq!(n.duration, Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_api_call_success_default_message() {
        let center = center();

        handle_api_call(|| async { Ok::<_, ApiError>(()) }, &center, &ServiceOptions::new())
            .await
            .unwrap();

        assert_eq!(center.notifications()[0].message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_api_call_validation_error_is_reported_and_returned() {
        let center = center();

        let result = handle_api_call(
            || async { Err::<(), _>(ApiError::from_json(400, json!({"errors": {"email": "bad"}}))) },
            &center,
            &ServiceOptions::new(),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation { status: 400, .. })));
        let n = &center.notifications()[0];
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Error");
        assert!(n.message.contains("email"));
        assert!(n.message.contains("bad"));
        assert_eq!(n.duration, Duration::from_millis(7000));
    }

    #[tokio::test]
    async fn test_api_call_suppressed_notifications() {
        let center = center();
        let options = ServiceOptions::new().quiet_success().quiet_error();

        handle_api_call(|| async { Ok::<_, ApiError>(()) }, &center, &options)
            .await
            .unwrap();
        let _ = handle_api_call(|| async { Err::<(), _>(ApiError::network()) }, &center, &options).await;

        assert!(center.is_empty());
    }

    #[tokio::test]
    async fn test_api_call_custom_texts_and_options() {
        let center = center();
        let options = ServiceOptions::new()
            .error_title("Checkout")
            .error_message("Payment failed")
            .error_options(NotificationOptions::new().duration_ms(1000));

        let _ = handle_api_call(|| async { Err::<(), _>("card declined") }, &center, &options).await;

        let n = &center.notifications()[0];
        assert_eq!(n.title, "Checkout");
        assert_eq!(n.message, "Payment failed");
        assert_eq!(n.duration, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_anyhow_error_downcasts_to_api_error() {
        let center = center();

        let _ = handle_api_call(
            || async { Err::<(), anyhow::Error>(ApiError::timeout().into()) },
            &center,
            &ServiceOptions::new(),
        )
        .await;

        assert_eq!(
            center.notifications()[0].message,
            "Request timed out. Please try again."
        );
    }

    // === handle_loading_operation Tests ===

    #[tokio::test]
    async fn test_loading_operation_replaces_loading_with_outcome() {
        let center = center();
        let observer = center.clone();

        let result = handle_loading_operation(
            || async move {
                let during = observer.notifications();
                assert_eq!(during.len(), 1);
                assert_eq!(during[0].kind, NotificationKind::Loading);
                assert_eq!(during[0].message, "Processing request...");
                Ok::<_, ApiError>(json!({"message": "Saved"}))
            },
            &center,
            &ServiceOptions::new(),
        )
        .await;

        assert!(result.is_ok());
        let after = center.notifications();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].kind, NotificationKind::Success);
        assert_eq!(after[0].message, "Saved");
    }

    #[tokio::test]
    async fn test_loading_operation_error_removes_loading() {
        let center = center();

        let result = handle_loading_operation(
            || async { Err::<(), _>(ApiError::from_json(500, json!({"error": "Internal"}))) },
            &center,
            &ServiceOptions::new().loading_title("Placing order"),
        )
        .await;

        assert!(result.is_err());
        let after = center.notifications();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].kind, NotificationKind::Error);
        assert_eq!(after[0].message, "Internal");
    }

    #[tokio::test]
    async fn test_bridge_notifier_without_center() {
        let _serial = crate::bridge::tests::serial();

        let result =
            handle_loading_operation(|| async { Ok::<_, ApiError>(()) }, &Bridge, &ServiceOptions::new())
                .await;

        assert!(result.is_ok());
    }

    // === UserFacingError Tests ===

    #[test]
    fn test_user_facing_strings() {
        assert_eq!("boom".user_message(), "boom");
        assert_eq!(String::new().user_message(), "An error occurred");
        let error = anyhow::anyhow!("disk full");
        assert_eq!(error.user_message(), "disk full");
    }
}
