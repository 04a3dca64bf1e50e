//! Notification center error types.

use thiserror::Error;

/// Errors raised by the notification center itself.
///
/// Malformed notification input never produces one of these: titles and
/// messages are coerced to strings instead. These cover programmer errors
/// and configuration problems.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The notification API was used outside of a mounted center.
    #[error("use_notifications must be used within a NotificationProvider")]
    NoActiveCenter,

    /// Unknown screen position name.
    #[error("Invalid notification position: {0}")]
    InvalidPosition(String),

    /// Unknown notification kind name.
    #[error("Invalid notification type: {0}")]
    InvalidKind(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON configuration or request could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
