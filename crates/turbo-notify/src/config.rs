//! Notification center configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notification::{NotificationKind, Position};
use crate::NotifyError;

/// Per-kind auto-close durations used by the service helpers, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindDurations {
    pub success: u64,
    pub error: u64,
    pub warning: u64,
    pub info: u64,
}

impl Default for KindDurations {
    fn default() -> Self {
        Self {
            success: 5000,
            error: 7000,
            warning: 6000,
            info: 5000,
        }
    }
}

impl KindDurations {
    /// Duration for `kind`. Loading notifications never auto-close.
    pub fn for_kind(&self, kind: NotificationKind) -> Duration {
        let millis = match kind {
            NotificationKind::Success => self.success,
            NotificationKind::Error => self.error,
            NotificationKind::Warning => self.warning,
            NotificationKind::Info => self.info,
            NotificationKind::Loading => 0,
        };
        Duration::from_millis(millis)
    }
}

/// Configuration for a notification center.
///
/// Can be built in code or loaded from TOML/JSON:
///
/// ```toml
/// default_position = "bottom-right"
/// max_notifications = 3
///
/// [durations]
/// error = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Position used by notifications that don't pick one.
    pub default_position: Position,
    /// Maximum notifications held at once. The oldest is evicted first.
    pub max_notifications: usize,
    /// Auto-close delay of the shorthand constructors, in milliseconds.
    pub default_duration_ms: u64,
    /// Delay between a close request and removal, in milliseconds.
    pub exit_delay_ms: u64,
    /// Durations used by the service helpers.
    pub durations: KindDurations,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_position: Position::TopRight,
            max_notifications: 5,
            default_duration_ms: 5000,
            exit_delay_ms: 300,
            durations: KindDurations::default(),
        }
    }
}

impl NotificationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.default_position = position;
        self
    }

    /// Set the notification cap (at least 1).
    pub fn with_max_notifications(mut self, max: usize) -> Self {
        self.max_notifications = max.max(1);
        self
    }

    /// Set the default auto-close duration.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Set the exit animation delay.
    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the per-kind service durations.
    pub fn with_durations(mut self, durations: KindDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    /// Parse from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, NotifyError> {
        let config: Self = toml::from_str(content)?;
        config.validated()
    }

    /// Parse from JSON.
    pub fn from_json_str(content: &str) -> Result<Self, NotifyError> {
        let config: Self = serde_json::from_str(content)?;
        config.validated()
    }

    /// Load from a file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NotifyError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    fn validated(self) -> Result<Self, NotifyError> {
        if self.max_notifications == 0 {
            return Err(NotifyError::Config(
                "max_notifications must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = NotificationConfig::default();

        assert_eq!(config.default_position, Position::TopRight);
        assert_eq!(config.max_notifications, 5);
        assert_eq!(config.default_duration(), Duration::from_millis(5000));
        assert_eq!(config.exit_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_config_builder_chain() {
        let config = NotificationConfig::new()
            .with_position(Position::BottomCenter)
            .with_max_notifications(3)
            .with_default_duration(Duration::from_secs(2))
            .with_exit_delay(Duration::from_millis(150));

        assert_eq!(config.default_position, Position::BottomCenter);
        assert_eq!(config.max_notifications, 3);
        assert_eq!(config.default_duration_ms, 2000);
        assert_eq!(config.exit_delay_ms, 150);
    }

    #[test]
    fn test_config_cap_is_at_least_one() {
        let config = NotificationConfig::new().with_max_notifications(0);
        assert_eq!(config.max_notifications, 1);
    }

    #[test]
    fn test_kind_durations() {
        let durations = KindDurations::default();
        assert_eq!(durations.for_kind(NotificationKind::Error), Duration::from_millis(7000));
        assert_eq!(durations.for_kind(NotificationKind::Warning), Duration::from_millis(6000));
        assert_eq!(durations.for_kind(NotificationKind::Loading), Duration::ZERO);
    }

    #[test]
    fn test_config_from_toml() {
        let config = NotificationConfig::from_toml_str(
            r#"
            default_position = "bottom-left"
            max_notifications = 3

            [durations]
            error = 10000
            "#,
        )
        .unwrap();

        assert_eq!(config.default_position, Position::BottomLeft);
        assert_eq!(config.max_notifications, 3);
        assert_eq!(config.default_duration_ms, 5000);
        assert_eq!(config.durations.error, 10000);
        assert_eq!(config.durations.success, 5000);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            NotificationConfig::from_json_str(r#"{"default_position": "top-center"}"#).unwrap();
        assert_eq!(config.default_position, Position::TopCenter);
    }

    #[test]
    fn test_config_rejects_zero_cap() {
        let result = NotificationConfig::from_toml_str("max_notifications = 0");
        assert!(matches!(result, Err(NotifyError::Config(_))));
    }

    #[test]
    fn test_config_rejects_unknown_position() {
        let result = NotificationConfig::from_toml_str(r#"default_position = "middle""#);
        assert!(matches!(result, Err(NotifyError::Toml(_))));
    }
}
