//! Newtype identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a notification held by a center.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Create an ID from a caller-chosen string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NotificationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NotificationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = NotificationId::new("toast-123");
        assert_eq!(id.as_str(), "toast-123");
    }

    #[test]
    fn test_id_generation_is_unique() {
        let id1 = NotificationId::generate();
        let id2 = NotificationId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_display_and_from() {
        let id: NotificationId = "toast-456".into();
        assert_eq!(format!("{}", id), "toast-456");
        assert_eq!(id.into_inner(), "toast-456");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = NotificationId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
