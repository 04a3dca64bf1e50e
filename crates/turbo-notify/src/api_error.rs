//! Failures of remote API calls, and the messages shown for them.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

/// A failed API call, classified by what reached the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400 response carrying per-field messages.
    #[error("validation failed with status {status}")]
    Validation {
        status: u16,
        errors: BTreeMap<String, String>,
    },

    /// Any other error response.
    #[error("request failed with status {status}")]
    Transport { status: u16, message: Option<String> },

    /// The request went out but no response came back.
    #[error("no response received (timed out: {timed_out})")]
    Network { timed_out: bool },

    #[error("{}", message.as_deref().unwrap_or("unknown error"))]
    Unknown { message: Option<String> },
}

/// Error body as sent by the storefront API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<BTreeMap<String, serde_json::Value>>,
}

fn text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

impl ApiError {
    /// Classify an error response from its status and raw body.
    ///
    /// Bodies that aren't JSON objects are treated as carrying no message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let body = serde_json::from_str(body).unwrap_or_default();
        Self::from_body(status, body)
    }

    /// Classify an error response from an already-parsed JSON body.
    pub fn from_json(status: u16, body: serde_json::Value) -> Self {
        let body = serde_json::from_value(body).unwrap_or_default();
        Self::from_body(status, body)
    }

    fn from_body(status: u16, body: ErrorBody) -> Self {
        if status == 400 {
            if let Some(errors) = body.errors {
                return ApiError::Validation {
                    status,
                    errors: errors
                        .into_iter()
                        .map(|(field, message)| (field, text(message).unwrap_or_default()))
                        .collect(),
                };
            }
        }

        ApiError::Transport {
            status,
            message: body.message.and_then(text).or_else(|| body.error.and_then(text)),
        }
    }

    pub fn network() -> Self {
        ApiError::Network { timed_out: false }
    }

    pub fn timeout() -> Self {
        ApiError::Network { timed_out: true }
    }

    pub fn unknown(message: impl ToString) -> Self {
        ApiError::Unknown {
            message: Some(message.to_string()),
        }
    }

    /// HTTP status, when a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { status, .. } | ApiError::Transport { status, .. } => {
                Some(*status)
            }
            ApiError::Network { .. } | ApiError::Unknown { .. } => None,
        }
    }

    /// Human-readable message for an error notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { errors, .. } => {
                let fields = errors
                    .iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Validation error: {}", fields)
            }
            ApiError::Transport { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status code {}", status)),
            ApiError::Network { timed_out: true } => {
                "Request timed out. Please try again.".to_string()
            }
            ApiError::Network { timed_out: false } => {
                "Network error. Please check your connection.".to_string()
            }
            ApiError::Unknown { message } => message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "An error occurred".to_string()),
        }
    }
}
