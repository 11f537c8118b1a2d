use reqwest::StatusCode;
use thiserror::Error;

use crate::action::Operation;

/// Everything that can go wrong talking to the remote API.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reason an operation failed, as recorded in the store.
///
/// Only the message survives; the originating [`GatewayError`] is logged and
/// dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Server-provided message when there is a non-blank one, the
    /// operation's fallback otherwise.
    pub fn from_gateway(err: &GatewayError, operation: Operation) -> Self {
        match err {
            GatewayError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Self::new(message.clone()),
            _ => Self::new(operation.fallback_message()),
        }
    }
}
