//! Error types for frame-auth.
//!
//! This module defines all error types used throughout the crate.
//!
//! Most public operations are fail-soft and never return these errors
//! directly: backend lookups collapse to `None` or [`UserRole::Unknown`],
//! and push notifications swallow failures. The `try_*` variants on
//! [`AuthClient`] and the frontend token futures are where an [`Error`]
//! actually reaches the caller.
//!
//! [`UserRole::Unknown`]: crate::UserRole::Unknown
//! [`AuthClient`]: crate::AuthClient
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::Url`], [`Error::InvalidHeader`] |
//! | Host frame | [`Error::Unavailable`], [`Error::Denied`], [`Error::ChannelClosed`] |
//! | Backend | [`Error::Status`], [`Error::Protocol`], [`Error::Http`] |
//! | Transport | [`Error::WebSocket`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use reqwest::header::InvalidHeaderValue;
use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::UserToken;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when the backend client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A credential could not be encoded as an HTTP header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    // ========================================================================
    // Host Frame Errors
    // ========================================================================
    /// No host frame is reachable through the message channel.
    ///
    /// Returned by [`MessageChannel`](crate::transport::MessageChannel)
    /// implementations when running outside a frame context.
    #[error("Host frame unavailable: {message}")]
    Unavailable {
        /// Why the host could not be reached.
        message: String,
    },

    /// The host frame denied the token request.
    ///
    /// Carries whatever user token the host attached to the denial, if any.
    #[error("denied")]
    Denied {
        /// Token attached to the denial event.
        user_token: Option<UserToken>,
    },

    /// The client was dropped before the host replied.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// Backend returned a non-success HTTP status.
    #[error("Backend returned {status} for {endpoint}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Endpoint path that was called.
        endpoint: String,
    },

    /// Backend response did not have the expected shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a host-unavailable error.
    #[inline]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a denial error.
    #[inline]
    pub fn denied(user_token: Option<UserToken>) -> Self {
        Self::Denied { user_token }
    }

    /// Creates a non-success status error.
    #[inline]
    pub fn status(status: u16, endpoint: impl Into<String>) -> Self {
        Self::Status {
            status,
            endpoint: endpoint.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the host explicitly denied the request.
    #[inline]
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    /// Returns `true` if no host frame could be reached.
    #[inline]
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns `true` for network and connection failures.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::WebSocket(_))
    }

    /// Returns the user token attached to a denial, if any.
    #[inline]
    #[must_use]
    pub fn denied_token(&self) -> Option<&UserToken> {
        match self {
            Self::Denied { user_token } => user_token.as_ref(),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
