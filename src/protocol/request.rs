//! Outbound host requests.
//!
//! Requests are posted to the host frame without waiting for delivery; the
//! answer, if any, arrives later as a [`HostEvent`](super::HostEvent).

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::model::Capability;

// ============================================================================
// Constants
// ============================================================================

/// Target origin used when posting to the host frame.
pub const TARGET_ORIGIN: &str = "*";

// ============================================================================
// HostRequest
// ============================================================================

/// A request from the embedded app to the host frame.
///
/// # Format
///
/// ```json
/// { "_event": "getToken", "grants": ["username"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "_event")]
pub enum HostRequest {
    /// Ask the host for a token identifying the viewer.
    #[serde(rename = "getToken")]
    GetToken {
        /// Capabilities the app wants granted alongside the token.
        grants: Vec<Capability>,
    },

    /// Ask the host whether the viewer already holds capabilities.
    #[serde(rename = "checkGrant")]
    CheckGrant {
        /// Capabilities to check.
        grants: Vec<Capability>,
    },
}

impl HostRequest {
    /// Creates a token request.
    #[inline]
    #[must_use]
    pub fn get_token(grants: &[Capability]) -> Self {
        Self::GetToken {
            grants: grants.to_vec(),
        }
    }

    /// Creates a grant check.
    #[inline]
    #[must_use]
    pub fn check_grant(grants: &[Capability]) -> Self {
        Self::CheckGrant {
            grants: grants.to_vec(),
        }
    }

    /// Returns the wire name of the request.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetToken { .. } => "getToken",
            Self::CheckGrant { .. } => "checkGrant",
        }
    }

    /// Serializes the request into a structured message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_message(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
