//! Inbound host events.
//!
//! Events are messages posted by the host frame to the embedded app. The
//! `event` field names the kind; everything else is event-specific.
//!
//! # Event Types
//!
//! | Event | Fields | Resolves |
//! |-------|--------|----------|
//! | `TokenCreated` | `token`, `userToken` | pending token requests |
//! | `GrantsResolved` | `hasGrants` | pending grant checks |
//! | `GrantsDenied` | `userToken` | pending token requests (with an error) |

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};

use crate::identifiers::UserToken;

// ============================================================================
// Constants
// ============================================================================

/// Field holding the event name.
const EVENT_FIELD: &str = "event";

// ============================================================================
// HostEvent
// ============================================================================

/// Parsed host event for type-safe handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host issued a token for the viewer.
    TokenCreated {
        /// Token to cache.
        token: Option<UserToken>,
        /// Token to hand to waiting callers.
        user_token: Option<UserToken>,
    },

    /// The host answered a grant check.
    GrantsResolved {
        /// Whether the viewer holds every checked capability.
        has_grants: bool,
    },

    /// The viewer declined the token request.
    GrantsDenied {
        /// Token attached to the denial, if any.
        user_token: Option<UserToken>,
    },

    /// Unknown event type.
    Unknown {
        /// Event name.
        event: String,
    },
}

impl HostEvent {
    /// Parses an inbound message.
    ///
    /// Returns `None` when the message is not an object or has no string
    /// `event` field.
    #[must_use]
    pub fn parse(message: &Value) -> Option<Self> {
        let event = message.get(EVENT_FIELD)?.as_str()?;

        let parsed = match event {
            "TokenCreated" => Self::TokenCreated {
                token: get_token(message, "token"),
                user_token: get_token(message, "userToken"),
            },

            "GrantsResolved" => Self::GrantsResolved {
                has_grants: message
                    .get("hasGrants")
                    .and_then(Value::as_bool)
                    .unwrap_or_default(),
            },

            "GrantsDenied" => Self::GrantsDenied {
                user_token: get_token(message, "userToken"),
            },

            other => Self::Unknown {
                event: other.to_string(),
            },
        };

        Some(parsed)
    }

    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::TokenCreated { .. } => "TokenCreated",
            Self::GrantsResolved { .. } => "GrantsResolved",
            Self::GrantsDenied { .. } => "GrantsDenied",
            Self::Unknown { event } => event,
        }
    }

    /// Builds the message a host posts for this event.
    ///
    /// Absent tokens are omitted.
    #[must_use]
    pub fn to_message(&self) -> Value {
        let mut message = json!({ "event": self.name() });

        match self {
            Self::TokenCreated { token, user_token } => {
                if let Some(token) = token {
                    message["token"] = json!(token);
                }
                if let Some(user_token) = user_token {
                    message["userToken"] = json!(user_token);
                }
            }
            Self::GrantsResolved { has_grants } => {
                message["hasGrants"] = json!(has_grants);
            }
            Self::GrantsDenied { user_token } => {
                if let Some(user_token) = user_token {
                    message["userToken"] = json!(user_token);
                }
            }
            Self::Unknown { .. } => {}
        }

        message
    }

    /// Token carried by a `TokenCreated` event.
    ///
    /// Prefers `userToken` and falls back to `token`.
    #[must_use]
    pub fn created_token(&self) -> Option<&UserToken> {
        match self {
            Self::TokenCreated { token, user_token } => user_token.as_ref().or(token.as_ref()),
            _ => None,
        }
    }
}

/// Gets a token-valued field; non-strings are treated as absent.
#[inline]
fn get_token(message: &Value, key: &str) -> Option<UserToken> {
    message
        .get(key)
        .and_then(Value::as_str)
        .map(UserToken::new)
}

// ============================================================================
// Tests
// ============================================================================
