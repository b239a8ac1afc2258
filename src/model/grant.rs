//! Capabilities and grant records.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::UserId;

// ============================================================================
// Types
// ============================================================================

/// Open-ended attributes attached to a grant.
pub type Attributes = FxHashMap<String, Value>;

// ============================================================================
// Capability
// ============================================================================

/// A named permission scope that can be requested from or checked with the
/// host frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    /// Permission to send the viewer push notifications.
    PushNotifications,
    /// Permission to read the viewer's username.
    Username,
    /// Any scope this crate does not name.
    Custom(String),
}

impl Capability {
    /// Returns the wire name of the capability.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PushNotifications => "push_notifications",
            Self::Username => "username",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for Capability {
    fn from(value: String) -> Self {
        match value.as_str() {
            "push_notifications" => Self::PushNotifications,
            "username" => Self::Username,
            _ => Self::Custom(value),
        }
    }
}

impl From<&str> for Capability {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        match value {
            Capability::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AuthGrant
// ============================================================================

/// A previously issued authorization tying a user to capabilities.
///
/// # Format
///
/// ```json
/// {
///   "userId": "u-1",
///   "dateCreated": "2024-01-01T00:00:00.000Z",
///   "pushNotificationsEnabled": true,
///   "attributes": { "username": "ada" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    /// User the grant belongs to.
    pub user_id: UserId,

    /// Creation timestamp as reported by the backend.
    #[serde(default)]
    pub date_created: String,

    /// Whether the user accepted push notifications.
    #[serde(default)]
    pub push_notifications_enabled: bool,

    /// Additional granted attributes (e.g. `username`).
    #[serde(default)]
    pub attributes: Attributes,
}

impl AuthGrant {
    /// Returns a string attribute by key.
    #[must_use]
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================
