//! Push notification payloads.

use serde::{Serialize, Serializer};

use crate::identifiers::UserId;

// ============================================================================
// PushNotification
// ============================================================================

/// Contents of an outbound push notification.
///
/// # Example
///
/// ```
/// use frame_auth::PushNotification;
///
/// let notification = PushNotification::new("🎉", "Quiz", "You won!").with_ref("?result=1");
/// assert_eq!(notification.reference.as_deref(), Some("?result=1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotification {
    /// Icon shown next to the message (emoji or URL).
    pub icon: String,

    /// Name of the sending app.
    pub app_name: String,

    /// Message body.
    pub message: String,

    /// Optional deep-link reference appended to the app URL.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl PushNotification {
    /// Creates a notification without a reference.
    #[must_use]
    pub fn new(
        icon: impl Into<String>,
        app_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            app_name: app_name.into(),
            message: message.into(),
            reference: None,
        }
    }

    /// Sets the deep-link reference.
    #[inline]
    #[must_use]
    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

// ============================================================================
// Destination
// ============================================================================

/// Recipient of a push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A specific user.
    User(UserId),
    /// The owner of the app.
    Owner,
}

impl Destination {
    /// Returns the wire value: the user id, or `"owner"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User(id) => id.as_str(),
            Self::Owner => "owner",
        }
    }
}

impl Serialize for Destination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
