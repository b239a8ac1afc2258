//! Viewer role resolved by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// UserRole
// ============================================================================

/// Role of the viewer identified by a token.
///
/// [`UserRole::Unknown`] doubles as the fallback for every failed lookup, so
/// it does not by itself tell a caller whether the backend was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Owner or administrator of the app.
    Admin,
    /// Regular viewer.
    User,
    /// Unresolved, unrecognised, or failed lookup.
    #[default]
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Returns the wire name of the role.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for [`UserRole::Admin`].
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
