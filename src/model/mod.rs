//! Domain types shared by the frontend and backend surfaces.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `role` | [`UserRole`] resolved for a token |
//! | `grant` | [`Capability`] scopes and [`AuthGrant`] records |
//! | `notification` | [`PushNotification`] payloads and [`Destination`] |

// ============================================================================
// Submodules
// ============================================================================

/// Capabilities and grant records.
pub mod grant;

/// Push notification payloads.
pub mod notification;

/// Viewer roles.
pub mod role;

// ============================================================================
// Re-exports
// ============================================================================

pub use grant::{Attributes, AuthGrant, Capability};
pub use notification::{Destination, PushNotification};
pub use role::UserRole;
