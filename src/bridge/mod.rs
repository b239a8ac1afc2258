//! Frontend surface: the message bridge and request dispatcher.
//!
//! [`FrameAuth`] posts [`HostRequest`](crate::protocol::HostRequest)s to
//! the host frame and resolves waiting callers when the host answers with
//! a [`HostEvent`](crate::protocol::HostEvent).
//!
//! # Resolution Model
//!
//! | Event | Resolves | With |
//! |-------|----------|------|
//! | `TokenCreated` | every pending token request | the carried token (also cached) |
//! | `GrantsResolved` | every pending grant check | `hasGrants` |
//! | `GrantsDenied` | every pending token request | [`Error::Denied`](crate::Error::Denied) |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `frame` | [`FrameAuth`] client |
//! | `pending` | [`PendingCallbacks`] batch registry |

// ============================================================================
// Submodules
// ============================================================================

/// Frontend client.
pub mod frame;

/// Pending callback registry.
pub mod pending;

// ============================================================================
// Re-exports
// ============================================================================

pub use frame::FrameAuth;
pub use pending::{BatchOutcome, Callback, PendingCallbacks};
