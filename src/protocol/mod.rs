//! Cross-frame message types.
//!
//! This module defines the messages exchanged between the embedded app
//! (local end) and the host frame (remote end).
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Discriminant | Purpose |
//! |--------------|-----------|--------------|---------|
//! | [`HostRequest`] | App → Host | `_event` | Ask for a token or a grant check |
//! | [`HostEvent`] | Host → App | `event` | Deliver a token, grant decision, or denial |
//!
//! Replies carry no correlation id. Every pending request of the same kind
//! is answered by the next reply of that kind.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `event` | Inbound host events |
//! | `request` | Outbound host requests |

// ============================================================================
// Submodules
// ============================================================================

/// Inbound host events.
pub mod event;

/// Outbound host requests.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::HostEvent;
pub use request::{HostRequest, TARGET_ORIGIN};
