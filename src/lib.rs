//! frame-auth - Viewer identity for apps embedded in a host frame.
//!
//! This library lets an embedded app find out who is looking at it and
//! act on that identity.
//!
//! # Architecture
//!
//! The SDK has two surfaces that meet at the [`UserToken`]:
//!
//! - **Frontend** ([`FrameAuth`]): asks the host frame for a token and for
//!   grant decisions over an injected [`MessageChannel`](transport::MessageChannel)
//! - **Backend** ([`AuthClient`]): exchanges the token for a role or grant
//!   over REST and sends push notifications
//!
//! Key design principles:
//!
//! - The host frame is reached through a channel passed in at construction
//! - Replies carry no correlation id; same-kind requests resolve together
//! - Failures degrade to benign defaults; only an explicit denial surfaces
//! - Nothing times out; callers bound latency themselves
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use frame_auth::transport::WebSocketChannel;
//! use frame_auth::{AuthClient, Capability, FrameAuth, Result, UserRole};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Frontend: get a token from the host frame
//!     let channel = WebSocketChannel::connect("ws://127.0.0.1:9000").await?;
//!     let auth = FrameAuth::new(Arc::new(channel));
//!     let token = auth.get_token(&[Capability::Username]).await?;
//!
//!     // Backend: resolve the viewer's role
//!     let client = AuthClient::builder()
//!         .project_id("p1")
//!         .project_token("s1")
//!         .build()?;
//!
//!     if client.get_role(&token).await == UserRole::Admin {
//!         println!("Welcome back, admin");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Backend REST client and configuration |
//! | [`bridge`] | Frontend client and pending callback registry |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`model`] | Roles, capabilities, grants, notifications |
//! | [`protocol`] | Cross-frame message types |
//! | [`transport`] | Message channel abstraction and carriers |

// ============================================================================
// Modules
// ============================================================================

/// Backend REST client.
///
/// Use [`AuthClient::builder()`] to create a configured client.
pub mod api;

/// Frontend client for the host frame.
pub mod bridge;

/// Error types and result aliases.
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Domain types.
pub mod model;

/// Cross-frame message types.
pub mod protocol;

/// Host frame transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Backend types
pub use api::{ApiConfig, AuthClient, AuthClientBuilder};

// Frontend types
pub use bridge::FrameAuth;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{UserId, UserToken};

// Domain types
pub use model::{Attributes, AuthGrant, Capability, Destination, PushNotification, UserRole};

// Protocol types
pub use protocol::{HostEvent, HostRequest};
