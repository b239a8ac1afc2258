//! Backend surface: the REST client.
//!
//! [`AuthClient`] turns a viewer token obtained by the frontend into a
//! role or grant, and sends push notifications on the app's behalf.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `builder` | [`AuthClientBuilder`] with validation |
//! | `client` | [`AuthClient`] and endpoint constants |
//! | `config` | [`ApiConfig`], environment and URL construction |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for the backend client.
pub mod builder;

/// Backend REST client.
pub mod client;

/// Credentials and endpoint configuration.
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::AuthClientBuilder;
pub use client::AuthClient;
pub use config::ApiConfig;
