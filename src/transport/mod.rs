//! Host frame transport layer.
//!
//! The frontend never talks to a window object directly. It is handed a
//! [`MessageChannel`] that can subscribe to inbound messages and post
//! outbound ones, and it treats an unavailable channel as "no host frame".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  FrameAuth      │     post(HostRequest)        │  Host frame     │
//! │                 │─────────────────────────────►│                 │
//! │  MessageChannel │                              │  (or relay)     │
//! │                 │◄─────────────────────────────│                 │
//! └─────────────────┘     handler(HostEvent)       └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | [`MessageChannel`] trait and handler type |
//! | `memory` | In-process channel with a scriptable host end |
//! | `websocket` | Channel carried over a WebSocket host relay |

// ============================================================================
// Submodules
// ============================================================================

/// Message channel abstraction.
pub mod channel;

/// In-process channel.
pub mod memory;

/// WebSocket relay channel.
pub mod websocket;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{MessageChannel, MessageHandler};
pub use memory::{MemoryChannel, MemoryHost, PostedMessage};
pub use websocket::WebSocketChannel;
