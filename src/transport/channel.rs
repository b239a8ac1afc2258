//! Message channel abstraction.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Types
// ============================================================================

/// Inbound message callback.
///
/// Called once per message received from the host frame.
pub type MessageHandler = Arc<dyn Fn(&Value) + Send + Sync>;

// ============================================================================
// MessageChannel
// ============================================================================

/// Subscribe/post capability towards the host frame.
///
/// Implementations report a missing host (no parent frame, closed relay)
/// as [`Error::Unavailable`](crate::Error::Unavailable) rather than
/// silently dropping the call, so callers can decide how to degrade.
pub trait MessageChannel: Send + Sync {
    /// Registers a handler for every inbound message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`](crate::Error::Unavailable) if there is
    /// no host to listen to.
    fn subscribe(&self, handler: MessageHandler) -> Result<()>;

    /// Posts a structured message to the host frame.
    ///
    /// Delivery is not confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`](crate::Error::Unavailable) if there is
    /// no host to post to.
    fn post(&self, message: Value, target_origin: &str) -> Result<()>;
}
