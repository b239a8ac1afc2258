//! In-process message channel.
//!
//! [`MemoryChannel`] is the app end, [`MemoryHost`] the host end. The host
//! end records every posted message and delivers events synchronously to
//! the subscribed handlers, which makes it the channel of choice for tests
//! and for hosts living in the same process as the app.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};
use crate::protocol::HostEvent;

use super::channel::{MessageChannel, MessageHandler};

// ============================================================================
// PostedMessage
// ============================================================================

/// A message posted by the app, as seen by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    /// Message body.
    pub message: Value,
    /// Target origin the app posted to.
    pub target_origin: String,
}

// ============================================================================
// Shared State
// ============================================================================

#[derive(Default)]
struct MemoryState {
    attached: bool,
    handlers: Vec<MessageHandler>,
    posted: Vec<PostedMessage>,
}

// ============================================================================
// MemoryChannel
// ============================================================================

/// App end of an in-process channel.
#[derive(Clone)]
pub struct MemoryChannel {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryChannel {
    /// Creates a connected app/host pair.
    #[must_use]
    pub fn pair() -> (Self, MemoryHost) {
        let state = Arc::new(Mutex::new(MemoryState {
            attached: true,
            ..MemoryState::default()
        }));

        (
            Self {
                state: Arc::clone(&state),
            },
            MemoryHost { state },
        )
    }

    /// Creates a channel with no host frame behind it.
    ///
    /// Every subscribe and post reports [`Error::Unavailable`].
    #[must_use]
    pub fn detached() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }
}

impl MessageChannel for MemoryChannel {
    fn subscribe(&self, handler: MessageHandler) -> Result<()> {
        let mut state = self.state.lock();
        if !state.attached {
            return Err(Error::unavailable("no host frame attached"));
        }
        state.handlers.push(handler);
        Ok(())
    }

    fn post(&self, message: Value, target_origin: &str) -> Result<()> {
        let mut state = self.state.lock();
        if !state.attached {
            return Err(Error::unavailable("no host frame attached"));
        }
        state.posted.push(PostedMessage {
            message,
            target_origin: target_origin.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// MemoryHost
// ============================================================================

/// Host end of an in-process channel.
#[derive(Clone)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryHost {
    /// Delivers a raw message to every subscribed handler.
    ///
    /// Handlers run on the calling thread after the channel lock is
    /// released. Returns the number of handlers invoked.
    pub fn deliver(&self, message: &Value) -> usize {
        let handlers: Vec<MessageHandler> = self.state.lock().handlers.clone();

        for handler in &handlers {
            handler(message);
        }

        trace!(handlers = handlers.len(), "Delivered host message");
        handlers.len()
    }

    /// Delivers a typed event.
    pub fn deliver_event(&self, event: &HostEvent) -> usize {
        self.deliver(&event.to_message())
    }

    /// Returns a copy of every message posted so far.
    #[must_use]
    pub fn posted(&self) -> Vec<PostedMessage> {
        self.state.lock().posted.clone()
    }

    /// Removes and returns every message posted so far.
    pub fn take_posted(&self) -> Vec<PostedMessage> {
        std::mem::take(&mut self.state.lock().posted)
    }

    /// Returns the number of messages posted so far.
    #[inline]
    #[must_use]
    pub fn posted_count(&self) -> usize {
        self.state.lock().posted.len()
    }

    /// Returns the number of subscribed handlers.
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().handlers.len()
    }

    /// Detaches the host; later subscribes and posts fail as unavailable.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        state.attached = false;
        state.handlers.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
