//! Frontend client talking to the host frame.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::UserToken;
use crate::model::Capability;
use crate::protocol::{HostEvent, HostRequest, TARGET_ORIGIN};
use crate::transport::{MessageChannel, MessageHandler};

use super::pending::PendingCallbacks;

// ============================================================================
// Inner
// ============================================================================

/// State shared between the client handles and the channel handler.
struct Inner {
    channel: Arc<dyn MessageChannel>,
    /// Token cached for the lifetime of the client.
    token: Mutex<Option<UserToken>>,
    token_callbacks: PendingCallbacks<Result<UserToken>>,
    grant_callbacks: PendingCallbacks<bool>,
    available: AtomicBool,
}

// ============================================================================
// FrameAuth
// ============================================================================

/// Frontend auth client for an app embedded in a host frame.
///
/// Asks the host for a viewer token and for grant decisions over the
/// injected [`MessageChannel`]. All requests of the same kind that are in
/// flight together are answered together by the next matching reply.
///
/// Nothing here times out. If the host never replies, or the channel is
/// unavailable, the futures stay pending; wrap them in
/// [`tokio::time::timeout`] when bounded latency matters.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use frame_auth::transport::MemoryChannel;
/// use frame_auth::{FrameAuth, HostEvent, UserToken};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> frame_auth::Result<()> {
/// let (channel, host) = MemoryChannel::pair();
/// let auth = FrameAuth::new(Arc::new(channel));
///
/// let token = auth.get_token(&[]);
/// host.deliver_event(&HostEvent::TokenCreated {
///     token: None,
///     user_token: Some(UserToken::new("abc")),
/// });
///
/// assert_eq!(token.await?.as_str(), "abc");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FrameAuth {
    inner: Arc<Inner>,
}

impl FrameAuth {
    /// Creates a client and subscribes it to the channel.
    ///
    /// If the channel reports no host frame, the client still works but
    /// none of its requests will ever resolve; [`FrameAuth::is_available`]
    /// returns `false` in that case.
    #[must_use]
    pub fn new(channel: Arc<dyn MessageChannel>) -> Self {
        let inner = Arc::new(Inner {
            channel,
            token: Mutex::new(None),
            token_callbacks: PendingCallbacks::new(),
            grant_callbacks: PendingCallbacks::new(),
            available: AtomicBool::new(true),
        });

        // Weak so the channel's handler does not keep the client alive.
        let weak = Arc::downgrade(&inner);
        let handler: MessageHandler = Arc::new(move |message: &Value| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_message(message);
            }
        });

        if let Err(e) = inner.channel.subscribe(handler) {
            debug!(error = %e, "Host frame unavailable, requests will not resolve");
            inner.available.store(false, Ordering::Release);
        }

        Self { inner }
    }

    /// Returns `false` if the channel reported no host frame.
    ///
    /// Only reflects the subscription made in [`FrameAuth::new`]. A relay
    /// that closes afterwards still reports `true` while its posts are
    /// dropped; check the channel itself (for example
    /// [`WebSocketChannel::is_closed`](crate::transport::WebSocketChannel::is_closed)).
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.available.load(Ordering::Acquire)
    }

    /// Returns the cached token, if one has been issued.
    #[must_use]
    pub fn cached_token(&self) -> Option<UserToken> {
        self.inner.token.lock().clone()
    }

    /// Drops the cached token so the next request goes to the host.
    pub fn clear_token(&self) {
        self.inner.token.lock().take();
    }

    /// Returns the number of token requests waiting for the host.
    #[inline]
    #[must_use]
    pub fn pending_token_requests(&self) -> usize {
        self.inner.token_callbacks.len()
    }

    /// Returns the number of grant checks waiting for the host.
    #[inline]
    #[must_use]
    pub fn pending_grant_checks(&self) -> usize {
        self.inner.grant_callbacks.len()
    }

    // ========================================================================
    // Token Requests
    // ========================================================================

    /// Requests a viewer token, reporting through a callback.
    ///
    /// With a token already cached the callback runs immediately on the
    /// calling thread and nothing is posted. Otherwise the callback waits
    /// for the next `TokenCreated` or `GrantsDenied` event.
    ///
    /// # Arguments
    ///
    /// * `grants` - Capabilities to request alongside the token
    /// * `callback` - Receives the token, or [`Error::Denied`]
    pub fn get_token_with_callback<F>(&self, grants: &[Capability], callback: F)
    where
        F: FnOnce(Result<UserToken>) + Send + 'static,
    {
        self.inner.request_token(grants, false, callback);
    }

    /// Requests a fresh token from the host, ignoring the cache.
    pub fn refresh_token_with_callback<F>(&self, grants: &[Capability], callback: F)
    where
        F: FnOnce(Result<UserToken>) + Send + 'static,
    {
        self.inner.request_token(grants, true, callback);
    }

    /// Requests a viewer token.
    ///
    /// The request is enqueued and posted when this method is called, not
    /// when the returned future is first polled.
    ///
    /// # Errors
    ///
    /// - [`Error::Denied`] if the viewer declined
    /// - [`Error::ChannelClosed`] if the client was dropped before a reply
    pub fn get_token(
        &self,
        grants: &[Capability],
    ) -> impl Future<Output = Result<UserToken>> + Send + use<> {
        let (tx, rx) = oneshot::channel();
        self.get_token_with_callback(grants, move |reply| {
            let _ = tx.send(reply);
        });
        async move { rx.await? }
    }

    /// Requests a fresh token from the host, ignoring the cache.
    ///
    /// # Errors
    ///
    /// Same as [`FrameAuth::get_token`].
    pub fn refresh_token(
        &self,
        grants: &[Capability],
    ) -> impl Future<Output = Result<UserToken>> + Send + use<> {
        let (tx, rx) = oneshot::channel();
        self.refresh_token_with_callback(grants, move |reply| {
            let _ = tx.send(reply);
        });
        async move { rx.await? }
    }

    // ========================================================================
    // Grant Checks
    // ========================================================================

    /// Asks the host whether the viewer holds capabilities, reporting
    /// through a callback.
    ///
    /// Always posts a request; grant answers are never cached.
    pub fn check_grant_with_callback<F>(&self, grants: &[Capability], callback: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.inner.grant_callbacks.push(callback);
        self.inner.post(&HostRequest::check_grant(grants));
    }

    /// Asks the host whether the viewer holds capabilities.
    ///
    /// Resolves to `false` if the client is dropped before a reply.
    pub fn check_grant(&self, grants: &[Capability]) -> impl Future<Output = bool> + Send + use<> {
        let (tx, rx) = oneshot::channel();
        self.check_grant_with_callback(grants, move |has_grants| {
            let _ = tx.send(has_grants);
        });
        async move { rx.await.unwrap_or(false) }
    }

    // ========================================================================
    // Inbound
    // ========================================================================

    /// Dispatches an inbound message as if it arrived on the channel.
    pub fn handle_message(&self, message: &Value) {
        self.inner.handle_message(message);
    }
}

// ============================================================================
// Inner Implementation
// ============================================================================

impl Inner {
    fn request_token<F>(&self, grants: &[Capability], force: bool, callback: F)
    where
        F: FnOnce(Result<UserToken>) + Send + 'static,
    {
        // Held across the enqueue so a concurrent TokenCreated either sees
        // this callback or we see its token.
        let guard = self.token.lock();

        match guard.clone().filter(|token| !force && !token.is_empty()) {
            Some(token) => {
                drop(guard);
                trace!("Token served from cache");
                callback(Ok(token));
            }
            None => {
                self.token_callbacks.push(callback);
                drop(guard);
                self.post(&HostRequest::get_token(grants));
            }
        }
    }

    /// Posts a request; an unavailable host is logged and otherwise ignored.
    fn post(&self, request: &HostRequest) {
        let message = match request.to_message() {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, request = request.name(), "Failed to encode host request");
                return;
            }
        };

        match self.channel.post(message, TARGET_ORIGIN) {
            Ok(()) => trace!(request = request.name(), "Posted host request"),
            Err(e) => debug!(error = %e, request = request.name(), "Host request not delivered"),
        }
    }

    fn handle_message(&self, message: &Value) {
        let Some(event) = HostEvent::parse(message) else {
            trace!("Ignoring message without event name");
            return;
        };

        match &event {
            HostEvent::TokenCreated { .. } => {
                let Some(token) = event.created_token().cloned() else {
                    warn!("TokenCreated carried no token");
                    let outcome = self.token_callbacks.resolve_with(|| {
                        Err(Error::protocol("TokenCreated carried no token"))
                    });
                    debug!(invoked = outcome.invoked, "Token requests failed");
                    return;
                };

                // An empty token is handed out but never served from cache.
                if !token.is_empty() {
                    *self.token.lock() = Some(token.clone());
                }
                let outcome = self.token_callbacks.resolve_with(|| Ok(token.clone()));
                debug!(
                    invoked = outcome.invoked,
                    panicked = outcome.panicked,
                    "Token requests resolved"
                );
            }

            HostEvent::GrantsResolved { has_grants } => {
                let outcome = self.grant_callbacks.resolve(has_grants);
                debug!(
                    has_grants,
                    invoked = outcome.invoked,
                    panicked = outcome.panicked,
                    "Grant checks resolved"
                );
            }

            HostEvent::GrantsDenied { user_token } => {
                let outcome = self
                    .token_callbacks
                    .resolve_with(|| Err(Error::denied(user_token.clone())));
                debug!(
                    invoked = outcome.invoked,
                    panicked = outcome.panicked,
                    "Token requests denied"
                );
            }

            HostEvent::Unknown { event } => {
                trace!(event = %event, "Ignoring unknown host event");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
