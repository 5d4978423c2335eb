//! Authentication capability
//!
//! The controller depends only on `AuthClient`. Transports (hosted backend,
//! cross-origin relay, redirects) live behind implementations of it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::error::AuthError;

/// Authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Asynchronous authentication client
#[allow(async_fn_in_trait)]
pub trait AuthClient {
    /// Current session, if signed in
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Stream of session changes (`None` on sign-out)
    fn on_session_change(&self) -> watch::Receiver<Option<Session>>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// In-process auth client holding one session slot
///
/// Clones share the slot.
#[derive(Debug, Clone)]
pub struct InMemoryAuth {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl InMemoryAuth {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current session and notify subscribers
    pub fn sign_in(&self, session: Session) {
        self.tx.send_replace(Some(session));
    }
}

impl AuthClient for InMemoryAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.tx.borrow().clone())
    }

    fn on_session_change(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.tx.send_replace(None);
        Ok(())
    }
}
