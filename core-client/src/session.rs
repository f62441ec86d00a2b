//! Session Store
//!
//! Owns the authenticated session: login, registration, logout, and
//! restoring a persisted session on startup. The bearer token is shared
//! with the gateway through a [`TokenCell`] so protected calls always see
//! the current credential without the stores referencing each other.

use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use bridge_traits::StateStore;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::types::Session;

/// Storage key under which the serialized session is persisted.
pub const SESSION_STORAGE_KEY: &str = "smf_auth_v1";

/// Shared, mutable slot holding the current bearer token.
///
/// Cloning is cheap and all clones observe the same value. The session
/// store writes it; the HTTP gateway reads it on every protected request.
#[derive(Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().expect("token cell poisoned").clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().expect("token cell poisoned") = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().expect("token cell poisoned") = None;
    }
}

impl std::fmt::Debug for TokenCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let present = self.get().is_some();
        f.debug_struct("TokenCell").field("present", &present).finish()
    }
}

/// Manages the authenticated session and its persistence.
pub struct SessionStore {
    storage: Arc<dyn StateStore>,
    gateway: Arc<dyn Gateway>,
    token: TokenCell,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StateStore>, gateway: Arc<dyn Gateway>, token: TokenCell) -> Self {
        Self {
            storage,
            gateway,
            token,
            current: RwLock::new(None),
        }
    }

    /// Load a previously persisted session, if any.
    ///
    /// A missing key is the normal unauthenticated state. A malformed blob
    /// is treated the same: it is logged, removed on a best-effort basis,
    /// and never surfaces as an error.
    pub async fn restore(&self) -> Result<Option<Session>> {
        let raw = match self.storage.get(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Failed to read persisted session: {}", e);
                return Ok(None);
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding malformed persisted session: {}", e);
                if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY).await {
                    warn!("Failed to remove malformed session blob: {}", e);
                }
                return Ok(None);
            }
        };

        self.install(session.clone());
        debug!(username = %session.username, "Restored persisted session");
        Ok(Some(session))
    }

    /// Authenticate against the backend and persist the resulting session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let session = self.gateway.login(username, password).await?;
        info!(username = %session.username, "Logged in");
        self.install(session.clone());
        self.persist(&session).await;
        Ok(session)
    }

    /// Create an account, then log straight into it.
    pub async fn register(&self, username: &str, password: &str) -> Result<Session> {
        self.gateway.register(username, password).await?;
        info!(username = %username, "Registered account");
        self.login(username, password).await
    }

    /// Drop the session locally and remove the persisted copy.
    ///
    /// Always succeeds from the caller's point of view; a failed storage
    /// removal is logged and ignored.
    pub async fn logout(&self) {
        self.token.clear();
        *self.current.write().expect("session lock poisoned") = None;
        if let Err(e) = self.storage.remove(SESSION_STORAGE_KEY).await {
            warn!("Failed to remove persisted session: {}", e);
        }
        info!("Logged out");
    }

    /// The active session, if authenticated.
    pub fn current(&self) -> Option<Session> {
        self.current.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Handle to the shared token slot this store writes.
    pub fn token(&self) -> TokenCell {
        self.token.clone()
    }

    fn install(&self, session: Session) {
        self.token.set(session.token.clone());
        *self.current.write().expect("session lock poisoned") = Some(session);
    }

    /// Persistence is best-effort: a write failure must not undo a
    /// successful authentication.
    async fn persist(&self, session: &Session) {
        let blob = match serde_json::to_string(session) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Failed to serialize session: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_STORAGE_KEY, &blob).await {
            warn!("Failed to persist session: {}", e);
        }
    }
}
