//! Persisted Client State
//!
//! A string key-value store for the small amount of client state that must
//! survive process restarts (currently the serialized session). Hosts back
//! it with whatever fits the platform: a JSON file on desktop, web storage
//! in an embedded shell, plain memory in tests.

use async_trait::async_trait;

use crate::error::Result;

/// Persisted string key-value storage.
///
/// Values are opaque strings; callers serialize structured data themselves.
/// Implementations must tolerate missing keys (`get` returns `Ok(None)`) and
/// must never fail on first use of an empty store.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::StateStore;
///
/// async fn remember(store: &dyn StateStore, blob: &str) -> Result<()> {
///     store.set("smf_auth_v1", blob).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Retrieve a value. Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Idempotent; deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists without retrieving it.
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
