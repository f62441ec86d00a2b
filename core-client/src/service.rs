//! Client façade.
//!
//! Wires bridge implementations (HTTP, persistent storage) and a gateway
//! into the stores, in the right order: the token cell first so the
//! gateway and the session store share it, then the stores on top of one
//! gateway instance.

use std::sync::Arc;
use tracing::info;

use bridge_traits::{HttpClient, StateStore};

use crate::catalog::CatalogCache;
use crate::gateway::{Gateway, GatewayConfig, HttpGateway};
use crate::player::PlaybackEngine;
use crate::playlists::PlaylistStore;
use crate::session::{SessionStore, TokenCell};

/// Static configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the streaming backend, e.g. `http://localhost:8000`.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// Host-provided bridge implementations the core runs on.
#[derive(Clone)]
pub struct ClientDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub state_store: Arc<dyn StateStore>,
}

/// One fully wired client: a gateway plus every store sharing it.
pub struct StreamingClient {
    session: Arc<SessionStore>,
    catalog: Arc<CatalogCache>,
    playlists: Arc<PlaylistStore>,
    player: PlaybackEngine,
    gateway: Arc<dyn Gateway>,
}

impl StreamingClient {
    /// Client talking to a real backend over the host's HTTP bridge.
    pub fn new(config: ClientConfig, deps: ClientDependencies) -> Self {
        info!(base_url = %config.base_url, "Initializing streaming client");
        let token = TokenCell::new();
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(
            deps.http_client,
            GatewayConfig::new(config.base_url),
            token.clone(),
        ));
        Self::assemble(gateway, deps.state_store, token)
    }

    /// Client running against any gateway, typically the in-memory mock.
    pub fn with_gateway(gateway: Arc<dyn Gateway>, state_store: Arc<dyn StateStore>) -> Self {
        Self::assemble(gateway, state_store, TokenCell::new())
    }

    fn assemble(
        gateway: Arc<dyn Gateway>,
        state_store: Arc<dyn StateStore>,
        token: TokenCell,
    ) -> Self {
        Self {
            session: Arc::new(SessionStore::new(state_store, gateway.clone(), token)),
            catalog: Arc::new(CatalogCache::new(gateway.clone())),
            playlists: Arc::new(PlaylistStore::new(gateway.clone())),
            player: PlaybackEngine::new(gateway.clone()),
            gateway,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    pub fn playlists(&self) -> &Arc<PlaylistStore> {
        &self.playlists
    }

    pub fn player(&self) -> &PlaybackEngine {
        &self.player
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct NullStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl StateStore for NullStore {
        async fn get(&self, key: &str) -> bridge_traits::Result<Option<String>> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> bridge_traits::Result<()> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> bridge_traits::Result<()> {
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_backed_client_end_to_end() {
        let gateway = Arc::new(MockGateway::with_sample_catalog());
        let client = StreamingClient::with_gateway(gateway, Arc::new(NullStore::default()));

        client.session().register("ada", "pw").await.unwrap();
        assert!(client.session().is_authenticated());

        let tracks = client.catalog().load().await.unwrap();
        assert_eq!(tracks.len(), 6);

        client.player().play_track(tracks[0].clone(), None).await;
        assert!(client.player().state().await.is_playing);
    }
}
