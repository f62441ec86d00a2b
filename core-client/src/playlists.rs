//! Playlist Store
//!
//! Client-side view of the user's playlists. Every mutation goes to the
//! backend first; the local copy is only updated once the remote call
//! succeeds. Membership changes additionally report an interaction event,
//! which is best-effort and never fails the mutation itself.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::gateway::Gateway;
use crate::types::{InteractionKind, Playlist, PlaylistId, Track, TrackId};

pub struct PlaylistStore {
    gateway: Arc<dyn Gateway>,
    playlists: Mutex<Vec<Playlist>>,
}

impl PlaylistStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            playlists: Mutex::new(Vec::new()),
        }
    }

    /// Fetch the user's playlists and replace the cached copy.
    pub async fn load(&self) -> Result<Vec<Playlist>> {
        let fetched = self.gateway.list_playlists().await?;
        debug!(count = fetched.len(), "Loaded playlists");
        let mut playlists = self.playlists.lock().await;
        *playlists = fetched.clone();
        Ok(fetched)
    }

    /// Snapshot of the cached playlists, newest first.
    pub async fn playlists(&self) -> Vec<Playlist> {
        self.playlists.lock().await.clone()
    }

    /// Cached playlist by id, if present.
    pub async fn get(&self, id: &PlaylistId) -> Option<Playlist> {
        self.playlists
            .lock()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    /// Create a playlist and place it at the front of the cached list.
    pub async fn create(&self, name: &str, description: &str) -> Result<Playlist> {
        if name.trim().is_empty() {
            return Err(ClientError::Validation(
                "playlist name must not be empty".to_string(),
            ));
        }
        let playlist = self.gateway.create_playlist(name.trim(), description).await?;
        debug!(playlist = %playlist.id, name = %playlist.name, "Created playlist");
        self.playlists.lock().await.insert(0, playlist.clone());
        Ok(playlist)
    }

    /// Delete a playlist remotely, then drop it from the cache.
    pub async fn delete(&self, id: &PlaylistId) -> Result<()> {
        self.gateway.delete_playlist(id).await?;
        self.playlists.lock().await.retain(|p| &p.id != id);
        debug!(playlist = %id, "Deleted playlist");
        Ok(())
    }

    /// Add a track to a playlist and return the playlist's refreshed
    /// track list.
    pub async fn add_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<Vec<Track>> {
        self.gateway.add_playlist_track(playlist, track).await?;
        self.emit(track, InteractionKind::AddToPlaylist).await;
        self.refresh_membership(playlist).await
    }

    /// Remove a track from a playlist and return the playlist's refreshed
    /// track list.
    pub async fn remove_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<Vec<Track>> {
        self.gateway.remove_playlist_track(playlist, track).await?;
        self.emit(track, InteractionKind::RemoveFromPlaylist).await;
        self.refresh_membership(playlist).await
    }

    /// The tracks of a playlist, fetched from the backend. Refreshes the
    /// cached membership list as a side effect.
    pub async fn tracks_of(&self, id: &PlaylistId) -> Result<Vec<Track>> {
        self.refresh_membership(id).await
    }

    /// Interaction reporting is telemetry; a failure here never undoes the
    /// membership change that already happened.
    async fn emit(&self, track: &TrackId, kind: InteractionKind) {
        if let Err(e) = self.gateway.send_interaction(track, kind).await {
            warn!(track = %track, interaction = %kind, "Failed to report interaction: {}", e);
        }
    }

    async fn refresh_membership(&self, id: &PlaylistId) -> Result<Vec<Track>> {
        let tracks = self.gateway.playlist_tracks(id).await?;
        let mut playlists = self.playlists.lock().await;
        if let Some(entry) = playlists.iter_mut().find(|p| &p.id == id) {
            entry.track_ids = tracks.iter().map(|t| t.id.clone()).collect();
        }
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;

    fn store() -> (Arc<MockGateway>, PlaylistStore) {
        let gateway = Arc::new(MockGateway::with_sample_catalog());
        let store = PlaylistStore::new(gateway.clone());
        (gateway, store)
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let (_, store) = store();
        let first = store.create("First", "").await.unwrap();
        let second = store.create("Second", "").await.unwrap();

        let playlists = store.playlists().await;
        assert_eq!(playlists[0].id, second.id);
        assert_eq!(playlists[1].id, first.id);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (_, store) = store();
        let err = store.create("   ", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(store.playlists().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_remove_track_updates_membership() {
        let (gateway, store) = store();
        let playlist = store.create("Drive", "").await.unwrap();
        let track = TrackId::from("s1");

        let tracks = store.add_track(&playlist.id, &track).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(
            store.get(&playlist.id).await.unwrap().track_ids,
            vec![track.clone()]
        );
        assert_eq!(
            gateway.interactions_for(&track).await,
            vec![InteractionKind::AddToPlaylist]
        );

        let tracks = store.remove_track(&playlist.id, &track).await.unwrap();
        assert!(tracks.is_empty());
        assert!(store.get(&playlist.id).await.unwrap().track_ids.is_empty());
    }

    #[tokio::test]
    async fn test_add_track_survives_interaction_failure() {
        let (gateway, store) = store();
        let playlist = store.create("Drive", "").await.unwrap();
        let track = TrackId::from("s2");

        // Only interactions fail; the membership endpoints still work.
        gateway.set_fail_interactions(true);
        let tracks = store.add_track(&playlist.id, &track).await.unwrap();
        assert_eq!(tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_locally_after_remote() {
        let (_, store) = store();
        let playlist = store.create("Temp", "").await.unwrap();

        store.delete(&playlist.id).await.unwrap();
        assert!(store.playlists().await.is_empty());
        assert!(store.tracks_of(&playlist.id).await.is_err());
    }

    #[tokio::test]
    async fn test_load_replaces_cache() {
        let gateway = Arc::new(MockGateway::with_sample_catalog());
        gateway.create_playlist("Remote", "").await.unwrap();

        let store = PlaylistStore::new(gateway);
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Remote");
    }
}
