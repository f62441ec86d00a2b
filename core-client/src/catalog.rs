//! Catalog Cache
//!
//! Client-side cache of the track catalog. Loading replaces the cache
//! wholesale; interaction toggles go to the backend first and only mutate
//! the cached state once the remote call succeeds, so the cache never
//! shows a state the server has not acknowledged.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::gateway::Gateway;
use crate::types::{InteractionKind, InteractionState, Track, TrackId};

pub struct CatalogCache {
    gateway: Arc<dyn Gateway>,
    // Also serializes interaction toggles: the lock is held across the
    // remote call so concurrent toggles on one track cannot interleave.
    tracks: Mutex<Vec<Track>>,
}

impl CatalogCache {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            tracks: Mutex::new(Vec::new()),
        }
    }

    /// Fetch the catalog and replace the cached copy.
    pub async fn load(&self) -> Result<Vec<Track>> {
        let fetched = self.gateway.list_tracks().await?;
        debug!(count = fetched.len(), "Loaded track catalog");
        let mut tracks = self.tracks.lock().await;
        *tracks = fetched.clone();
        Ok(fetched)
    }

    /// Snapshot of the cached catalog, in backend order.
    pub async fn tracks(&self) -> Vec<Track> {
        self.tracks.lock().await.clone()
    }

    /// Cached track by id, if present.
    pub async fn get(&self, id: &TrackId) -> Option<Track> {
        self.tracks.lock().await.iter().find(|t| &t.id == id).cloned()
    }

    /// Flip the liked state of a track.
    ///
    /// Liking a disliked track clears the dislike; the two states are
    /// mutually exclusive. Returns the state now in effect.
    pub async fn toggle_like(&self, id: &TrackId) -> Result<InteractionState> {
        self.mutate(id, |state| {
            if state.is_liked() {
                InteractionKind::Unlike
            } else {
                InteractionKind::Like
            }
        })
        .await
    }

    /// Flip the disliked state of a track. Mirror of [`toggle_like`](Self::toggle_like).
    pub async fn toggle_dislike(&self, id: &TrackId) -> Result<InteractionState> {
        self.mutate(id, |state| {
            if state.is_disliked() {
                InteractionKind::Undislike
            } else {
                InteractionKind::Dislike
            }
        })
        .await
    }

    /// Send an interaction for a cached track and apply its effect on the
    /// cached state. The toggles above are built on this.
    pub async fn set_interaction(
        &self,
        id: &TrackId,
        kind: InteractionKind,
    ) -> Result<InteractionState> {
        self.mutate(id, |_| kind).await
    }

    async fn mutate(
        &self,
        id: &TrackId,
        pick: impl FnOnce(InteractionState) -> InteractionKind,
    ) -> Result<InteractionState> {
        let mut tracks = self.tracks.lock().await;
        let entry = tracks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| ClientError::Validation(format!("unknown track id: {}", id)))?;

        let kind = pick(entry.state);
        self.gateway.send_interaction(id, kind).await?;
        entry.state = next_state(entry.state, kind);
        debug!(track = %id, interaction = %kind, "Applied interaction");
        Ok(entry.state)
    }
}

/// Cached-state effect of an interaction; non-state kinds leave it alone.
fn next_state(current: InteractionState, kind: InteractionKind) -> InteractionState {
    match kind {
        InteractionKind::Like => InteractionState::Liked,
        InteractionKind::Dislike => InteractionState::Disliked,
        InteractionKind::Unlike | InteractionKind::Undislike => InteractionState::None,
        _ => current,
    }
}
