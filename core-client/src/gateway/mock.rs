//! In-memory gateway implementation.
//!
//! Simulates the remote service entirely in memory: a seeded demo catalog,
//! uuid-issued ids and tokens, duplicate-suppressing playlist membership,
//! and a recorded interaction log. Used by tests and by hosts that want a
//! working client without a backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AuthError, ClientError, Result};
use crate::gateway::{Gateway, SearchField, SearchQuery};
use crate::types::{
    InteractionKind, InteractionState, Playlist, PlaylistId, Session, Track, TrackId,
};

#[derive(Default)]
struct MockState {
    /// username → password
    users: HashMap<String, String>,
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
    interactions: Vec<(TrackId, InteractionKind)>,
}

/// In-memory implementation of [`Gateway`].
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
    fail_interactions: AtomicBool,
}

fn sample_track(id: &str, title: &str, artist: &str, album: &str, duration: u32) -> Track {
    Track {
        id: TrackId::from(id),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        cover_url: format!("https://picsum.photos/seed/{}/200/200", id),
        duration_seconds: duration,
        popularity: None,
        explicit: None,
        genre: None,
        state: InteractionState::None,
    }
}

impl MockGateway {
    /// An empty backend: no users, no tracks, no playlists.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend seeded with the demo catalog.
    pub fn with_sample_catalog() -> Self {
        Self::with_tracks(vec![
            sample_track("s1", "Neon Nights", "Aurora Sky", "Midnight Drive", 210),
            sample_track("s2", "Ocean Eyes", "Blue Harbor", "Shoreline", 185),
            sample_track("s3", "Sunrise Echo", "Holo Tone", "Dawn", 240),
            sample_track("s4", "City Lights", "Nightwalker", "Uptown", 200),
            sample_track("s5", "Moonlight Dance", "Luna Rose", "Stellar", 195),
            sample_track("s6", "Electric Dreams", "Synth Wave", "Retro Future", 220),
        ])
    }

    /// A backend seeded with the given catalog.
    pub fn with_tracks(tracks: Vec<Track>) -> Self {
        Self {
            state: Mutex::new(MockState {
                tracks,
                ..MockState::default()
            }),
            fail_interactions: AtomicBool::new(false),
        }
    }

    /// Make every interaction call fail with a server error. Lets tests
    /// exercise the swallowed-telemetry paths.
    pub fn set_fail_interactions(&self, fail: bool) {
        self.fail_interactions.store(fail, Ordering::SeqCst);
    }

    /// The interactions received so far, in call order.
    pub async fn interactions(&self) -> Vec<(TrackId, InteractionKind)> {
        self.state.lock().await.interactions.clone()
    }

    /// Kinds of interactions received for one track, in call order.
    pub async fn interactions_for(&self, track: &TrackId) -> Vec<InteractionKind> {
        self.state
            .lock()
            .await
            .interactions
            .iter()
            .filter(|(id, _)| id == track)
            .map(|(_, kind)| *kind)
            .collect()
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Remote {
        status: 404,
        message: format!("{} not found", what),
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn register(&self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Rejected("username and password are required".to_string()).into());
        }

        let mut state = self.state.lock().await;
        if state.users.contains_key(username) {
            return Err(AuthError::DuplicateUsername.into());
        }
        state
            .users
            .insert(username.to_string(), password.to_string());
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let state = self.state.lock().await;
        match state.users.get(username) {
            Some(stored) if stored == password => Ok(Session {
                token: Uuid::new_v4().to_string(),
                username: username.to_string(),
            }),
            _ => Err(AuthError::InvalidCredentials.into()),
        }
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.state.lock().await.tracks.clone())
    }

    async fn get_track(&self, id: &TrackId) -> Result<Track> {
        self.state
            .lock()
            .await
            .tracks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| not_found("track"))
    }

    async fn search_tracks(&self, query: &SearchQuery) -> Result<Vec<Track>> {
        let needle = query.query.to_lowercase();
        let state = self.state.lock().await;
        Ok(state
            .tracks
            .iter()
            .filter(|t| {
                let haystack = match query.field {
                    SearchField::TrackName => &t.title,
                    SearchField::Artist => &t.artist,
                    SearchField::Album => &t.album,
                    SearchField::Genre => t.genre.as_deref().unwrap_or(""),
                };
                haystack.to_lowercase().contains(&needle)
            })
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.state.lock().await.playlists.clone())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist> {
        let playlist = Playlist {
            id: PlaylistId::new(Uuid::new_v4().to_string()),
            name: name.to_string(),
            description: description.to_string(),
            track_ids: Vec::new(),
        };
        self.state.lock().await.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        let mut state = self.state.lock().await;
        let before = state.playlists.len();
        state.playlists.retain(|p| &p.id != id);
        if state.playlists.len() == before {
            return Err(not_found("playlist"));
        }
        Ok(())
    }

    async fn add_playlist_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.tracks.iter().any(|t| &t.id == track) {
            return Err(not_found("track"));
        }
        let entry = state
            .playlists
            .iter_mut()
            .find(|p| &p.id == playlist)
            .ok_or_else(|| not_found("playlist"))?;
        // Duplicate adds are a no-op, as on the real backend.
        if !entry.track_ids.contains(track) {
            entry.track_ids.push(track.clone());
        }
        Ok(())
    }

    async fn remove_playlist_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<()> {
        let mut state = self.state.lock().await;
        let entry = state
            .playlists
            .iter_mut()
            .find(|p| &p.id == playlist)
            .ok_or_else(|| not_found("playlist"))?;
        entry.track_ids.retain(|id| id != track);
        Ok(())
    }

    async fn playlist_tracks(&self, id: &PlaylistId) -> Result<Vec<Track>> {
        let state = self.state.lock().await;
        let playlist = state
            .playlists
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| not_found("playlist"))?;
        Ok(playlist
            .track_ids
            .iter()
            .filter_map(|tid| state.tracks.iter().find(|t| &t.id == tid))
            .cloned()
            .collect())
    }

    async fn send_interaction(&self, track: &TrackId, kind: InteractionKind) -> Result<()> {
        if self.fail_interactions.load(Ordering::SeqCst) {
            return Err(ClientError::Remote {
                status: 500,
                message: "interaction endpoint unavailable".to_string(),
            });
        }

        let mut state = self.state.lock().await;
        // Mirror the backend's server-side state transitions so a reload
        // reflects what was sent.
        if let Some(entry) = state.tracks.iter_mut().find(|t| &t.id == track) {
            match kind {
                InteractionKind::Like => entry.state = InteractionState::Liked,
                InteractionKind::Dislike => entry.state = InteractionState::Disliked,
                InteractionKind::Unlike | InteractionKind::Undislike => {
                    entry.state = InteractionState::None
                }
                _ => {}
            }
        }
        state.interactions.push((track.clone(), kind));
        Ok(())
    }
}
