//! Remote Gateway
//!
//! Typed request/response wrapper around the external streaming service.
//! [`Gateway`] is the seam between the stores and the backend: the network
//! implementation ([`HttpGateway`]) and the in-memory implementation
//! ([`MockGateway`]) are selected at composition time, never by branching
//! inside the core.

mod http;
mod mock;

pub use http::{GatewayConfig, HttpGateway};
pub use mock::MockGateway;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InteractionKind, Playlist, PlaylistId, Session, Track, TrackId};

/// Field the track search endpoint matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    TrackName,
    Artist,
    Album,
    Genre,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::TrackName => "track_name",
            SearchField::Artist => "artists",
            SearchField::Album => "album_name",
            SearchField::Genre => "track_genre",
        }
    }
}

/// Parameters for `GET /tracks/search`.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub field: SearchField,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            field: SearchField::default(),
            limit: 10,
            offset: 0,
        }
    }

    pub fn field(mut self, field: SearchField) -> Self {
        self.field = field;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// One operation per remote resource.
///
/// Every protected call attaches the current bearer token when a session
/// exists. Implementations normalize backend track records into [`Track`]
/// and translate non-2xx responses into typed failures; see
/// [`ClientError`](crate::error::ClientError).
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `POST /register`. Creates the account; does not establish a session.
    async fn register(&self, username: &str, password: &str) -> Result<()>;

    /// `POST /login`. Returns the authenticated session on success.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;

    /// `GET /tracks`. Tracks sharing an id are collapsed to one entry,
    /// first occurrence wins.
    async fn list_tracks(&self) -> Result<Vec<Track>>;

    /// `GET /tracks/:id`.
    async fn get_track(&self, id: &TrackId) -> Result<Track>;

    /// `GET /tracks/search?q&field&limit&offset`.
    async fn search_tracks(&self, query: &SearchQuery) -> Result<Vec<Track>>;

    /// `GET /playlists`. The caller's playlists; membership lists are
    /// fetched separately via [`playlist_tracks`](Self::playlist_tracks).
    async fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// `POST /playlists`.
    async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist>;

    /// `DELETE /playlists/:id`.
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()>;

    /// `POST /playlists/:id/tracks/:trackId`. Adding an already-present
    /// track is a remote no-op.
    async fn add_playlist_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<()>;

    /// `DELETE /playlists/:id/tracks/:trackId`.
    async fn remove_playlist_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<()>;

    /// `GET /playlists/:id/tracks`.
    async fn playlist_tracks(&self, id: &PlaylistId) -> Result<Vec<Track>>;

    /// `POST /tracks/:id/interact` with body `{"type": <kind>}`.
    async fn send_interaction(&self, track: &TrackId, kind: InteractionKind) -> Result<()>;
}
