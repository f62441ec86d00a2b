//! Network-backed gateway implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};

use crate::error::{AuthError, ClientError, Result};
use crate::gateway::{Gateway, SearchQuery};
use crate::session::TokenCell;
use crate::types::{
    InteractionKind, InteractionState, Playlist, PlaylistId, Session, Track, TrackId,
};

/// Cover asset used when the backend record carries none.
const DEFAULT_COVER: &str = "/image.jpeg";

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the remote service, without a trailing slash.
    pub base_url: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

/// HTTP implementation of [`Gateway`].
///
/// Attaches the bearer token from the shared [`TokenCell`] to every request
/// when one is present, extracts error messages from failure bodies, and
/// normalizes backend track records into the internal [`Track`] shape.
pub struct HttpGateway {
    http: Arc<dyn HttpClient>,
    config: GatewayConfig,
    token: TokenCell,
}

impl HttpGateway {
    pub fn new(http: Arc<dyn HttpClient>, config: GatewayConfig, token: TokenCell) -> Self {
        Self {
            http,
            config,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Execute a request and apply the shared response policy:
    /// 2xx JSON → `Some(value)`, 2xx empty/non-JSON → `None`,
    /// non-2xx → `ClientError::Remote`.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let mut request = HttpRequest::new(method, self.url(path));

        if let Some(token) = self.token.get() {
            request = request.bearer_token(token);
        }
        if let Some(body) = body {
            request = request.json(body)?;
        }

        debug!(method = ?method, path = path, "Remote call");

        let response = self.http.execute(request).await?;

        if !response.is_success() {
            let message = extract_error_message(response.status, &response.body);
            return Err(ClientError::Remote {
                status: response.status,
                message,
            });
        }

        if response.body.is_empty() {
            return Ok(None);
        }

        let is_json = response
            .content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            // Successful but non-JSON bodies are an empty success marker.
            return Ok(None);
        }

        let value = serde_json::from_slice(&response.body)
            .map_err(|e| ClientError::Decode(format!("invalid JSON body: {}", e)))?;
        Ok(Some(value))
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
        serde_json::from_value(value)
            .map_err(|e| ClientError::Decode(format!("unexpected {} payload: {}", what, e)))
    }
}

/// Extract a human-readable message from a failure body: the JSON
/// `message`/`error` field if present, else the raw body, else
/// `"HTTP <status>"`.
fn extract_error_message(status: u16, body: &[u8]) -> String {
    let fallback = format!("HTTP {}", status);

    let text = match std::str::from_utf8(body) {
        Ok(text) if !text.trim().is_empty() => text.trim(),
        _ => return fallback,
    };

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    text.to_string()
}

/// Track record as the backend serializes it.
#[derive(Debug, Deserialize)]
struct RawTrack {
    track_id: String,
    #[serde(default)]
    track_name: String,
    #[serde(default)]
    artists: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    cover_url: Option<String>,
    #[serde(default)]
    duration_ms: u64,
    #[serde(default)]
    popularity: Option<u32>,
    #[serde(default)]
    explicit: Option<bool>,
    #[serde(default)]
    track_genre: Option<String>,
    #[serde(default)]
    interaction_state: Option<String>,
}

impl RawTrack {
    /// Normalize into the internal track shape.
    fn into_track(self) -> Track {
        Track {
            id: TrackId::new(self.track_id),
            title: self.track_name,
            artist: self.artists,
            album: self.album_name,
            cover_url: self
                .cover_url
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COVER.to_string()),
            duration_seconds: (self.duration_ms / 1000) as u32,
            popularity: self.popularity,
            explicit: self.explicit,
            genre: self.track_genre,
            state: self
                .interaction_state
                .as_deref()
                .map(InteractionState::parse)
                .unwrap_or_default(),
        }
    }
}

/// Track lists arrive bare or wrapped depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTrackList {
    Wrapped { tracks: Vec<RawTrack> },
    Results { results: Vec<RawTrack> },
    Bare(Vec<RawTrack>),
}

impl RawTrackList {
    fn into_tracks(self) -> Vec<Track> {
        let raw = match self {
            RawTrackList::Wrapped { tracks } => tracks,
            RawTrackList::Results { results } => results,
            RawTrackList::Bare(tracks) => tracks,
        };
        raw.into_iter().map(RawTrack::into_track).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTrackEnvelope {
    Wrapped { track: RawTrack },
    Bare(RawTrack),
}

impl RawTrackEnvelope {
    fn into_track(self) -> Track {
        match self {
            RawTrackEnvelope::Wrapped { track } => track.into_track(),
            RawTrackEnvelope::Bare(track) => track.into_track(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    #[serde(alias = "playlist_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

impl RawPlaylist {
    fn into_playlist(self) -> Playlist {
        Playlist {
            id: PlaylistId::new(self.id),
            name: self.name,
            description: self.description,
            track_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPlaylistList {
    Wrapped { playlists: Vec<RawPlaylist> },
    Bare(Vec<RawPlaylist>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPlaylistEnvelope {
    Wrapped { playlist: RawPlaylist },
    Bare(RawPlaylist),
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    field: &'a str,
    limit: u32,
    offset: u32,
}

#[derive(Debug, Serialize)]
struct InteractionBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn register(&self, username: &str, password: &str) -> Result<()> {
        let body = serde_json::to_value(CredentialsBody { username, password })
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        match self.request(HttpMethod::Post, "/register", Some(&body)).await {
            Ok(_) => Ok(()),
            Err(ClientError::Remote { status, message }) if (400..500).contains(&status) => {
                if status == 409 || message.to_lowercase().contains("exist") {
                    Err(AuthError::DuplicateUsername.into())
                } else {
                    Err(AuthError::Rejected(message).into())
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let body = serde_json::to_value(CredentialsBody { username, password })
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let value = match self.request(HttpMethod::Post, "/login", Some(&body)).await {
            Ok(Some(value)) => value,
            Ok(None) => return Err(ClientError::Decode("login returned no body".to_string())),
            Err(ClientError::Remote { status, .. }) if (400..500).contains(&status) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let response: LoginResponse = Self::decode(value, "login")?;
        Ok(Session {
            token: response.token,
            username: username.to_string(),
        })
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        let tracks = match self.request(HttpMethod::Get, "/tracks", None).await? {
            Some(value) => Self::decode::<RawTrackList>(value, "track list")?.into_tracks(),
            None => Vec::new(),
        };

        // Collapse duplicate ids, first occurrence wins.
        let mut seen = HashSet::new();
        Ok(tracks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect())
    }

    async fn get_track(&self, id: &TrackId) -> Result<Track> {
        let path = format!("/tracks/{}", id);
        let value = self
            .request(HttpMethod::Get, &path, None)
            .await?
            .ok_or_else(|| ClientError::Decode("track endpoint returned no body".to_string()))?;
        Ok(Self::decode::<RawTrackEnvelope>(value, "track")?.into_track())
    }

    async fn search_tracks(&self, query: &SearchQuery) -> Result<Vec<Track>> {
        let params = serde_urlencoded::to_string(SearchParams {
            q: &query.query,
            field: query.field.as_str(),
            limit: query.limit,
            offset: query.offset,
        })
        .map_err(|e| ClientError::Decode(e.to_string()))?;
        let path = format!("/tracks/search?{}", params);

        match self.request(HttpMethod::Get, &path, None).await? {
            Some(value) => Ok(Self::decode::<RawTrackList>(value, "search results")?.into_tracks()),
            None => Ok(Vec::new()),
        }
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let raw = match self.request(HttpMethod::Get, "/playlists", None).await? {
            Some(value) => match Self::decode::<RawPlaylistList>(value, "playlist list")? {
                RawPlaylistList::Wrapped { playlists } => playlists,
                RawPlaylistList::Bare(playlists) => playlists,
            },
            None => Vec::new(),
        };
        Ok(raw.into_iter().map(RawPlaylist::into_playlist).collect())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<Playlist> {
        let body = serde_json::json!({ "name": name, "description": description });
        let value = self
            .request(HttpMethod::Post, "/playlists", Some(&body))
            .await?
            .ok_or_else(|| ClientError::Decode("create playlist returned no body".to_string()))?;

        let playlist = match Self::decode::<RawPlaylistEnvelope>(value, "playlist")? {
            RawPlaylistEnvelope::Wrapped { playlist } => playlist,
            RawPlaylistEnvelope::Bare(playlist) => playlist,
        };
        Ok(playlist.into_playlist())
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<()> {
        let path = format!("/playlists/{}", id);
        self.request(HttpMethod::Delete, &path, None).await?;
        Ok(())
    }

    async fn add_playlist_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<()> {
        let path = format!("/playlists/{}/tracks/{}", playlist, track);
        self.request(HttpMethod::Post, &path, None).await?;
        Ok(())
    }

    async fn remove_playlist_track(&self, playlist: &PlaylistId, track: &TrackId) -> Result<()> {
        let path = format!("/playlists/{}/tracks/{}", playlist, track);
        self.request(HttpMethod::Delete, &path, None).await?;
        Ok(())
    }

    async fn playlist_tracks(&self, id: &PlaylistId) -> Result<Vec<Track>> {
        let path = format!("/playlists/{}/tracks", id);
        match self.request(HttpMethod::Get, &path, None).await? {
            Some(value) => {
                Ok(Self::decode::<RawTrackList>(value, "playlist tracks")?.into_tracks())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn send_interaction(&self, track: &TrackId, kind: InteractionKind) -> Result<()> {
        let path = format!("/tracks/{}/interact", track);
        let body = serde_json::to_value(InteractionBody {
            kind: kind.as_str(),
        })
        .map_err(|e| ClientError::Decode(e.to_string()))?;

        self.request(HttpMethod::Post, &path, Some(&body)).await?;
        Ok(())
    }
}
