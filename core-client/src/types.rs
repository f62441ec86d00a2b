use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a track, as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier of a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-user interaction state of a track.
///
/// At most one of liked/disliked holds at a time; setting one clears the
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    #[default]
    None,
    Liked,
    Disliked,
}

impl InteractionState {
    /// Parse the backend's `interaction_state` field. Anything unrecognized
    /// maps to `None`.
    pub fn parse(s: &str) -> Self {
        match s {
            "liked" => InteractionState::Liked,
            "disliked" => InteractionState::Disliked,
            _ => InteractionState::None,
        }
    }

    pub fn is_liked(&self) -> bool {
        matches!(self, InteractionState::Liked)
    }

    pub fn is_disliked(&self) -> bool {
        matches!(self, InteractionState::Disliked)
    }
}

/// A typed event reported to the backend for analytics/recommendation
/// purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Unlike,
    Dislike,
    Undislike,
    Skip,
    Play,
    Pause,
    Resume,
    Seek,
    AddToPlaylist,
    RemoveFromPlaylist,
    Completed,
    Repeat,
    Previous,
}

impl InteractionKind {
    /// Wire identifier sent in the `{type}` body of the interact endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::Unlike => "unlike",
            InteractionKind::Dislike => "dislike",
            InteractionKind::Undislike => "undislike",
            InteractionKind::Skip => "skip",
            InteractionKind::Play => "play",
            InteractionKind::Pause => "pause",
            InteractionKind::Resume => "resume",
            InteractionKind::Seek => "seek",
            InteractionKind::AddToPlaylist => "add_to_playlist",
            InteractionKind::RemoveFromPlaylist => "remove_from_playlist",
            InteractionKind::Completed => "completed",
            InteractionKind::Repeat => "repeat",
            InteractionKind::Previous => "previous",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A playable track record with metadata and per-user interaction state.
///
/// Identity is the id. Tracks are never deleted client-side; only the
/// interaction state mutates, through the catalog cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover_url: String,
    pub duration_seconds: u32,
    pub popularity: Option<u32>,
    pub explicit: Option<bool>,
    pub genre: Option<String>,
    pub state: InteractionState,
}

/// A user-owned playlist with an ordered, duplicate-free track-id list.
///
/// Ownership is implicit via the authenticated session; the backend only
/// returns the caller's playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub track_ids: Vec<TrackId>,
}

/// The authenticated identity and bearer token used for all protected calls.
///
/// Persisted across restarts under a stable storage key; its absence means
/// the unauthenticated state.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_state_parse() {
        assert_eq!(InteractionState::parse("liked"), InteractionState::Liked);
        assert_eq!(
            InteractionState::parse("disliked"),
            InteractionState::Disliked
        );
        assert_eq!(InteractionState::parse("none"), InteractionState::None);
        assert_eq!(InteractionState::parse("garbage"), InteractionState::None);
    }

    #[test]
    fn test_interaction_state_exclusivity_helpers() {
        assert!(InteractionState::Liked.is_liked());
        assert!(!InteractionState::Liked.is_disliked());
        assert!(InteractionState::Disliked.is_disliked());
        assert!(!InteractionState::None.is_liked());
    }

    #[test]
    fn test_interaction_kind_wire_names() {
        assert_eq!(InteractionKind::AddToPlaylist.as_str(), "add_to_playlist");
        assert_eq!(InteractionKind::Undislike.as_str(), "undislike");
        assert_eq!(
            serde_json::to_string(&InteractionKind::RemoveFromPlaylist).unwrap(),
            "\"remove_from_playlist\""
        );
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session {
            token: "secret_bearer_token".to_string(),
            username: "ada".to_string(),
        };
        let debug = format!("{:?}", session);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret_bearer_token"));
        assert!(debug.contains("ada"));
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let session = Session {
            token: "t".to_string(),
            username: "ada".to_string(),
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }

    #[test]
    fn test_track_id_display() {
        let id = TrackId::from("s1");
        assert_eq!(id.to_string(), "s1");
        assert_eq!(id.as_str(), "s1");
    }
}
