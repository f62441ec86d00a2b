//! # Streaming Client Core
//!
//! The state-synchronization core of a music-streaming front end. It owns
//! the session/token lifecycle, the track catalog with per-user interaction
//! state, playlist management, and the timer-driven playback state machine,
//! all reconciled against a remote REST backend through the [`Gateway`]
//! trait.
//!
//! Presentation layers (routing, forms, rendering) are external
//! collaborators: they call the operations exposed here and own no playback
//! or cache state themselves.
//!
//! ## Components
//!
//! - [`SessionStore`](session::SessionStore) - authentication token and
//!   identity, persisted across restarts
//! - [`Gateway`](gateway::Gateway) - typed wrapper over the remote HTTP API,
//!   with a network implementation and an in-memory mock selected at
//!   composition time
//! - [`CatalogCache`](catalog::CatalogCache) - track id → track mapping with
//!   like/dislike toggling
//! - [`PlaylistStore`](playlists::PlaylistStore) - the user's playlists with
//!   ordered track-id lists
//! - [`PlaybackEngine`](player::PlaybackEngine) - current track, transport
//!   state, queue navigation, and the simulated-playback ticker
//! - [`StreamingClient`](service::StreamingClient) - façade wiring bridge
//!   implementations into the stores

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod player;
pub mod playlists;
pub mod service;
pub mod session;
pub mod types;

pub use catalog::CatalogCache;
pub use error::{AuthError, ClientError, Result};
pub use gateway::{Gateway, HttpGateway, MockGateway, SearchField, SearchQuery};
pub use player::{PlaybackEngine, PlaybackState};
pub use playlists::PlaylistStore;
pub use service::{ClientConfig, ClientDependencies, StreamingClient};
pub use session::{SessionStore, TokenCell, SESSION_STORAGE_KEY};
pub use types::{
    InteractionKind, InteractionState, Playlist, PlaylistId, Session, Track, TrackId,
};
