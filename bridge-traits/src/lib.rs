//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host
//! environment embedding the streaming client core.
//!
//! ## Overview
//!
//! This crate defines the contract between the client core and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is provided differently per host (desktop app,
//! embedded shell, test harness).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - async HTTP request execution against
//!   the remote streaming service
//! - [`StateStore`](storage::StateStore) - persisted string key-value client
//!   state (the session blob survives process restarts through it)
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations should convert platform-specific errors into it and keep
//! messages actionable.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so implementations can be
//! shared across async tasks behind `Arc<dyn _>` handles.

pub mod error;
pub mod http;
pub mod storage;

pub use error::{BridgeError, Result};

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::StateStore;
