//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `StateStore` as a JSON file (`JsonFileStateStore`) or plain memory
//!   (`MemoryStateStore`, for tests and ephemeral sessions)
//! - `logging` module with the tracing-subscriber bootstrap for composition
//!   roots
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, JsonFileStateStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!     let state = JsonFileStateStore::load("state.json".into()).await;
//!     // Hand both to the client core at composition time
//! }
//! ```

mod http;
pub mod logging;
mod storage;

pub use http::ReqwestHttpClient;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use storage::{JsonFileStateStore, MemoryStateStore};
