//! Workspace placeholder crate.
//!
//! Host applications can depend on `streamfront-workspace` to pull in the
//! client core without wiring each member crate individually. The domain API
//! lives in `core-client`; platform bridges live in `bridge-traits` and
//! `bridge-desktop`.

pub use core_client;
