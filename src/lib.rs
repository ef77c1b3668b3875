//! # Roster
//!
//! An admin API for esports teams and players, usable both as a standalone
//! binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! roster = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use roster::server::{AppState, create_router};
//! use roster::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/roster.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `roster` binary. Disable with `default-features = false`.

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
