//! Read-only HTTP API serving Sanskrit slokas from a SQLite store.
//!
//! The `sloka-api` binary serves the API; `sloka-seed` loads a JSON dataset into
//! the store.

pub mod app;
pub mod config;
pub mod error;
pub mod loader;
pub mod middleware;
pub mod response;
pub mod search;
pub mod selection;
pub mod services;
pub mod state;
pub mod store;
