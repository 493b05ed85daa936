//! HTTP endpoints, one module per area.
//!
//! - `health`: liveness and store connectivity (`GET /health`).
//! - `index`: capability listing (`GET /api`).
//! - `quote`: single-verse endpoints under `/api/quote`.
//! - `quotes`: listing and search under `/api/quotes`.
//! - `legacy`: redirects from the pre-`/api` paths.
//! - `not_found`: fallback for unmatched routes.

pub mod health;
pub mod index;
pub mod legacy;
pub mod not_found;
pub mod quote;
pub mod quotes;

/// Message used whenever the collection is empty.
pub(crate) const NO_QUOTES: &str = "No quotes found in database";
