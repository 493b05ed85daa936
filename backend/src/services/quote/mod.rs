//! # Single Quote Endpoints
//!
//! Each endpoint answers with one verse inside the success envelope, under `data`.
//!
//! ## Registered Routes (under `/api/quote`):
//!
//! *   **`GET /random`** (`random::process`): a uniformly random verse.
//!     `404` when the collection is empty.
//! *   **`GET /daily`** (`daily::process`): the verse at `dayOfYear % count`, where
//!     `dayOfYear` is the server's local ordinal date. The response also carries
//!     `dayOfYear`. `404` when the collection is empty.
//! *   **`GET /{id}`** (`get::process`): one verse by identifier. `400` for an
//!     identifier that is not a UUID, `404` when no verse has it.

mod daily;
mod get;
mod random;

use actix_web::web::{get as get_route, scope};
use actix_web::Scope;
use common::model::verse::VerseRecord;
use serde::Serialize;

const API_PATH: &str = "/quote";

#[derive(Serialize)]
struct Quote {
    data: VerseRecord,
}

/// Routes for `/api/quote`; the caller nests the scope under `/api`.
pub fn configure_routes() -> Scope {
    // Literal segments must be registered before the `{id}` catch-all.
    scope(API_PATH)
        .route("/random", get_route().to(random::process))
        .route("/daily", get_route().to(daily::process))
        .route("/{id}", get_route().to(get::process))
}
