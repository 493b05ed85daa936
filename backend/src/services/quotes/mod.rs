//! Collection endpoints under `/api/quotes`.
//!
//! - `GET ""` (`list::process`): paginated listing, `page` and `limit` clamped.
//! - `GET /search` (`search::process`): case-insensitive literal match on `source`,
//!   at most 50 results. An empty result is still `200`.

mod list;
mod search;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/quotes";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/search", get().to(search::process))
}
