//! Source search for `GET /api/quotes/search`.
//!
//! The term is escaped before it reaches the store, so it always matches literally.

use actix_web::{web, HttpResponse};
use common::model::verse::VerseRecord;
use common::requests::SearchQuery;
use serde::Serialize;

use crate::error::ApiError;
use crate::response;
use crate::search::{source_term, MAX_RESULTS};
use crate::selection::clamp_limit;
use crate::state::AppState;

#[derive(Serialize)]
struct SearchResults {
    count: usize,
    data: Vec<VerseRecord>,
}

/// Actix web handler for `GET /api/quotes/search?source=&limit=`.
///
/// # Arguments
/// * `query` - The `source` term and an optional result `limit`.
/// * `state` - Shared application state holding the verse store.
///
/// # Returns
/// - `200 OK` with `{count, data}`, possibly empty.
/// - `400 Bad Request` when `source` is absent or empty.
pub async fn process(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let term = source_term(query.source.as_deref())?;
    let limit = clamp_limit(query.limit.as_deref(), MAX_RESULTS);

    let data = state.store.find_by_source_substring(term, limit).await?;
    Ok(response::ok(SearchResults {
        count: data.len(),
        data,
    }))
}
