//! Random verse selection for `GET /api/quote/random`.

use actix_web::{web, HttpResponse};

use super::Quote;
use crate::error::ApiError;
use crate::response;
use crate::selection::random_offset;
use crate::services::NO_QUOTES;
use crate::state::AppState;

/// Actix web handler for `GET /api/quote/random`.
///
/// Counts the collection, draws a uniform offset and returns the verse at it.
///
/// # Returns
/// - `200 OK` with the verse under `data`.
/// - `404 Not Found` when the collection is empty.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = state.store.count().await?;
    if count == 0 {
        return Err(ApiError::NotFound(NO_QUOTES.to_string()));
    }

    let offset = random_offset(count, &mut rand::thread_rng());
    // The collection can shrink between the two queries.
    let data = state
        .store
        .find_at_offset(offset)
        .await?
        .ok_or_else(|| ApiError::NotFound(NO_QUOTES.to_string()))?;

    Ok(response::ok(Quote { data }))
}
