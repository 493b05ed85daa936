//! # Quote Retrieval by Identifier
//!
//! Serves `GET /api/quote/{id}`. The identifier is checked for UUID syntax before the
//! store is queried, so a malformed id never reaches SQLite.

use actix_web::{web, HttpResponse};

use super::Quote;
use crate::error::ApiError;
use crate::response;
use crate::state::AppState;

/// Actix web handler for `GET /api/quote/{id}`.
///
/// # Arguments
/// * `id` - The verse identifier, extracted from the URL path.
/// * `state` - Shared application state holding the verse store.
///
/// # Returns
/// - `200 OK` with the verse under `data`.
/// - `400 Bad Request` when `id` is not a UUID.
/// - `404 Not Found` when no verse has this id.
pub async fn process(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    match state.store.find_by_id(&id).await? {
        Some(data) => Ok(response::ok(Quote { data })),
        None => Err(ApiError::NotFound("Quote not found".to_string())),
    }
}
