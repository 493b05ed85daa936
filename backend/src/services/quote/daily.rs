//! # Quote of the Day
//!
//! Serves the `GET /api/quote/daily` endpoint. The verse is picked from the server's
//! local ordinal date, so every request on the same day gets the same verse as long as
//! the collection size does not change.
//!
//! ## Workflow
//!
//! 1.  **Count**: the collection size is read first; an empty store answers `404`.
//! 2.  **Offset**: `dayOfYear % count` picks the position in insertion order.
//! 3.  **Fetch**: the verse at that offset is returned together with `dayOfYear`.

use actix_web::{web, HttpResponse};
use chrono::Local;
use common::model::verse::VerseRecord;
use serde::Serialize;

use crate::error::ApiError;
use crate::response;
use crate::selection::{daily_offset, day_of_year};
use crate::services::NO_QUOTES;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyQuote {
    data: VerseRecord,
    day_of_year: u32,
}

/// Actix web handler for `GET /api/quote/daily`.
///
/// # Arguments
/// * `state` - Shared application state holding the verse store.
///
/// # Returns
/// - `200 OK` with `{success, timestamp, data, dayOfYear}`.
/// - `404 Not Found` when the collection is empty.
/// - `500 Internal Server Error` when the store fails.
pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = state.store.count().await?;
    if count == 0 {
        return Err(ApiError::NotFound(NO_QUOTES.to_string()));
    }

    let today = Local::now().date_naive();
    let data = state
        .store
        .find_at_offset(daily_offset(today, count))
        .await?
        .ok_or_else(|| ApiError::NotFound(NO_QUOTES.to_string()))?;

    Ok(response::ok(DailyQuote {
        data,
        day_of_year: day_of_year(today),
    }))
}
