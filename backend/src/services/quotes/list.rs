//! # Paginated Listing
//!
//! Serves `GET /api/quotes`. `page` and `limit` are parsed leniently: anything that
//! does not start with a number falls back to the default, and both are clamped
//! (`page >= 1`, `1 <= limit <= 50`). A page past the end is an empty `200`.

use actix_web::{web, HttpResponse};
use common::model::pagination::Pagination;
use common::model::verse::VerseRecord;
use common::requests::PageQuery;
use serde::Serialize;

use crate::error::ApiError;
use crate::response;
use crate::selection::PageBounds;
use crate::state::AppState;

#[derive(Serialize)]
struct Page {
    data: Vec<VerseRecord>,
    pagination: Pagination,
}

/// Actix web handler for `GET /api/quotes?page=&limit=`.
///
/// # Arguments
/// * `query` - Raw `page` and `limit` query parameters.
/// * `state` - Shared application state holding the verse store.
///
/// # Returns
/// - `200 OK` with `{data, pagination}`.
pub async fn process(
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let bounds = PageBounds::from_query(query.page.as_deref(), query.limit.as_deref());

    let data = state.store.find_page(bounds.skip, bounds.limit).await?;
    let total = state.store.count().await?;

    Ok(response::ok(Page {
        data,
        pagination: Pagination::new(bounds.page, bounds.limit, total),
    }))
}
