use serde::Deserialize;

/// Raw query string of `GET /api/quotes`.
///
/// Values are kept as strings so malformed numbers fall back to defaults
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Raw query string of `GET /api/quotes/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub source: Option<String>,
    pub limit: Option<String>,
}
