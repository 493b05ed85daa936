use actix_web::{HttpRequest, HttpResponse};

use crate::response::ErrorBody;

/// Fallback for every unmatched route; echoes the requested path.
pub async fn process(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody {
        success: false,
        error: "Endpoint not found".to_string(),
        path: Some(req.uri().path().to_string()),
    })
}
