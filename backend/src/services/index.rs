use actix_web::HttpResponse;
use serde::Serialize;

use crate::response;

#[derive(Serialize)]
struct Index {
    message: &'static str,
    version: &'static str,
    endpoints: [Endpoint; 6],
}

#[derive(Serialize)]
struct Endpoint {
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

const fn get(path: &'static str, description: &'static str) -> Endpoint {
    Endpoint {
        method: "GET",
        path,
        description,
    }
}

/// `GET /api`: static listing of what the API offers.
pub async fn process() -> HttpResponse {
    response::ok(Index {
        message: "Sanskrit Slokas API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: [
            get("/health", "Service health and database connectivity"),
            get("/api/quote/random", "A random sloka"),
            get("/api/quote/daily", "The sloka of the day"),
            get("/api/quote/{id}", "A sloka by its identifier"),
            get("/api/quotes/search?source={text}", "Slokas whose source contains the text"),
            get("/api/quotes?page={n}&limit={m}", "All slokas, paginated"),
        ],
    })
}
