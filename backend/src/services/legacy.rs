use actix_web::http::header::LOCATION;
use actix_web::web::{get, scope};
use actix_web::{HttpResponse, Scope};

/// Pre-`/api` paths, kept as permanent redirects.
pub fn configure_routes() -> Scope {
    scope("/quote")
        .route("/random", get().to(random))
        .route("/daily", get().to(daily))
}

async fn random() -> HttpResponse {
    redirect("/api/quote/random")
}

async fn daily() -> HttpResponse {
    redirect("/api/quote/daily")
}

fn redirect(to: &'static str) -> HttpResponse {
    HttpResponse::MovedPermanently()
        .insert_header((LOCATION, to))
        .finish()
}
