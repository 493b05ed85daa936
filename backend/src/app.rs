//! Assembles the actix `App`: shared state, extractor configuration, middleware
//! stack and routes. Used by the server binary and by the integration tests.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::{from_fn, Compress, ErrorHandlers, Logger};
use actix_web::{web, App, Error};

use crate::error::ApiError;
use crate::middleware::security::{self, MAX_BODY_BYTES};
use crate::middleware::{errors, rate_limit};
use crate::services::{health, index, legacy, not_found, quote, quotes};
use crate::state::AppState;

pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = security::cors(&state.config.cors_origins);

    App::new()
        .app_data(state)
        .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .app_data(web::JsonConfig::default().limit(MAX_BODY_BYTES))
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
        )
        // Registered innermost first; `Logger` sees the final response. The 500
        // handler replaces the response, so it must sit inside the header layers.
        .wrap(from_fn(security::limit_body))
        .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, errors::render_internal))
        .wrap(security::security_headers())
        .wrap(cors)
        .wrap(Compress::default())
        .wrap(Logger::default())
        .route("/health", web::get().to(health::process))
        .service(
            web::scope("/api")
                .wrap(from_fn(rate_limit::general_limit))
                .route("", web::get().to(index::process))
                .service(quote::configure_routes().wrap(from_fn(rate_limit::quote_limit)))
                .service(quotes::configure_routes().wrap(from_fn(rate_limit::quote_limit))),
        )
        .service(legacy::configure_routes())
        .default_service(web::to(not_found::process))
}
