//! Top-level handling of unexpected failures.
//!
//! Every `500` passes through [`render_internal`]: the underlying error is logged
//! with the request line, and in production the client only sees
//! `"Internal server error"`. Headers already on the response are carried over to
//! the replacement, apart from the body framing ones.

use actix_web::dev::ServiceResponse;
use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{web, HttpResponse};
use log::error;

use crate::response::ErrorBody;
use crate::state::AppState;

const GENERIC_MESSAGE: &str = "Internal server error";

pub fn render_internal<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let detail = res
        .response()
        .error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string());
    error!(
        "{} {} failed: {}",
        res.request().method(),
        res.request().path(),
        detail
    );

    // Without state we cannot tell the mode; assume production.
    let production = res
        .request()
        .app_data::<web::Data<AppState>>()
        .map_or(true, |state| state.config.mode.is_production());
    let message = if production {
        GENERIC_MESSAGE.to_string()
    } else {
        detail
    };

    let (req, original) = res.into_parts();
    let mut response = HttpResponse::InternalServerError().json(ErrorBody::new(message));
    for (name, value) in original.headers().iter() {
        if *name != CONTENT_TYPE && *name != CONTENT_LENGTH {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
