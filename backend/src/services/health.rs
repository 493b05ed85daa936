use actix_web::{web, HttpResponse};
use common::model::health::ConnectionState;
use serde::Serialize;

use crate::response;
use crate::state::AppState;

#[derive(Serialize)]
struct Health {
    uptime: f64,
    /// Connectivity of the verse store; the key name is fixed for existing clients.
    mongodb: ConnectionState,
}

/// `GET /health`. Always `200 OK`; a failing store shows up as `"disconnected"`.
pub async fn process(state: web::Data<AppState>) -> HttpResponse {
    let mongodb = state.store.ping().await;
    response::ok(Health {
        uptime: state.uptime_secs(),
        mongodb,
    })
}
