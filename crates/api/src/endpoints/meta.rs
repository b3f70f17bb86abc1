//! Service health endpoints.

use axum::{http::StatusCode, routing::get, Router};

use crate::middleware::AppState;

/// Liveness probe: responds 204 when the server is up.
async fn ping() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}
