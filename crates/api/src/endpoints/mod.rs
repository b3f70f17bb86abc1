//! API endpoints.

mod auth;
mod courses;
mod meta;
mod oauth;
mod students;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(meta::router())
        .merge(auth::router())
        .merge(oauth::router())
        .nest("/students", students::router())
        .nest("/courses", courses::router())
}
