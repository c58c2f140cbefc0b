use axum::Router;
use axum::http::StatusCode;

use crate::AppState;

mod auth;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes(state.auth.clone()))
        .fallback(|| async { StatusCode::NOT_FOUND })
}
