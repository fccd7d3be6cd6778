use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{health, ipo, market, portfolio, stocks};
use crate::state::AppState;

pub fn create_app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/v1/market", market::router())
        .nest("/api/v1/stocks", stocks::router())
        .nest("/api/v1/users", portfolio::router())
        .nest("/api/v1/ipo", ipo::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
