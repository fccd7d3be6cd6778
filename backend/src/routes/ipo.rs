use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::IpoListing;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(fetch_ipos))
}

#[derive(Debug, Serialize)]
pub struct IpoResponse {
    success: bool,
    data: Vec<IpoListing>,
}

pub async fn fetch_ipos(State(state): State<AppState>) -> Result<Json<IpoResponse>, AppError> {
    info!("GET /ipo - Fetching IPO listings");
    let data = services::ipo_service::fetch_all(&state.pool).await.map_err(|e| {
        error!("Failed to fetch IPO listings: {}", e);
        e
    })?;
    Ok(Json(IpoResponse { success: true, data }))
}
