use axum::extract::State;
use http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::models::{CreatePortfolioItem, PortfolioItem, PortfolioSummary, UpdatePortfolioItem};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/portfolio", get(fetch_items).post(create_item))
        .route("/:user_id/portfolio/summary", get(fetch_summary))
        .route("/:user_id/portfolio/:id", put(update_item).delete(delete_item))
}

pub async fn fetch_items(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<PortfolioItem>>, AppError> {
    info!("GET /users/{}/portfolio - Fetching holdings", user_id);
    let items = services::portfolio_service::fetch_all(&state.pool, user_id)
        .await
        .map_err(|e| {
            error!("Failed to fetch holdings for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<CreatePortfolioItem>,
) -> Result<(StatusCode, Json<PortfolioItem>), AppError> {
    info!("POST /users/{}/portfolio - Adding holding", user_id);
    let item = services::portfolio_service::create(&state.pool, user_id, data)
        .await
        .map_err(|e| {
            error!("Failed to add holding for {}: {}", user_id, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    ApiPath((user_id, id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(data): ApiJson<UpdatePortfolioItem>,
) -> Result<Json<PortfolioItem>, AppError> {
    info!("PUT /users/{}/portfolio/{} - Updating holding", user_id, id);
    let item = services::portfolio_service::update(&state.pool, user_id, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update holding {}: {}", id, e);
            e
        })?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    ApiPath((user_id, id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /users/{}/portfolio/{} - Removing holding", user_id, id);
    services::portfolio_service::delete(&state.pool, user_id, id)
        .await
        .map_err(|e| {
            error!("Failed to delete holding {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn fetch_summary(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<PortfolioSummary>, AppError> {
    info!("GET /users/{}/portfolio/summary - Valuing holdings", user_id);
    let summary = services::portfolio_service::summary(&state.pool, &state.market, user_id)
        .await
        .map_err(|e| {
            error!("Failed to value holdings for {}: {}", user_id, e);
            e
        })?;
    Ok(Json(summary))
}
