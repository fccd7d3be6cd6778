use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::routes::extract::{ApiPath, ApiQuery};
use crate::models::{StockImportResult, StockListing, StockSearchParams};
use crate::routes::validate_ticker;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_stocks))
        .route("/import", post(import_stocks))
        .route("/:ticker", get(get_stock))
}

pub async fn search_stocks(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StockSearchParams>,
) -> Result<Json<Vec<StockListing>>, AppError> {
    info!("GET /stocks/search - query '{}'", params.query);
    let listings = services::stock_service::search(&state.pool, &params.query)
        .await
        .map_err(|e| {
            error!("Stock search failed for '{}': {}", params.query, e);
            e
        })?;
    Ok(Json(listings))
}

pub async fn get_stock(
    State(state): State<AppState>,
    ApiPath(ticker): ApiPath<String>,
) -> Result<Json<StockListing>, AppError> {
    info!("GET /stocks/{} - Fetching listing", ticker);
    validate_ticker(&ticker)?;
    let listing = services::stock_service::fetch_by_ticker(&state.pool, &ticker).await?;
    Ok(Json(listing))
}

pub async fn import_stocks(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StockImportResult>, AppError> {
    info!("POST /stocks/import - Importing {} bytes", body.len());
    if body.trim().is_empty() {
        return Err(AppError::Validation("CSV body is empty".into()));
    }

    let result = services::stock_import_service::import_listings(&state.pool, &body)
        .await
        .map_err(|e| {
            error!("Stock import failed: {:#}", e);
            AppError::External(format!("Import failed: {}", e))
        })?;
    Ok(Json(result))
}
