use sqlx::PgPool;

use crate::db;
use crate::errors::AppError;
use crate::models::StockListing;

pub const SEARCH_LIMIT: i64 = 20;

pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<StockListing>, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let listings = db::stock_queries::search(pool, query, SEARCH_LIMIT).await?;
    Ok(listings)
}

pub async fn fetch_by_ticker(pool: &PgPool, ticker: &str) -> Result<StockListing, AppError> {
    db::stock_queries::fetch_by_ticker(pool, ticker)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock {} not found", ticker)))
}
