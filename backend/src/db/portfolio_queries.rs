use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PortfolioItemRow, StockListing};

const ITEM_COLUMNS: &str =
    "id, user_id, ticker, stock, purchase_price, quantity, purchase_date, created_at";

pub async fn fetch_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<PortfolioItemRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioItemRow>(&format!(
        "SELECT {ITEM_COLUMNS}
           FROM portfolio_items
          WHERE user_id = $1
          ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<PortfolioItemRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioItemRow>(&format!(
        "SELECT {ITEM_COLUMNS}
           FROM portfolio_items
          WHERE user_id = $1 AND id = $2"
    ))
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(
    pool: &PgPool,
    user_id: Uuid,
    ticker: &str,
    stock: &StockListing,
    purchase_price: BigDecimal,
    quantity: i32,
    purchase_date: NaiveDate,
) -> Result<PortfolioItemRow, sqlx::Error> {
    sqlx::query_as::<_, PortfolioItemRow>(&format!(
        "INSERT INTO portfolio_items (id, user_id, ticker, stock, purchase_price, quantity, purchase_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(ticker)
    .bind(Json(stock))
    .bind(purchase_price)
    .bind(quantity)
    .bind(purchase_date)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    purchase_price: BigDecimal,
    quantity: i32,
    purchase_date: NaiveDate,
) -> Result<Option<PortfolioItemRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioItemRow>(&format!(
        "UPDATE portfolio_items
            SET purchase_price = $3, quantity = $4, purchase_date = $5
          WHERE user_id = $1 AND id = $2
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(user_id)
    .bind(id)
    .bind(purchase_price)
    .bind(quantity)
    .bind(purchase_date)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolio_items WHERE user_id = $1 AND id = $2")
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
