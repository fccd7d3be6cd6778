use std::collections::HashMap;

use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::Utc;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    CreatePortfolioItem, HoldingValuation, PortfolioItem, PortfolioSummary, Quote,
    UpdatePortfolioItem,
};
use crate::services::market_service::{round_to_cents, MarketService};

pub const MIN_PURCHASE_PRICE: f64 = 0.01;

fn validate_purchase(purchase_price: f64, quantity: i32) -> Result<(), AppError> {
    if !purchase_price.is_finite() || purchase_price < MIN_PURCHASE_PRICE {
        return Err(AppError::Validation(format!(
            "Purchase price must be at least {}",
            MIN_PURCHASE_PRICE
        )));
    }
    if quantity < 1 {
        return Err(AppError::Validation("Quantity must be at least 1".into()));
    }
    Ok(())
}

fn to_decimal(value: f64) -> Result<BigDecimal, AppError> {
    BigDecimal::from_f64(value)
        .ok_or_else(|| AppError::Validation(format!("Invalid purchase price {}", value)))
}

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    input: CreatePortfolioItem,
) -> Result<PortfolioItem, AppError> {
    validate_purchase(input.purchase_price, input.quantity)?;
    let ticker = input
        .stock
        .quote_ticker()
        .ok_or_else(|| {
            AppError::Validation(format!(
                "{} has no NSE or BSE ticker",
                input.stock.issuer_name
            ))
        })?
        .to_string();

    let purchase_date = input.purchase_date.unwrap_or_else(|| Utc::now().date_naive());
    let row = db::portfolio_queries::insert(
        pool,
        user_id,
        &ticker,
        &input.stock,
        to_decimal(input.purchase_price)?,
        input.quantity,
        purchase_date,
    )
    .await?;
    Ok(PortfolioItem::try_from(row)?)
}

pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    input: UpdatePortfolioItem,
) -> Result<PortfolioItem, AppError> {
    let current: PortfolioItem = fetch_one(pool, user_id, id).await?;

    let purchase_price = input.purchase_price.unwrap_or(current.purchase_price);
    let quantity = input.quantity.unwrap_or(current.quantity);
    let purchase_date = input.purchase_date.unwrap_or(current.purchase_date);
    validate_purchase(purchase_price, quantity)?;

    let row = db::portfolio_queries::update(
        pool,
        user_id,
        id,
        to_decimal(purchase_price)?,
        quantity,
        purchase_date,
    )
    .await?
    .ok_or(AppError::NotFound("Portfolio item not found".to_string()))?;
    Ok(PortfolioItem::try_from(row)?)
}

pub async fn fetch_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<PortfolioItem>, AppError> {
    let rows = db::portfolio_queries::fetch_all(pool, user_id).await?;
    let items = rows
        .into_iter()
        .map(PortfolioItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub async fn fetch_one(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<PortfolioItem, AppError> {
    let row = db::portfolio_queries::fetch_one(pool, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Portfolio item not found".to_string()))?;
    Ok(PortfolioItem::try_from(row)?)
}

pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    match db::portfolio_queries::delete(pool, user_id, id).await? {
        0 => Err(AppError::NotFound("Portfolio item not found".to_string())),
        _ => Ok(()),
    }
}

/// Value every holding at the latest quote. Holdings whose ticker has no
/// live price are kept with empty valuation fields and listed in `dropped`.
pub fn summarize(items: &[PortfolioItem], quotes: &HashMap<String, Quote>) -> PortfolioSummary {
    let mut holdings = Vec::with_capacity(items.len());
    let mut dropped = Vec::new();
    let mut total_invested = 0.0;
    let mut total_current_value = 0.0;
    let mut valued_invested = 0.0;

    for item in items {
        let invested = item.purchase_price * f64::from(item.quantity);
        total_invested += invested;

        let current_price = quotes.get(&item.ticker).and_then(|q| q.price);
        let current_value = current_price.map(|p| p * f64::from(item.quantity));
        match current_value {
            Some(value) => {
                total_current_value += value;
                valued_invested += invested;
            }
            None => {
                if !dropped.contains(&item.ticker) {
                    dropped.push(item.ticker.clone());
                }
            }
        }

        let profit = current_value.map(|v| v - invested);
        holdings.push(HoldingValuation {
            id: item.id,
            ticker: item.ticker.clone(),
            issuer_name: item.stock.issuer_name.clone(),
            quantity: item.quantity,
            purchase_price: item.purchase_price,
            invested: round_to_cents(invested),
            current_price,
            current_value: current_value.map(round_to_cents),
            profit: profit.map(round_to_cents),
            profit_percentage: profit
                .filter(|_| invested > 0.0)
                .map(|p| round_to_cents(p / invested * 100.0)),
        });
    }

    // Only holdings with a live price contribute to profit
    let total_profit = total_current_value - valued_invested;
    let total_profit_percentage = if valued_invested > 0.0 {
        total_profit / valued_invested * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        holdings,
        total_invested: round_to_cents(total_invested),
        total_current_value: round_to_cents(total_current_value),
        total_profit: round_to_cents(total_profit),
        total_profit_percentage: round_to_cents(total_profit_percentage),
        dropped,
    }
}

pub async fn summary(
    pool: &PgPool,
    market: &MarketService,
    user_id: Uuid,
) -> Result<PortfolioSummary, AppError> {
    let items = fetch_all(pool, user_id).await?;
    let tickers: Vec<String> = items.iter().map(|i| i.ticker.clone()).collect();

    let batch = market.quotes(&tickers).await;
    let summary = summarize(&items, &batch.quotes);
    if !summary.dropped.is_empty() {
        warn!(
            "Portfolio summary for {} missing prices for {:?}",
            user_id, summary.dropped
        );
    }
    Ok(summary)
}
