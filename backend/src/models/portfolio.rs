use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::StockListing;

// One holding: the selected stock snapshot plus purchase details.
#[derive(Debug, Clone, FromRow)]
pub struct PortfolioItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticker: String,
    pub stock: Json<StockListing>,
    pub purchase_price: BigDecimal,
    pub quantity: i32,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticker: String,
    pub stock: StockListing,
    pub purchase_price: f64,
    pub quantity: i32,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PortfolioItemRow> for PortfolioItem {
    type Error = sqlx::Error;

    fn try_from(row: PortfolioItemRow) -> Result<Self, Self::Error> {
        let purchase_price = row
            .purchase_price
            .to_f64()
            .filter(|p| p.is_finite())
            .ok_or_else(|| {
                sqlx::Error::Decode(
                    format!(
                        "purchase_price {} of item {} does not fit in f64",
                        row.purchase_price, row.id
                    )
                    .into(),
                )
            })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            ticker: row.ticker,
            stock: row.stock.0,
            purchase_price,
            quantity: row.quantity,
            purchase_date: row.purchase_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortfolioItem {
    pub stock: StockListing,
    pub purchase_price: f64,
    pub quantity: i32,
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolioItem {
    pub purchase_price: Option<f64>,
    pub quantity: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub id: Uuid,
    pub ticker: String,
    pub issuer_name: String,
    pub quantity: i32,
    pub purchase_price: f64,
    pub invested: f64,
    pub current_price: Option<f64>,
    pub current_value: Option<f64>,
    pub profit: Option<f64>,
    pub profit_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub holdings: Vec<HoldingValuation>,
    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_profit: f64,
    pub total_profit_percentage: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<String>,
}
