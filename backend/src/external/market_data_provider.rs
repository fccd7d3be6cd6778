use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{DateRange, Quote};

/// Daily close as received from the provider; the close may be missing on
/// holidays or for the still-open session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPricePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data found")]
    NotFound,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest snapshot for one ticker.
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, ProviderError>;

    /// Daily closes between `range.start` and `range.end`, in provider order.
    async fn fetch_series(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Vec<ExternalPricePoint>, ProviderError>;
}
