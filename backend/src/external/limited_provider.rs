use std::sync::Arc;

use async_trait::async_trait;

use crate::external::market_data_provider::{ExternalPricePoint, MarketDataProvider, ProviderError};
use crate::models::{DateRange, Quote};
use crate::services::rate_limiter::RateLimiter;

/// Wraps a provider so every outbound call first takes a permit from the
/// provider's `RateLimiter`.
pub struct LimitedProvider {
    inner: Arc<dyn MarketDataProvider>,
    limiter: RateLimiter,
}

impl LimitedProvider {
    pub fn new(inner: Arc<dyn MarketDataProvider>, limiter: RateLimiter) -> Self {
        Self { inner, limiter }
    }
}

#[async_trait]
impl MarketDataProvider for LimitedProvider {
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, ProviderError> {
        let _guard = self
            .limiter
            .acquire()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        self.inner.fetch_quote(ticker).await
    }

    async fn fetch_series(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Vec<ExternalPricePoint>, ProviderError> {
        let _guard = self
            .limiter
            .acquire()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        self.inner.fetch_series(ticker, range).await
    }
}
