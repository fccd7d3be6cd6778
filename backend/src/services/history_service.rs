use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::market_data_provider::{ExternalPricePoint, MarketDataProvider, ProviderError};
use crate::models::{HistorySeries, PricePoint, RangeSpec};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("data unavailable for {ticker} ({range}): {reason}")]
    DataUnavailable {
        ticker: String,
        range: RangeSpec,
        reason: String,
    },
    #[error("provider rate limited the request for {0}")]
    RateLimited(String),
}

impl From<HistoryError> for AppError {
    fn from(value: HistoryError) -> Self {
        match value {
            HistoryError::DataUnavailable { ticker, range, reason } => {
                AppError::DataUnavailable { ticker, range, reason }
            }
            HistoryError::RateLimited(_) => AppError::RateLimited,
        }
    }
}

/// Drop points without a close, order by date and keep one point per date
/// (the last one the provider sent).
pub fn normalize_series(points: Vec<ExternalPricePoint>) -> Vec<PricePoint> {
    points
        .into_iter()
        .filter_map(|p| {
            p.close
                .filter(|c| c.is_finite())
                .map(|close_price| (p.date, close_price))
        })
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(date, close_price)| PricePoint { date, close_price })
        .collect()
}

/// Latest quote plus daily closes for `ticker` over `range`, resolved
/// against `now`.
///
/// Series and quote are fetched concurrently. Either failing, or an empty
/// series after normalization, fails the whole call.
pub async fn fetch_history(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    range: RangeSpec,
    now: DateTime<Utc>,
) -> Result<HistorySeries, HistoryError> {
    let window = range.resolve(now);
    let unavailable = |reason: String| HistoryError::DataUnavailable {
        ticker: ticker.to_string(),
        range,
        reason,
    };
    let provider_failure = |e: ProviderError| match e {
        ProviderError::RateLimited => HistoryError::RateLimited(ticker.to_string()),
        other => unavailable(other.to_string()),
    };

    let (series, current) = tokio::join!(
        provider.fetch_series(ticker, &window),
        provider.fetch_quote(ticker)
    );

    let series = series.map_err(|e| {
        error!("Series fetch failed for {} ({}): {}", ticker, range, e);
        provider_failure(e)
    })?;
    let current = current.map_err(|e| {
        error!("Quote fetch failed for {} ({}): {}", ticker, range, e);
        provider_failure(e)
    })?;

    let raw_len = series.len();
    let series = normalize_series(series);
    if series.is_empty() {
        return Err(unavailable("no data".to_string()));
    }

    info!(
        "Fetched {} points for {} ({}), {} raw",
        series.len(),
        ticker,
        range,
        raw_len
    );

    Ok(HistorySeries { current, series })
}
