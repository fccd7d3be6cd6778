use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::market_data_provider::MarketDataProvider;
use crate::models::{
    ClassifiedIndices, HistorySeries, IndexQuote, IndexTable, InstrumentDetail,
    MovingAverageSeries, Quote, QuoteBatch, RangeSpec,
};
use crate::services::history_service::{self, HistoryError};
use crate::services::indicators::moving_average;
use crate::services::index_classifier;
use crate::services::market_cache::{ticker_set_key, MarketCache};
use crate::services::quote_service;

/// Index snapshot split by category, plus tickers the provider dropped.
#[derive(Debug, Clone)]
pub struct IndicesSnapshot {
    pub indices: ClassifiedIndices,
    pub dropped: Vec<String>,
}

/// Quotes in the caller's order, plus tickers the provider dropped.
#[derive(Debug, Clone)]
pub struct OrderedQuotes {
    pub quotes: Vec<Quote>,
    pub dropped: Vec<String>,
}

/// Composes quote, history, classification and moving averages into the
/// payloads served by the market routes.
pub struct MarketService {
    provider: Arc<dyn MarketDataProvider>,
    indices: Arc<IndexTable>,
    quote_cache: MarketCache<QuoteBatch>,
    history_cache: MarketCache<HistorySeries>,
}

impl MarketService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        indices: Arc<IndexTable>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            indices,
            quote_cache: MarketCache::new(cache_ttl),
            history_cache: MarketCache::new(cache_ttl),
        }
    }

    /// Batch quote fetch through the short-lived cache.
    pub async fn quotes(&self, tickers: &[String]) -> QuoteBatch {
        if tickers.is_empty() {
            return QuoteBatch::default();
        }

        let key = ticker_set_key(tickers);
        if let Some(batch) = self.quote_cache.get(&key) {
            info!("Serving {} quotes from cache", batch.quotes.len());
            return batch;
        }

        let batch = quote_service::fetch_quotes(self.provider.as_ref(), tickers).await;
        self.quote_cache.insert(key, batch.clone());
        batch
    }

    /// History fetch through the short-lived cache. Failures are not cached.
    pub async fn history(&self, ticker: &str, range: RangeSpec) -> Result<HistorySeries, HistoryError> {
        let key = format!("{}|{}", ticker, range);
        if let Some(history) = self.history_cache.get(&key) {
            info!("Serving history for {} ({}) from cache", ticker, range);
            return Ok(history);
        }

        let history = history_service::fetch_history(self.provider.as_ref(), ticker, range, Utc::now()).await?;
        self.history_cache.insert(key, history.clone());
        Ok(history)
    }

    /// Every index in the table, grouped into domestic and global.
    pub async fn all_indices(&self) -> IndicesSnapshot {
        let batch = self.quotes(&self.indices.tickers()).await;
        if !batch.dropped.is_empty() {
            warn!("{} indices unavailable: {:?}", batch.dropped.len(), batch.dropped);
        }

        IndicesSnapshot {
            indices: index_classifier::classify(&self.indices, &batch.quotes),
            dropped: batch.dropped,
        }
    }

    /// Every index in table order as one flat list.
    pub async fn live_indices(&self) -> (Vec<IndexQuote>, Vec<String>) {
        let batch = self.quotes(&self.indices.tickers()).await;
        (index_classifier::flatten(&self.indices, &batch.quotes), batch.dropped)
    }

    /// Quote and history for one index or stock with a moving-average
    /// overlay. `window` overrides the range default.
    pub async fn instrument_detail(
        &self,
        ticker: &str,
        range: RangeSpec,
        window: Option<usize>,
    ) -> Result<InstrumentDetail, AppError> {
        let history = self.history(ticker, range).await?;
        let window = window.unwrap_or_else(|| range.default_window());

        let closes: Vec<f64> = history.series.iter().map(|p| p.close_price).collect();
        let values = moving_average(&closes, window)
            .into_iter()
            .map(|v| v.map(round_to_cents))
            .collect();

        Ok(InstrumentDetail {
            current: history.current,
            historical: history.series,
            moving_average: MovingAverageSeries { window, values },
        })
    }

    /// Quotes for an explicit ticker list, ordered as requested. Unknown
    /// tickers are skipped.
    pub async fn batch_quotes(&self, tickers: &[String]) -> OrderedQuotes {
        let unique = quote_service::dedup_tickers(tickers);
        let mut batch = self.quotes(&unique).await;

        OrderedQuotes {
            quotes: unique.iter().filter_map(|t| batch.quotes.remove(t)).collect(),
            dropped: batch.dropped,
        }
    }

    pub fn cleanup_caches(&self) {
        self.quote_cache.cleanup_expired();
        self.history_cache.cleanup_expired();
    }
}

/// Presentation rounding applied when shaping responses.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::market_data_provider::{ExternalPricePoint, ProviderError};
    use crate::models::DateRange;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        quote_calls: AtomicUsize,
        series_calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                quote_calls: AtomicUsize::new(0),
                series_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MarketDataProvider for FakeProvider {
        async fn fetch_quote(&self, ticker: &str) -> Result<Quote, ProviderError> {
            self.quote_calls.fetch_add(1, Ordering::SeqCst);
            if ticker == "^HSI" || ticker.starts_with("BAD") {
                return Err(ProviderError::BadResponse("HTTP 500".into()));
            }
            let mut quote = Quote::empty(ticker);
            quote.price = Some(100.0);
            Ok(quote)
        }

        async fn fetch_series(
            &self,
            _ticker: &str,
            _range: &DateRange,
        ) -> Result<Vec<ExternalPricePoint>, ProviderError> {
            self.series_calls.fetch_add(1, Ordering::SeqCst);
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..30)
                .map(|i| ExternalPricePoint {
                    date: start + ChronoDuration::days(i),
                    close: Some(100.0 + i as f64 / 3.0),
                })
                .collect())
        }
    }

    fn service(provider: Arc<FakeProvider>, ttl: Duration) -> MarketService {
        MarketService::new(provider, Arc::new(IndexTable::standard()), ttl)
    }

    #[tokio::test]
    async fn test_all_indices_survives_one_bad_index() {
        let provider = FakeProvider::new();
        let snapshot = service(provider, Duration::ZERO).all_indices().await;

        assert_eq!(snapshot.indices.domestic.len(), 15);
        assert_eq!(snapshot.indices.global.len(), 11);
        assert_eq!(snapshot.dropped, vec!["^HSI".to_string()]);
    }

    #[tokio::test]
    async fn test_detail_uses_range_default_window() {
        let provider = FakeProvider::new();
        let detail = service(provider, Duration::ZERO)
            .instrument_detail("^NSEI", RangeSpec::OneMonth, None)
            .await
            .unwrap();

        assert_eq!(detail.moving_average.window, 7);
        assert_eq!(detail.moving_average.values.len(), detail.historical.len());
        assert!(detail.moving_average.values[..6].iter().all(Option::is_none));
        assert_eq!(detail.moving_average.values[6], Some(101.0));
    }

    #[tokio::test]
    async fn test_detail_window_override_and_rounding() {
        let provider = FakeProvider::new();
        let detail = service(provider, Duration::ZERO)
            .instrument_detail("TCS.NS", RangeSpec::Max, Some(2))
            .await
            .unwrap();

        assert_eq!(detail.moving_average.window, 2);
        // (100 + 100.333..) / 2 rounded to cents
        assert_eq!(detail.moving_average.values[1], Some(100.17));
    }

    #[tokio::test]
    async fn test_batch_quotes_keeps_request_order() {
        let provider = FakeProvider::new();
        let tickers: Vec<String> = ["ITC.NS", "BAD.NS", "TCS.NS", "ITC.NS"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let result = service(provider, Duration::ZERO).batch_quotes(&tickers).await;

        let order: Vec<&str> = result.quotes.iter().map(|q| q.ticker.as_str()).collect();
        assert_eq!(order, vec!["ITC.NS", "TCS.NS"]);
        assert_eq!(result.dropped, vec!["BAD.NS".to_string()]);
    }

    #[tokio::test]
    async fn test_cache_absorbs_repeated_polls() {
        let provider = FakeProvider::new();
        let svc = service(provider.clone(), Duration::from_secs(60));

        svc.instrument_detail("^NSEI", RangeSpec::OneYear, None).await.unwrap();
        svc.instrument_detail("^NSEI", RangeSpec::OneYear, Some(10)).await.unwrap();
        assert_eq!(provider.series_calls.load(Ordering::SeqCst), 1);

        let tickers = vec!["A".to_string(), "B".to_string()];
        svc.batch_quotes(&tickers).await;
        svc.batch_quotes(&[tickers[1].clone(), tickers[0].clone()]).await;
        // 1 quote from the history fetch + 2 from the first batch
        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_without_cache_every_poll_refetches() {
        let provider = FakeProvider::new();
        let svc = service(provider.clone(), Duration::ZERO);
        svc.all_indices().await;
        svc.all_indices().await;
        assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 54);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(22514.654), 22514.65);
        assert_eq!(round_to_cents(-1.005_1), -1.01);
    }
}
