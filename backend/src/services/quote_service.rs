use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::external::market_data_provider::MarketDataProvider;
use crate::models::QuoteBatch;

/// Unique tickers in first-seen order.
pub fn dedup_tickers(tickers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    tickers
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// Fetch a snapshot for every ticker, one provider call per unique ticker,
/// all issued concurrently.
///
/// A failing ticker never fails the batch: it is left out of `quotes` and
/// recorded in `dropped`. Each ticker gets exactly one attempt.
pub async fn fetch_quotes(provider: &dyn MarketDataProvider, tickers: &[String]) -> QuoteBatch {
    let unique = dedup_tickers(tickers);
    if unique.is_empty() {
        return QuoteBatch::default();
    }

    let batch_start = std::time::Instant::now();
    let results = futures::future::join_all(unique.iter().map(|ticker| async move {
        (ticker, provider.fetch_quote(ticker).await)
    }))
    .await;

    let mut quotes = HashMap::with_capacity(results.len());
    let mut dropped = Vec::new();

    for (ticker, result) in results {
        match result {
            Ok(quote) => {
                quotes.insert(ticker.clone(), quote);
            }
            Err(e) => {
                warn!("Dropping {} from quote batch: {}", ticker, e);
                dropped.push(ticker.clone());
            }
        }
    }

    info!(
        "📋 Fetched {}/{} quotes in {:?}",
        quotes.len(),
        unique.len(),
        batch_start.elapsed()
    );

    QuoteBatch { quotes, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::market_data_provider::{ExternalPricePoint, ProviderError};
    use crate::models::{DateRange, Quote};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn fetch_quote(&self, ticker: &str) -> Result<Quote, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if ticker.starts_with("BAD") {
                return Err(ProviderError::NotFound);
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
            Ok(Vec::new())
        }
    }

    fn stub() -> StubProvider {
        StubProvider { calls: AtomicUsize::new(0) }
    }

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_one_bad_ticker_is_dropped() {
        let provider = stub();
        let batch = fetch_quotes(
            &provider,
            &tickers(&["TCS.NS", "INFY.NS", "BAD.NS", "HDFCBANK.NS", "ITC.NS"]),
        )
        .await;

        assert_eq!(batch.quotes.len(), 4);
        assert!(!batch.quotes.contains_key("BAD.NS"));
        assert_eq!(batch.dropped, vec!["BAD.NS".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicates_are_fetched_once() {
        let provider = stub();
        let batch = fetch_quotes(&provider, &tickers(&["TCS.NS", "TCS.NS", "ITC.NS"])).await;

        assert_eq!(batch.quotes.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_failures_still_succeed() {
        let provider = stub();
        let batch = fetch_quotes(&provider, &tickers(&["BAD1", "BAD2"])).await;
        assert!(batch.quotes.is_empty());
        assert_eq!(batch.dropped.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let provider = stub();
        let batch = fetch_quotes(&provider, &[]).await;
        assert_eq!(batch, QuoteBatch::default());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        assert_eq!(
            dedup_tickers(&tickers(&["B", "A", "B", "C", "A"])),
            tickers(&["B", "A", "C"])
        );
    }
}
