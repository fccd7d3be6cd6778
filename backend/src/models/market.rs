use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{PricePoint, Quote};

/// Result of a batch quote fetch. Tickers the provider could not resolve are
/// omitted from `quotes` and listed in `dropped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteBatch {
    pub quotes: HashMap<String, Quote>,
    pub dropped: Vec<String>,
}

/// Latest snapshot plus the normalized daily close series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySeries {
    pub current: Quote,
    pub series: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentDetail {
    pub current: Quote,
    pub historical: Vec<PricePoint>,
    pub moving_average: MovingAverageSeries,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub range: Option<String>,
    pub window: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchQuoteParams {
    pub tickers: Option<String>,
}

impl BatchQuoteParams {
    /// Comma separated list, blanks removed.
    pub fn ticker_list(&self) -> Vec<String> {
        self.tickers
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SentimentParams {
    pub ticker_or_company: Option<String>,
    pub company_name: Option<String>,
    pub days_back: Option<u32>,
    pub max_articles: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_list_splits_and_trims() {
        let params = BatchQuoteParams {
            tickers: Some(" TCS.NS, ,INFY.NS,,".to_string()),
        };
        assert_eq!(params.ticker_list(), vec!["TCS.NS", "INFY.NS"]);
    }

    #[test]
    fn test_ticker_list_missing_is_empty() {
        assert!(BatchQuoteParams::default().ticker_list().is_empty());
    }
}
