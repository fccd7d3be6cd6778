use crate::external::market_data_provider::{ExternalPricePoint, MarketDataProvider, ProviderError};
use crate::external::numeric::{normalize, ProviderNumber};
use crate::models::{DateRange, Quote};
use async_trait::async_trait;
use serde::Deserialize;

/// Yahoo Finance chart API. No key required; both the quote snapshot and the
/// daily series come from the v8 chart endpoint.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; Findash/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker)
    }

    async fn fetch_chart(
        &self,
        ticker: &str,
        query: &[(&str, String)],
    ) -> Result<YahooResult, ProviderError> {
        let resp = self
            .client
            .get(self.chart_url(ticker))
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !status.is_success() {
            return Err(ProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        body.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuoteIndicator>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteIndicator {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: String,
    long_name: Option<String>,
    short_name: Option<String>,
    currency: Option<String>,
    exchange_name: Option<String>,
    full_exchange_name: Option<String>,
    instrument_type: Option<String>,
    market_state: Option<String>,
    regular_market_price: Option<ProviderNumber>,
    regular_market_change: Option<ProviderNumber>,
    regular_market_change_percent: Option<ProviderNumber>,
    regular_market_day_high: Option<ProviderNumber>,
    regular_market_day_low: Option<ProviderNumber>,
    regular_market_open: Option<ProviderNumber>,
    regular_market_volume: Option<ProviderNumber>,
    regular_market_previous_close: Option<ProviderNumber>,
    chart_previous_close: Option<ProviderNumber>,
    previous_close: Option<ProviderNumber>,
    fifty_two_week_high: Option<ProviderNumber>,
    fifty_two_week_low: Option<ProviderNumber>,
}

impl YahooChartResponse {
    fn into_result(self) -> Result<YahooResult, ProviderError> {
        if let Some(error) = self.chart.error {
            let description = error.description.unwrap_or_default();
            if error.code.as_deref() == Some("Not Found") || description.contains("No data found") {
                return Err(ProviderError::NotFound);
            }
            return Err(ProviderError::BadResponse(description));
        }

        self.chart
            .result
            .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
            .ok_or(ProviderError::NotFound)
    }
}

impl YahooMeta {
    fn into_quote(self) -> Quote {
        let previous_close = normalize(self.regular_market_previous_close.as_ref())
            .or_else(|| normalize(self.previous_close.as_ref()))
            .or_else(|| normalize(self.chart_previous_close.as_ref()));

        Quote {
            display_name: self
                .long_name
                .or(self.short_name)
                .unwrap_or_else(|| self.symbol.clone()),
            ticker: self.symbol,
            price: normalize(self.regular_market_price.as_ref()),
            absolute_change: normalize(self.regular_market_change.as_ref()),
            percent_change: normalize(self.regular_market_change_percent.as_ref()),
            day_high: normalize(self.regular_market_day_high.as_ref()),
            day_low: normalize(self.regular_market_day_low.as_ref()),
            previous_close,
            open: normalize(self.regular_market_open.as_ref()),
            volume: normalize(self.regular_market_volume.as_ref()),
            fifty_two_week_high: normalize(self.fifty_two_week_high.as_ref()),
            fifty_two_week_low: normalize(self.fifty_two_week_low.as_ref()),
            market_state: self.market_state,
            exchange: self.full_exchange_name.or(self.exchange_name),
            currency: self.currency,
            quote_type: self.instrument_type,
        }
        .with_derived_change()
    }
}

impl YahooResult {
    fn into_points(self) -> Result<Vec<ExternalPricePoint>, ProviderError> {
        let closes = self
            .indicators
            .and_then(|mut i| if i.quote.is_empty() { None } else { Some(i.quote.remove(0)) })
            .map(|q| q.close)
            .unwrap_or_default();

        if !closes.is_empty() && closes.len() != self.timestamp.len() {
            return Err(ProviderError::Parse(
                "Timestamp and close price arrays have different lengths".into(),
            ));
        }

        self.timestamp
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                let date = chrono::DateTime::from_timestamp(*ts, 0)
                    .map(|dt| dt.date_naive())
                    .ok_or_else(|| ProviderError::Parse(format!("bad timestamp {}", ts)))?;
                Ok(ExternalPricePoint {
                    date,
                    close: closes.get(i).copied().flatten(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_quote(&self, ticker: &str) -> Result<Quote, ProviderError> {
        let result = self
            .fetch_chart(
                ticker,
                &[("range", "1d".to_string()), ("interval", "1d".to_string())],
            )
            .await?;

        Ok(result.meta.into_quote())
    }

    async fn fetch_series(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Vec<ExternalPricePoint>, ProviderError> {
        let result = self
            .fetch_chart(
                ticker,
                &[
                    ("period1", range.start.timestamp().to_string()),
                    ("period2", range.end.timestamp().to_string()),
                    ("interval", "1d".to_string()),
                    ("includePrePost", "false".to_string()),
                ],
            )
            .await?;

        result.into_points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "^NSEI",
                    "longName": "NIFTY 50",
                    "currency": "INR",
                    "exchangeName": "NSI",
                    "fullExchangeName": "NSE",
                    "instrumentType": "INDEX",
                    "regularMarketPrice": 22514.65,
                    "chartPreviousClose": {"raw": 22400.0, "fmt": "22,400.00"},
                    "regularMarketDayHigh": 22550.1,
                    "regularMarketDayLow": {},
                    "fiftyTwoWeekHigh": 22794.7,
                    "regularMarketVolume": 0
                },
                "timestamp": [1709251200, 1709510400, 1709596800],
                "indicators": {"quote": [{"close": [22338.75, null, 22356.3]}]}
            }],
            "error": null
        }
    }"#;

    fn parse(json: &str) -> Result<YahooResult, ProviderError> {
        serde_json::from_str::<YahooChartResponse>(json).unwrap().into_result()
    }

    #[test]
    fn test_meta_maps_to_quote() {
        let quote = parse(CHART_JSON).unwrap().meta.into_quote();
        assert_eq!(quote.ticker, "^NSEI");
        assert_eq!(quote.display_name, "NIFTY 50");
        assert_eq!(quote.price, Some(22514.65));
        assert_eq!(quote.previous_close, Some(22400.0));
        assert_eq!(quote.day_low, None);
        assert_eq!(quote.volume, Some(0.0));
        assert_eq!(quote.exchange.as_deref(), Some("NSE"));
        assert_eq!(quote.quote_type.as_deref(), Some("INDEX"));
        let change = quote.absolute_change.unwrap();
        assert!((change - 114.65).abs() < 1e-9);
    }

    #[test]
    fn test_points_keep_missing_closes_for_later_filtering() {
        let points = parse(CHART_JSON).unwrap().into_points().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].close, Some(22338.75));
        assert_eq!(points[1].close, None);
        assert_eq!(points[0].date.to_string(), "2024-03-01");
    }

    #[test]
    fn test_not_found_error_payload() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        assert!(matches!(parse(json), Err(ProviderError::NotFound)));
    }

    #[test]
    fn test_other_error_payload() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Bad Request", "description": "Invalid input"}}}"#;
        match parse(json) {
            Err(ProviderError::BadResponse(msg)) => assert_eq!(msg, "Invalid input"),
            other => panic!("unexpected {:?}", other.map(|r| r.meta.symbol)),
        }
    }

    #[test]
    fn test_mismatched_arrays_are_rejected() {
        let json = r#"{"chart": {"result": [{
            "meta": {"symbol": "X"},
            "timestamp": [1709251200, 1709510400],
            "indicators": {"quote": [{"close": [1.0]}]}
        }], "error": null}}"#;
        assert!(matches!(
            parse(json).unwrap().into_points(),
            Err(ProviderError::Parse(_))
        ));
    }
}
