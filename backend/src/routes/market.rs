use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::sentiment::SentimentQuery;
use crate::models::{
    BatchQuoteParams, HistoryParams, IndexQuote, InstrumentDetail, Quote, RangeSpec,
    SentimentParams,
};
use crate::routes::extract::{ApiPath, ApiQuery};
use crate::routes::{is_valid_ticker, validate_ticker};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all-indices", get(get_all_indices))
        .route("/live", get(get_live_indices))
        .route("/indices/:ticker", get(get_index_detail))
        .route("/stock/history/:ticker", get(get_stock_history))
        .route("/stocks/data", get(get_stocks_data))
        .route("/sentiment-news", get(get_sentiment_news))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllIndicesResponse {
    success: bool,
    indian_indices: Vec<IndexQuote>,
    global_indices: Vec<IndexQuote>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StocksDataResponse {
    success: bool,
    stocks_data: Vec<Quote>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<String>,
}

fn parse_range(params: &HistoryParams) -> Result<RangeSpec, AppError> {
    match params.range.as_deref().map(str::trim) {
        None | Some("") => Ok(RangeSpec::default()),
        Some(raw) => raw.parse::<RangeSpec>().map_err(AppError::Validation),
    }
}

pub async fn get_all_indices(
    State(state): State<AppState>,
) -> Result<Json<AllIndicesResponse>, AppError> {
    info!("GET /market/all-indices - Fetching all indices");
    let snapshot = state.market.all_indices().await;
    Ok(Json(AllIndicesResponse {
        success: true,
        indian_indices: snapshot.indices.domestic,
        global_indices: snapshot.indices.global,
        dropped: snapshot.dropped,
    }))
}

pub async fn get_live_indices(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<IndexQuote>>>, AppError> {
    info!("GET /market/live - Fetching live index quotes");
    let (data, dropped) = state.market.live_indices().await;
    Ok(Json(DataResponse {
        success: true,
        data,
        dropped,
    }))
}

async fn instrument_detail(
    state: &AppState,
    ticker: &str,
    params: &HistoryParams,
) -> Result<Json<DataResponse<InstrumentDetail>>, AppError> {
    validate_ticker(ticker)?;
    let range = parse_range(params)?;
    if params.window == Some(0) {
        return Err(AppError::Validation("window must be at least 1".into()));
    }

    let data = state
        .market
        .instrument_detail(ticker, range, params.window)
        .await
        .map_err(|e| {
            error!("Failed to build detail for {} ({}): {}", ticker, range, e);
            e
        })?;
    Ok(Json(DataResponse {
        success: true,
        data,
        dropped: Vec::new(),
    }))
}

pub async fn get_index_detail(
    State(state): State<AppState>,
    ApiPath(ticker): ApiPath<String>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> Result<Json<DataResponse<InstrumentDetail>>, AppError> {
    info!("GET /market/indices/{} - Fetching index detail", ticker);
    instrument_detail(&state, &ticker, &params).await
}

pub async fn get_stock_history(
    State(state): State<AppState>,
    ApiPath(ticker): ApiPath<String>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> Result<Json<DataResponse<InstrumentDetail>>, AppError> {
    info!("GET /market/stock/history/{} - Fetching stock history", ticker);
    instrument_detail(&state, &ticker, &params).await
}

pub async fn get_stocks_data(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BatchQuoteParams>,
) -> Result<Json<StocksDataResponse>, AppError> {
    let (tickers, mut dropped): (Vec<String>, Vec<String>) =
        params.ticker_list().into_iter().partition(|t| is_valid_ticker(t));
    info!("GET /market/stocks/data - Fetching {} quotes", tickers.len());
    if !dropped.is_empty() {
        warn!("Skipping malformed tickers {:?}", dropped);
    }

    let result = state.market.batch_quotes(&tickers).await;
    dropped.extend(result.dropped);
    Ok(Json(StocksDataResponse {
        success: true,
        stocks_data: result.quotes,
        dropped,
    }))
}

pub async fn get_sentiment_news(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SentimentParams>,
) -> Result<Json<Value>, AppError> {
    let ticker_or_company = params
        .ticker_or_company
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("ticker_or_company is required".into()))?;
    info!("GET /market/sentiment-news - {}", ticker_or_company);

    let query = SentimentQuery {
        ticker_or_company,
        company_name: params.company_name,
        days_back: params.days_back,
        max_articles: params.max_articles,
    };
    let body = state.sentiment.analyze(&query).await?;
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(range: Option<&str>) -> HistoryParams {
        HistoryParams {
            range: range.map(str::to_string),
            window: None,
        }
    }

    #[test]
    fn test_missing_range_defaults_to_one_year() {
        assert_eq!(parse_range(&params(None)).unwrap(), RangeSpec::OneYear);
        assert_eq!(parse_range(&params(Some(""))).unwrap(), RangeSpec::OneYear);
        assert_eq!(parse_range(&params(Some("3mo"))).unwrap(), RangeSpec::ThreeMonths);
    }

    #[test]
    fn test_unknown_range_is_rejected() {
        assert!(matches!(
            parse_range(&params(Some("2w"))),
            Err(AppError::Validation(_))
        ));
    }
}
