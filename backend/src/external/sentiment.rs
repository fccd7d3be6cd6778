use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};

use crate::errors::AppError;

const DEFAULT_DAYS_BACK: u32 = 3;
const DEFAULT_MAX_ARTICLES: u32 = 10;

/// News sentiment lookup, forwarded to the sentiment analyser service.
#[derive(Debug, Clone)]
pub struct SentimentQuery {
    pub ticker_or_company: String,
    pub company_name: Option<String>,
    pub days_back: Option<u32>,
    pub max_articles: Option<u32>,
}

impl SentimentQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("ticker_or_company", self.ticker_or_company.clone()),
            ("days_back", self.days_back.unwrap_or(DEFAULT_DAYS_BACK).to_string()),
            ("max_articles", self.max_articles.unwrap_or(DEFAULT_MAX_ARTICLES).to_string()),
        ];
        if let Some(name) = &self.company_name {
            pairs.push(("company_name", name.clone()));
        }
        pairs
    }
}

/// Thin client for the sentiment analyser. The upstream JSON body is returned
/// untouched.
#[derive(Clone)]
pub struct SentimentClient {
    client: Client,
    base_url: Option<String>,
}

impl SentimentClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub async fn analyze(&self, query: &SentimentQuery) -> Result<Value, AppError> {
        let base_url = self.base_url.as_deref().ok_or_else(|| {
            AppError::External("Sentiment service is not configured".to_string())
        })?;

        info!("Fetching news sentiment for {}", query.ticker_or_company);

        let response = self
            .client
            .get(format!("{}/analyze-sentiment", base_url))
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| {
                error!("Sentiment service request failed: {}", e);
                AppError::External(format!("Sentiment service error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Sentiment service error {}: {}", status, error_text);
            return Err(AppError::External(format!(
                "Sentiment service returned error {}: {}",
                status, error_text
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            error!("Failed to parse sentiment response: {}", e);
            AppError::External(format!("Failed to parse sentiment response: {}", e))
        })
    }
}
