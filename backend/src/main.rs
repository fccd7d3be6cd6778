use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use findash_backend::app;
use findash_backend::config::AppConfig;
use findash_backend::external::limited_provider::LimitedProvider;
use findash_backend::external::market_data_provider::MarketDataProvider;
use findash_backend::external::sentiment::SentimentClient;
use findash_backend::external::yahoo::YahooProvider;
use findash_backend::logging::{init_logging, LoggingConfig};
use findash_backend::models::IndexTable;
use findash_backend::services::market_service::MarketService;
use findash_backend::services::rate_limiter::RateLimiter;
use findash_backend::state::AppState;

const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    let logging_config = LoggingConfig::from_env();
    logging_config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid logging configuration: {}", e))?;
    init_logging(logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!(
        "📊 Using Yahoo chart provider at {} ({} concurrent, {} req/min)",
        config.yahoo_base_url,
        config.provider_max_concurrent,
        config.provider_requests_per_minute
    );
    let yahoo: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new(config.yahoo_base_url.clone()));
    let provider: Arc<dyn MarketDataProvider> = Arc::new(LimitedProvider::new(
        yahoo,
        RateLimiter::new(config.provider_max_concurrent, config.provider_requests_per_minute),
    ));

    let market = Arc::new(MarketService::new(
        provider,
        Arc::new(IndexTable::standard()),
        Duration::from_secs(config.market_cache_ttl_secs),
    ));

    let sweeper = market.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.cleanup_caches();
        }
    });

    if config.sentiment_service_url.is_none() {
        tracing::warn!("SENTIMENT_SERVICE_URL not set; /market/sentiment-news will answer 502");
    }

    let state = AppState {
        pool,
        market,
        sentiment: SentimentClient::new(config.sentiment_service_url.clone()),
    };

    let cors_origin = HeaderValue::from_str(&config.cors_allowed_origin)
        .with_context(|| format!("Invalid CORS_ALLOWED_ORIGIN: {}", config.cors_allowed_origin))?;
    let app = app::create_app(state, cors_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Findash backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
