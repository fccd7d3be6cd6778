use std::sync::Arc;

use sqlx::PgPool;

use crate::external::sentiment::SentimentClient;
use crate::services::market_service::MarketService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market: Arc<MarketService>,
    pub sentiment: SentimentClient,
}
