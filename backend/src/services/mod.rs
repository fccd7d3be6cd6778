pub mod history_service;
pub mod index_classifier;
pub mod indicators;
pub mod ipo_service;
pub mod market_cache;
pub mod market_service;
pub mod portfolio_service;
pub mod quote_service;
pub mod rate_limiter;
pub mod stock_import_service;
pub mod stock_service;
