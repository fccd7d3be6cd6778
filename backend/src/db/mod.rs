pub mod portfolio_queries;
pub mod stock_queries;
pub mod ipo_queries;
