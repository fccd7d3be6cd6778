pub mod market_data_provider;
pub mod numeric;
pub mod yahoo;
pub mod limited_provider;
pub mod sentiment;
