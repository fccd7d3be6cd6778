mod quote;
mod range;
mod index;
mod market;
mod stock;
mod portfolio;
mod ipo;

pub use quote::{PricePoint, Quote};
pub use range::{DateRange, RangeSpec};
pub use index::{ClassifiedIndices, IndexCategory, IndexDescriptor, IndexQuote, IndexTable};
pub use market::{
    BatchQuoteParams, HistoryParams, HistorySeries, InstrumentDetail, MovingAverageSeries,
    QuoteBatch, SentimentParams,
};
pub use stock::{StockImportResult, StockListing, StockSearchParams};
pub use portfolio::{
    CreatePortfolioItem, HoldingValuation, PortfolioItem, PortfolioItemRow, PortfolioSummary,
    UpdatePortfolioItem,
};
pub use ipo::IpoListing;
