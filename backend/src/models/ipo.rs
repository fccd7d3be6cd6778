use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

// Upcoming or recent IPO as written by the listing scraper.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IpoListing {
    pub company_name: String,
    pub premium: Option<String>,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub price: Option<String>,
    pub lot_size: Option<String>,
    pub allotment_date: NaiveDate,
    pub listing_date: NaiveDate,
}
