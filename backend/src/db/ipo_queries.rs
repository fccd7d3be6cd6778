use sqlx::PgPool;

use crate::models::IpoListing;

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<IpoListing>, sqlx::Error> {
    sqlx::query_as::<_, IpoListing>(
        "SELECT company_name, premium, open_date, close_date, price, lot_size,
                allotment_date, listing_date
           FROM ipo_listings
          ORDER BY open_date DESC",
    )
    .fetch_all(pool)
    .await
}
