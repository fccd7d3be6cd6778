use sqlx::PgPool;

use crate::db;
use crate::errors::AppError;
use crate::models::IpoListing;

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<IpoListing>, AppError> {
    let listings = db::ipo_queries::fetch_all(pool).await?;
    Ok(listings)
}
