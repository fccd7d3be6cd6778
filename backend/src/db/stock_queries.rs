use sqlx::PgPool;

use crate::models::StockListing;

const LISTING_COLUMNS: &str =
    "security_code, issuer_name, security_id, security_name, bse_ticker, nse_ticker";

/// Case-insensitive substring match over names, id and tickers.
pub async fn search(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<StockListing>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(query));
    sqlx::query_as::<_, StockListing>(&format!(
        "SELECT {LISTING_COLUMNS}
           FROM listed_companies
          WHERE issuer_name ILIKE $1
             OR security_name ILIKE $1
             OR security_id ILIKE $1
             OR nse_ticker ILIKE $1
             OR bse_ticker ILIKE $1
          ORDER BY issuer_name
          LIMIT $2"
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn fetch_by_ticker(pool: &PgPool, ticker: &str) -> Result<Option<StockListing>, sqlx::Error> {
    sqlx::query_as::<_, StockListing>(&format!(
        "SELECT {LISTING_COLUMNS}
           FROM listed_companies
          WHERE UPPER(nse_ticker) = UPPER($1)
             OR UPPER(bse_ticker) = UPPER($1)
             OR UPPER(security_id) = UPPER($1)
          ORDER BY nse_ticker NULLS LAST
          LIMIT 1"
    ))
    .bind(ticker)
    .fetch_optional(pool)
    .await
}

pub async fn upsert(pool: &PgPool, listing: &StockListing) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO listed_companies
            (security_code, issuer_name, security_id, security_name, bse_ticker, nse_ticker)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (security_code) DO UPDATE
            SET issuer_name = EXCLUDED.issuer_name,
                security_id = EXCLUDED.security_id,
                security_name = EXCLUDED.security_name,
                bse_ticker = EXCLUDED.bse_ticker,
                nse_ticker = EXCLUDED.nse_ticker",
    )
    .bind(&listing.security_code)
    .bind(&listing.issuer_name)
    .bind(&listing.security_id)
    .bind(&listing.security_name)
    .bind(&listing.bse_ticker)
    .bind(&listing.nse_ticker)
    .execute(pool)
    .await?;
    Ok(())
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
