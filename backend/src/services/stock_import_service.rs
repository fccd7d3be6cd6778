use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db::stock_queries;
use crate::models::{StockImportResult, StockListing};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Security Code")]
    security_code: String,
    #[serde(rename = "Issuer Name")]
    issuer_name: String,
    #[serde(rename = "Security Id")]
    security_id: String,
    #[serde(rename = "Security Name")]
    security_name: String,
    #[serde(rename = "Yahoo Finance Ticker (BSE)", default)]
    bse_ticker: String,
    #[serde(rename = "Yahoo Finance Ticker (NSE)", default)]
    nse_ticker: String,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn into_listing(row: CsvRow) -> Result<StockListing> {
    let security_code = row.security_code.trim().to_string();
    if security_code.is_empty() {
        anyhow::bail!("missing Security Code");
    }
    if row.issuer_name.trim().is_empty() {
        anyhow::bail!("missing Issuer Name for {}", security_code);
    }

    Ok(StockListing {
        issuer_name: row.issuer_name.trim().to_string(),
        security_id: row.security_id.trim().to_string(),
        security_name: row.security_name.trim().to_string(),
        bse_ticker: non_blank(row.bse_ticker),
        nse_ticker: non_blank(row.nse_ticker),
        security_code,
    })
}

/// Parse the listing export. Rows that fail to parse are reported by line
/// number and skipped.
pub fn parse_listings(content: &str) -> (Vec<StockListing>, Vec<String>) {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let mut listings = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let parsed = result
            .context("malformed row")
            .and_then(into_listing)
            .with_context(|| format!("line {}", line));

        match parsed {
            Ok(listing) => listings.push(listing),
            Err(e) => errors.push(format!("{:#}", e)),
        }
    }

    (listings, errors)
}

pub async fn import_listings(pool: &PgPool, content: &str) -> Result<StockImportResult> {
    let (listings, mut errors) = parse_listings(content);
    let mut imported = 0;

    for listing in &listings {
        match stock_queries::upsert(pool, listing)
            .await
            .with_context(|| format!("Failed to store {}", listing.security_code))
        {
            Ok(()) => imported += 1,
            Err(e) => {
                warn!("{:#}", e);
                errors.push(format!("{:#}", e));
            }
        }
    }

    info!("Imported {} listings ({} errors)", imported, errors.len());
    Ok(StockImportResult { imported, errors })
}
