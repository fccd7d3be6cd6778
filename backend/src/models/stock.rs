use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Entry in the listed-companies reference table. The aliases accept the
// column names used by the exchange listing export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockListing {
    #[serde(alias = "Security Code")]
    pub security_code: String,
    #[serde(alias = "Issuer Name")]
    pub issuer_name: String,
    #[serde(alias = "Security Id")]
    pub security_id: String,
    #[serde(alias = "Security Name")]
    pub security_name: String,
    #[serde(default, alias = "Yahoo Finance Ticker (BSE)")]
    pub bse_ticker: Option<String>,
    #[serde(default, alias = "Yahoo Finance Ticker (NSE)")]
    pub nse_ticker: Option<String>,
}

impl StockListing {
    /// Ticker used for live quotes; NSE is preferred over BSE.
    pub fn quote_ticker(&self) -> Option<&str> {
        [self.nse_ticker.as_deref(), self.bse_ticker.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct StockSearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct StockImportResult {
    pub imported: usize,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(nse: Option<&str>, bse: Option<&str>) -> StockListing {
        StockListing {
            security_code: "500325".to_string(),
            issuer_name: "Reliance Industries Ltd".to_string(),
            security_id: "RELIANCE".to_string(),
            security_name: "RELIANCE INDUSTRIES LTD.".to_string(),
            bse_ticker: bse.map(str::to_string),
            nse_ticker: nse.map(str::to_string),
        }
    }

    #[test]
    fn test_quote_ticker_prefers_nse() {
        assert_eq!(
            listing(Some("RELIANCE.NS"), Some("RELIANCE.BO")).quote_ticker(),
            Some("RELIANCE.NS")
        );
        assert_eq!(listing(Some(" "), Some("RELIANCE.BO")).quote_ticker(), Some("RELIANCE.BO"));
        assert_eq!(listing(None, None).quote_ticker(), None);
    }

    #[test]
    fn test_accepts_export_column_names() {
        let json = r#"{
            "Security Code": "500325",
            "Issuer Name": "Reliance Industries Ltd",
            "Security Id": "RELIANCE",
            "Security Name": "RELIANCE INDUSTRIES LTD.",
            "Yahoo Finance Ticker (NSE)": "RELIANCE.NS"
        }"#;
        let parsed: StockListing = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.nse_ticker.as_deref(), Some("RELIANCE.NS"));
        assert_eq!(parsed.bse_ticker, None);
    }
}
