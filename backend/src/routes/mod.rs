use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

pub mod extract;
pub mod health;
pub mod ipo;
pub mod market;
pub mod portfolio;
pub mod stocks;

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9^.\-=&]{1,32}$").expect("ticker pattern is valid"))
}

pub(crate) fn is_valid_ticker(ticker: &str) -> bool {
    ticker_pattern().is_match(ticker)
}

/// Reject tickers outside the provider symbology before any outbound call.
pub(crate) fn validate_ticker(ticker: &str) -> Result<(), AppError> {
    if is_valid_ticker(ticker) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid ticker '{}'", ticker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ticker() {
        for ok in ["^NSEI", "RELIANCE.NS", "M&M.NS", "BTC-USD", "GC=F", "000001.SS"] {
            assert!(validate_ticker(ok).is_ok(), "{}", ok);
        }
        let too_long = "X".repeat(33);
        for bad in ["", "TCS NS", "../etc", "a;b", too_long.as_str()] {
            assert!(validate_ticker(bad).is_err(), "{}", bad);
        }
    }
}
