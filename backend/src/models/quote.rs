use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Point-in-time snapshot for one ticker. Missing numbers stay `None` and
// serialize as `null`; they are never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    pub display_name: String,
    pub price: Option<f64>,
    pub absolute_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub volume: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub market_state: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub quote_type: Option<String>,
}

impl Quote {
    /// A quote carrying only the ticker; every field missing.
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            display_name: ticker.to_string(),
            price: None,
            absolute_change: None,
            percent_change: None,
            day_high: None,
            day_low: None,
            previous_close: None,
            open: None,
            volume: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            market_state: None,
            exchange: None,
            currency: None,
            quote_type: None,
        }
    }

    /// Fill change fields from price and previous close when the provider
    /// did not report them.
    pub fn with_derived_change(mut self) -> Self {
        if let (Some(price), Some(prev)) = (self.price, self.previous_close) {
            if self.absolute_change.is_none() {
                self.absolute_change = Some(price - prev);
            }
            if self.percent_change.is_none() && prev != 0.0 {
                self.percent_change = Some((price - prev) / prev * 100.0);
            }
        }
        self
    }
}

// Daily close for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_numbers_serialize_as_null() {
        let json = serde_json::to_value(Quote::empty("^NSEI")).unwrap();
        assert_eq!(json["ticker"], "^NSEI");
        assert!(json["price"].is_null());
        assert!(json["fiftyTwoWeekHigh"].is_null());
    }

    #[test]
    fn test_derived_change_from_previous_close() {
        let mut quote = Quote::empty("AAA");
        quote.price = Some(110.0);
        quote.previous_close = Some(100.0);
        let quote = quote.with_derived_change();
        assert_eq!(quote.absolute_change, Some(10.0));
        assert_eq!(quote.percent_change, Some(10.0));
    }

    #[test]
    fn test_derived_change_keeps_reported_values() {
        let mut quote = Quote::empty("AAA");
        quote.price = Some(110.0);
        quote.previous_close = Some(0.0);
        quote.absolute_change = Some(1.5);
        let quote = quote.with_derived_change();
        assert_eq!(quote.absolute_change, Some(1.5));
        assert_eq!(quote.percent_change, None);
    }
}
