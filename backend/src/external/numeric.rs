use serde::Deserialize;

/// Numeric field as the provider sends it: a bare number in some payloads,
/// a `{"raw": .., "fmt": ".."}` wrapper in others, `{}` when empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderNumber {
    Bare(f64),
    Wrapped {
        #[serde(default)]
        raw: Option<f64>,
    },
}

impl ProviderNumber {
    pub fn value(&self) -> Option<f64> {
        match self {
            ProviderNumber::Bare(v) => Some(*v),
            ProviderNumber::Wrapped { raw, .. } => *raw,
        }
        .filter(|v| v.is_finite())
    }
}

/// Single adapter between provider payloads and plain `Option<f64>`.
pub fn normalize(field: Option<&ProviderNumber>) -> Option<f64> {
    field.and_then(ProviderNumber::value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        regular_market_price: Option<ProviderNumber>,
    }

    fn price_of(json: &str) -> Option<f64> {
        let payload: Payload = serde_json::from_str(json).unwrap();
        normalize(payload.regular_market_price.as_ref())
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(price_of(r#"{"regularMarketPrice": 22514.65}"#), Some(22514.65));
    }

    #[test]
    fn test_wrapped_number() {
        assert_eq!(
            price_of(r#"{"regularMarketPrice": {"raw": 22514.65, "fmt": "22,514.65"}}"#),
            Some(22514.65)
        );
    }

    #[test]
    fn test_missing_shapes_are_none() {
        assert_eq!(price_of(r#"{}"#), None);
        assert_eq!(price_of(r#"{"regularMarketPrice": null}"#), None);
        assert_eq!(price_of(r#"{"regularMarketPrice": {}}"#), None);
        assert_eq!(price_of(r#"{"regularMarketPrice": {"raw": null, "fmt": null}}"#), None);
    }

    #[test]
    fn test_integer_volume() {
        let volume: ProviderNumber = serde_json::from_str("184532100").unwrap();
        assert_eq!(volume.value(), Some(184532100.0));
    }
}
