use std::collections::HashMap;

use crate::models::{ClassifiedIndices, IndexCategory, IndexQuote, IndexTable, Quote};

/// Split quotes into domestic and global groups.
///
/// Output follows the table's declaration order. Quotes for tickers the
/// table does not know are ignored; table entries without a quote are skipped.
pub fn classify(table: &IndexTable, quotes: &HashMap<String, Quote>) -> ClassifiedIndices {
    let mut grouped = ClassifiedIndices::default();

    for descriptor in table.entries() {
        let Some(quote) = quotes.get(&descriptor.ticker) else { continue };

        let labelled = IndexQuote {
            symbol: descriptor.display_symbol.clone(),
            quote: quote.clone(),
        };

        match descriptor.category {
            IndexCategory::Domestic => grouped.domestic.push(labelled),
            IndexCategory::Global => grouped.global.push(labelled),
        }
    }

    grouped
}

/// Every known index with a quote, in table order, regardless of category.
pub fn flatten(table: &IndexTable, quotes: &HashMap<String, Quote>) -> Vec<IndexQuote> {
    table
        .entries()
        .iter()
        .filter_map(|d| {
            quotes.get(&d.ticker).map(|quote| IndexQuote {
                symbol: d.display_symbol.clone(),
                quote: quote.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexDescriptor;

    fn quotes(tickers: &[&str]) -> HashMap<String, Quote> {
        tickers
            .iter()
            .map(|t| {
                let mut q = Quote::empty(t);
                q.price = Some(1.0);
                (t.to_string(), q)
            })
            .collect()
    }

    #[test]
    fn test_unknown_tickers_are_excluded() {
        let table = IndexTable::standard();
        let grouped = classify(&table, &quotes(&["^NSEI", "RELIANCE.NS", "^GSPC", "BTC-USD"]));

        let all: Vec<&str> = grouped
            .domestic
            .iter()
            .chain(grouped.global.iter())
            .map(|iq| iq.quote.ticker.as_str())
            .collect();
        assert_eq!(all, vec!["^NSEI", "^GSPC"]);
    }

    #[test]
    fn test_table_order_not_map_order() {
        let table = IndexTable::standard();
        let grouped = classify(&table, &quotes(&["^CNXIT", "^BSESN", "^NSEI", "^DJI", "^GSPC"]));

        let domestic: Vec<&str> = grouped.domestic.iter().map(|iq| iq.symbol.as_str()).collect();
        let global: Vec<&str> = grouped.global.iter().map(|iq| iq.symbol.as_str()).collect();
        assert_eq!(domestic, vec!["NIFTY 50", "SENSEX", "NIFTY IT"]);
        assert_eq!(global, vec!["S&P 500", "Dow Jones Industrial Average"]);
    }

    #[test]
    fn test_custom_table() {
        let table = IndexTable::new(vec![IndexDescriptor {
            display_symbol: "Only".to_string(),
            ticker: "X".to_string(),
            category: IndexCategory::Global,
        }]);
        let grouped = classify(&table, &quotes(&["X", "^NSEI"]));
        assert!(grouped.domestic.is_empty());
        assert_eq!(grouped.global.len(), 1);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let table = IndexTable::standard();
        let input = quotes(&["^NSEI", "^FTSE", "^N225", "^NSEBANK", "UNKNOWN"]);
        let first = serde_json::to_vec(&classify(&table, &input)).unwrap();
        let second = serde_json::to_vec(&classify(&table, &input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_flatten_keeps_table_order() {
        let table = IndexTable::standard();
        let flat = flatten(&table, &quotes(&["^GSPC", "^NSEI"]));
        let tickers: Vec<&str> = flat.iter().map(|iq| iq.quote.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["^NSEI", "^GSPC"]);
    }
}
