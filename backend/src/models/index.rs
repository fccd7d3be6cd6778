use serde::{Deserialize, Serialize};

use crate::models::Quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexCategory {
    Domestic,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    pub display_symbol: String,
    pub ticker: String,
    pub category: IndexCategory,
}

/// Ordered, immutable set of known indices. Declaration order drives the
/// order of every grouped response.
#[derive(Debug, Clone)]
pub struct IndexTable {
    entries: Vec<IndexDescriptor>,
}

const DOMESTIC_INDICES: &[(&str, &str)] = &[
    ("NIFTY 50", "^NSEI"),
    ("SENSEX", "^BSESN"),
    ("NIFTY BANK", "^NSEBANK"),
    ("NIFTY IT", "^CNXIT"),
    ("NIFTY FMCG", "^CNXFMCG"),
    ("NIFTY PHARMA", "^CNXPHARMA"),
    ("NIFTY AUTO", "^CNXAUTO"),
    ("NIFTY METAL", "^CNXMETAL"),
    ("NIFTY ENERGY", "^CNXENERGY"),
    ("NIFTY REALTY", "^CNXREALTY"),
    ("NIFTY MEDIA", "^CNXMEDIA"),
    ("NIFTY PSE", "^CNXPSE"),
    ("NIFTY PSU BANK", "^CNXPSUBANK"),
    ("NIFTY CONSUMPTION", "^CNXCONSUM"),
    ("NIFTY INFRASTRUCTURE", "^CNXINFRA"),
];

const GLOBAL_INDICES: &[(&str, &str)] = &[
    ("S&P 500", "^GSPC"),
    ("Dow Jones Industrial Average", "^DJI"),
    ("Nasdaq Composite", "^IXIC"),
    ("Russell 2000", "^RUT"),
    ("FTSE 100", "^FTSE"),
    ("Nikkei 225", "^N225"),
    ("Hang Seng", "^HSI"),
    ("Shanghai Composite", "000001.SS"),
    ("DAX", "^GDAXI"),
    ("CAC 40", "^FCHI"),
    ("ASX 200", "^AXJO"),
    ("EURO STOXX 50", "^STOXX50E"),
];

impl IndexTable {
    pub fn new(entries: Vec<IndexDescriptor>) -> Self {
        Self { entries }
    }

    /// Indian sector/benchmark indices followed by global benchmarks.
    pub fn standard() -> Self {
        let domestic = DOMESTIC_INDICES
            .iter()
            .map(|(symbol, ticker)| descriptor(symbol, ticker, IndexCategory::Domestic));
        let global = GLOBAL_INDICES
            .iter()
            .map(|(symbol, ticker)| descriptor(symbol, ticker, IndexCategory::Global));

        Self::new(domestic.chain(global).collect())
    }

    pub fn entries(&self) -> &[IndexDescriptor] {
        &self.entries
    }

    pub fn tickers(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.ticker.clone()).collect()
    }
}

fn descriptor(symbol: &str, ticker: &str, category: IndexCategory) -> IndexDescriptor {
    IndexDescriptor {
        display_symbol: symbol.to_string(),
        ticker: ticker.to_string(),
        category,
    }
}

/// A quote labelled with its index display symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub symbol: String,
    #[serde(flatten)]
    pub quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClassifiedIndices {
    pub domestic: Vec<IndexQuote>,
    pub global: Vec<IndexQuote>,
}
