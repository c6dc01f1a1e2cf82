// Tradable asset list and the user's bounded selection
use shared::models::{Asset, AssetKind};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        use AssetKind::*;
        let entries = [
            ("AAPL", "Apple Inc.", Stock),
            ("MSFT", "Microsoft Corporation", Stock),
            ("NVDA", "NVIDIA Corporation", Stock),
            ("TSLA", "Tesla, Inc.", Stock),
            ("AMZN", "Amazon.com, Inc.", Stock),
            ("GOOGL", "Alphabet Inc.", Stock),
            ("META", "Meta Platforms, Inc.", Stock),
            ("AMD", "Advanced Micro Devices, Inc.", Stock),
            ("BTC/USD", "Bitcoin", Crypto),
            ("ETH/USD", "Ethereum", Crypto),
            ("SOL/USD", "Solana", Crypto),
            ("XRP/USD", "XRP", Crypto),
            ("SPY", "SPDR S&P 500 ETF Trust", Etf),
            ("QQQ", "Invesco QQQ Trust", Etf),
            ("VTI", "Vanguard Total Stock Market ETF", Etf),
            ("ARKK", "ARK Innovation ETF", Etf),
            ("EUR/USD", "Euro / US Dollar", Forex),
            ("GBP/USD", "British Pound / US Dollar", Forex),
            ("USD/JPY", "US Dollar / Japanese Yen", Forex),
            ("AUD/USD", "Australian Dollar / US Dollar", Forex),
        ];
        Self::new(entries.iter().map(|(symbol, name, kind)| Asset::new(symbol, name, *kind)).collect())
    }
}

impl AssetCatalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, symbol: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Assets of `kind` (any kind when `None`) whose symbol or name contains `query`, case-insensitively.
    pub fn filter(&self, kind: Option<AssetKind>, query: &str) -> Vec<&Asset> {
        let needle = query.trim().to_lowercase();
        self.assets
            .iter()
            .filter(|a| kind.map_or(true, |k| a.kind == k))
            .filter(|a| {
                needle.is_empty() || a.symbol.to_lowercase().contains(&needle) || a.name.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// At most `max_assets` distinct assets, in the order they were picked.
#[derive(Debug, Clone)]
pub struct AssetSelection {
    max_assets: usize,
    assets: Vec<Asset>,
}

impl AssetSelection {
    pub fn new(max_assets: usize) -> Self {
        Self { max_assets, assets: Vec::new() }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.assets.iter().any(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Adding an asset that is already selected is a no-op.
    pub fn add(&mut self, asset: Asset) -> Result<()> {
        if self.contains(&asset.symbol) {
            return Ok(());
        }
        if self.assets.len() >= self.max_assets {
            return Err(EngineError::SelectionError(format!(
                "cannot select '{}': at most {} assets may be selected",
                asset.symbol, self.max_assets
            )));
        }
        self.assets.push(asset);
        Ok(())
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| !a.symbol.eq_ignore_ascii_case(symbol));
        self.assets.len() < before
    }

    /// Removes the asset if selected, otherwise adds it. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, asset: Asset) -> Result<bool> {
        if self.remove(&asset.symbol) {
            return Ok(false);
        }
        self.add(asset)?;
        Ok(true)
    }

    /// Resolves symbols against the catalog. Unknown symbols are an error.
    pub fn from_symbols(catalog: &AssetCatalog, symbols: &[String], max_assets: usize) -> Result<Self> {
        let mut selection = Self::new(max_assets);
        for symbol in symbols {
            let asset = catalog
                .get(symbol)
                .cloned()
                .ok_or_else(|| EngineError::SelectionError(format!("unknown asset '{}'", symbol)))?;
            selection.add(asset)?;
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_kind() {
        let catalog = AssetCatalog::default();
        let forex = catalog.filter(Some(AssetKind::Forex), "");
        assert_eq!(forex.len(), 4);
        assert!(forex.iter().all(|a| a.kind == AssetKind::Forex));
    }

    #[test]
    fn test_filter_by_query_matches_symbol_or_name() {
        let catalog = AssetCatalog::default();
        let by_name: Vec<&str> = catalog.filter(None, "bitcoin").iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(by_name, vec!["BTC/USD"]);

        let by_symbol = catalog.filter(Some(AssetKind::Crypto), "usd");
        assert_eq!(by_symbol.len(), 4);

        assert!(catalog.filter(Some(AssetKind::Etf), "bitcoin").is_empty());
    }

    #[test]
    fn test_get_case_insensitive() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.get("eth/usd").unwrap().name, "Ethereum");
        assert!(catalog.get("DOGE").is_none());
    }

    #[test]
    fn test_selection_limit() {
        let catalog = AssetCatalog::default();
        let mut selection = AssetSelection::new(5);
        for asset in catalog.assets().iter().take(5) {
            selection.add(asset.clone()).unwrap();
        }
        let err = selection.add(catalog.get("SPY").unwrap().clone()).unwrap_err();
        assert!(matches!(err, EngineError::SelectionError(_)));
        assert_eq!(selection.len(), 5);
    }

    #[test]
    fn test_selection_ignores_duplicates() {
        let catalog = AssetCatalog::default();
        let mut selection = AssetSelection::new(2);
        let aapl = catalog.get("AAPL").unwrap().clone();
        selection.add(aapl.clone()).unwrap();
        selection.add(aapl).unwrap();
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let catalog = AssetCatalog::default();
        let mut selection = AssetSelection::new(1);
        let btc = catalog.get("BTC/USD").unwrap().clone();

        assert!(selection.toggle(btc.clone()).unwrap());
        assert!(selection.contains("btc/usd"));
        assert!(!selection.toggle(btc).unwrap());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_from_symbols() {
        let catalog = AssetCatalog::default();
        let symbols = vec!["aapl".to_string(), "EUR/USD".to_string()];
        let selection = AssetSelection::from_symbols(&catalog, &symbols, 5).unwrap();
        assert_eq!(selection.assets()[0].symbol, "AAPL");
        assert_eq!(selection.assets()[1].kind, AssetKind::Forex);

        let err = AssetSelection::from_symbols(&catalog, &["DOGE".to_string()], 5).unwrap_err();
        assert!(err.to_string().contains("unknown asset 'DOGE'"));
    }
}
