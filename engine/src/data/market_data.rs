// In-memory series store, used for preloaded data and as a deterministic source in tests
use async_trait::async_trait;
use shared::models::{CandleBar, SymbolSeries};
use std::collections::HashMap;
use std::sync::RwLock;

use super::{clean_bars, SeriesSource};
use crate::error::Result;

#[derive(Default)]
pub struct MemorySeriesSource {
    data: RwLock<HashMap<String, Vec<CandleBar>>>,
}

impl MemorySeriesSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(series: impl IntoIterator<Item = SymbolSeries>) -> Self {
        let source = Self::new();
        for s in series {
            source.add_bars(&s.symbol, s.bars);
        }
        source
    }

    /// Merges bars into the symbol's series, keeping it sorted and deduplicated.
    pub fn add_bars(&self, symbol: &str, new_bars: Vec<CandleBar>) {
        let mut data = self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let bars = data.entry(symbol.to_string()).or_default();
        bars.extend(new_bars);
        let merged = clean_bars(std::mem::take(bars));
        *bars = merged;
    }
}

#[async_trait]
impl SeriesSource for MemorySeriesSource {
    // Unknown symbols yield an empty series rather than an error.
    async fn fetch_series(&self, symbol: &str) -> Result<SymbolSeries> {
        let data = self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let bars = data.get(symbol).cloned().unwrap_or_default();
        Ok(SymbolSeries::new(symbol, bars))
    }
}
