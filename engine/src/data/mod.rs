//! Market data and fundamentals sources.
//!
//! [`SeriesSource`] and [`FundamentalsSource`] are the seams the core
//! computations are written against; the HTTP clients, the CSV reader and the
//! in-memory store all implement them, and tests substitute their own.
pub mod csv_parser;
pub mod fundamentals;
pub mod market_data;
pub mod time_series;

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{CandleBar, FundamentalMetrics, SymbolSeries};
use shared::utils::parse_number;

pub use csv_parser::CsvSeriesSource;
pub use fundamentals::OverviewClient;
pub use market_data::MemorySeriesSource;
pub use time_series::TimeSeriesClient;

#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Bars for `symbol`, chronological ascending, all prices positive.
    async fn fetch_series(&self, symbol: &str) -> Result<SymbolSeries>;
}

#[async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn fetch_metrics(&self, symbol: &str) -> Result<FundamentalMetrics>;
}

/// Drops bars with a non-positive price, then sorts ascending and removes duplicate timestamps.
pub fn clean_bars(mut bars: Vec<CandleBar>) -> Vec<CandleBar> {
    let before = bars.len();
    bars.retain(CandleBar::has_positive_prices);
    if bars.len() < before {
        tracing::debug!(discarded = before - bars.len(), "Discarded bars with non-positive prices");
    }
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    bars
}

/// A JSON number that upstream APIs send either as a number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub(crate) fn value(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) if n.is_finite() => Some(*n),
            Numeric::Number(_) => None,
            Numeric::Text(s) => parse_number(s).ok(),
        }
    }
}
