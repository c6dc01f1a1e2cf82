//! Top movers: rank candidate symbols by the absolute percent change of their
//! latest bar.
//!
//! Fetches fan out concurrently and are joined before ranking. A failed or
//! empty fetch only removes that symbol from the ranking; if no candidate has
//! data the fixed fallback set is fetched and returned instead. Selection
//! never fails.
use futures::future::join_all;
use shared::models::SymbolSeries;

use crate::data::SeriesSource;

pub const FALLBACK_SYMBOLS: [&str; 3] = ["AAPL", "NVDA", "TSLA"];
pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone)]
pub struct TopMoversSelector {
    top_n: usize,
    fallback: Vec<String>,
}

impl Default for TopMoversSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, FALLBACK_SYMBOLS.iter().map(|s| s.to_string()).collect())
    }
}

impl TopMoversSelector {
    pub fn new(top_n: usize, fallback: Vec<String>) -> Self {
        Self { top_n, fallback }
    }

    pub async fn select<S>(&self, candidates: &[String], source: &S) -> Vec<SymbolSeries>
    where
        S: SeriesSource + ?Sized,
    {
        let fetched = fetch_all(candidates, source).await;
        let ranked = rank_movers(fetched, self.top_n);
        if !ranked.is_empty() {
            tracing::info!(
                candidates = candidates.len(),
                selected = ?ranked.iter().map(|s| s.symbol.as_str()).collect::<Vec<_>>(),
                "Selected top movers"
            );
            return ranked;
        }

        tracing::warn!(candidates = candidates.len(), fallback = ?self.fallback, "No candidate returned data, using fallback set");
        fetch_all(&self.fallback, source).await
    }
}

/// Top movers with the default size and fallback set.
pub async fn select_top_movers<S>(candidates: &[String], source: &S) -> Vec<SymbolSeries>
where
    S: SeriesSource + ?Sized,
{
    TopMoversSelector::default().select(candidates, source).await
}

// One series per symbol, in input order. Errors become empty series.
async fn fetch_all<S>(symbols: &[String], source: &S) -> Vec<SymbolSeries>
where
    S: SeriesSource + ?Sized,
{
    let fetches = symbols.iter().map(|symbol| async move {
        match source.fetch_series(symbol).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Series fetch failed, excluding symbol");
                SymbolSeries::empty(symbol.as_str())
            }
        }
    });
    join_all(fetches).await
}

/// Ranks non-empty series by |change %| descending. The sort is stable, so ties keep input order.
pub fn rank_movers(series: Vec<SymbolSeries>, top_n: usize) -> Vec<SymbolSeries> {
    let mut with_data: Vec<(f64, SymbolSeries)> = series
        .into_iter()
        .filter_map(|s| s.change_pct().map(|pct| (pct.abs(), s)))
        .collect();
    with_data.sort_by(|a, b| b.0.total_cmp(&a.0));
    with_data.into_iter().take(top_n).map(|(_, s)| s).collect()
}
