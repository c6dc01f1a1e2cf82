use crate::error::{EngineError, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use shared::models::{CandleBar, SymbolSeries};
use shared::utils::{parse_number, parse_timestamp};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{clean_bars, SeriesSource};

/// Reads `<dir>/<SYMBOL>.csv` files for offline runs.
pub struct CsvSeriesSource {
    dir: PathBuf,
}

impl CsvSeriesSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    // "EUR/USD" -> "EUR_USD.csv"
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.replace('/', "_")))
    }

    // CSV Header: datetime,open,high,low,close
    // Example Row: 2024-05-01,169.58,172.71,169.11,169.30
    pub fn load_bars_from_csv(path: &Path) -> Result<Vec<CandleBar>> {
        let file = File::open(path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut bars = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let datetime_str = Self::required_field(&record, &headers, "datetime", line)?;
            let timestamp = parse_timestamp(datetime_str)
                .map_err(|e| EngineError::MarketDataError(format!("Error parsing 'datetime' at line {}: {}", line, e)))?;

            bars.push(CandleBar {
                timestamp,
                open: Self::price_field(&record, &headers, "open", line)?,
                high: Self::price_field(&record, &headers, "high", line)?,
                low: Self::price_field(&record, &headers, "low", line)?,
                close: Self::price_field(&record, &headers, "close", line)?,
            });
        }
        Ok(clean_bars(bars))
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
            .ok_or_else(|| EngineError::MarketDataError(format!("Missing '{}' field in CSV record at line {}", name, line)))
    }

    fn price_field(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        let raw = Self::required_field(record, headers, name, line)?;
        parse_number(raw).map_err(|e| EngineError::MarketDataError(format!("Error parsing '{}' at line {}: {}", name, line, e)))
    }
}

#[async_trait]
impl SeriesSource for CsvSeriesSource {
    async fn fetch_series(&self, symbol: &str) -> Result<SymbolSeries> {
        let path = self.path_for(symbol);
        tracing::debug!(symbol = %symbol, path = %path.display(), "Loading series from CSV");
        // Blocking file IO stays off the async workers.
        let bars = tokio::task::spawn_blocking(move || Self::load_bars_from_csv(&path))
            .await
            .map_err(|e| EngineError::MarketDataError(format!("CSV loader task failed: {}", e)))??;
        Ok(SymbolSeries::new(symbol, bars))
    }
}
