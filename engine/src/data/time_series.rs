// HTTP client for the OHLC time-series API
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::models::{CandleBar, SymbolSeries};
use shared::utils::parse_timestamp;
use std::time::Duration;

use super::{clean_bars, Numeric, SeriesSource};
use crate::config::settings::MarketDataSettings;
use crate::error::{EngineError, Result};

pub struct TimeSeriesClient {
    client: Client,
    base_url: String,
    api_key: String,
    interval: String,
    output_size: u32,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    values: Vec<TimeSeriesValue>,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesValue {
    datetime: String,
    open: Numeric,
    high: Numeric,
    low: Numeric,
    close: Numeric,
}

impl TimeSeriesValue {
    // Rows with an unparseable field are skipped, like rows with non-positive prices.
    fn to_bar(&self) -> Option<CandleBar> {
        Some(CandleBar {
            timestamp: parse_timestamp(&self.datetime).ok()?,
            open: self.open.value()?,
            high: self.high.value()?,
            low: self.low.value()?,
            close: self.close.value()?,
        })
    }
}

impl TimeSeriesClient {
    pub fn new(settings: &MarketDataSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            interval: settings.interval.clone(),
            output_size: settings.output_size,
        })
    }
}

/// Parses the `{ status, values: [{datetime, open, high, low, close}] }` envelope.
///
/// The API lists newest first; the returned series is ascending.
pub fn parse_time_series(symbol: &str, body: &str) -> Result<SymbolSeries> {
    let response: TimeSeriesResponse = serde_json::from_str(body)?;

    if response.status.as_deref() == Some("error") {
        let message = response.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(EngineError::UpstreamError(format!("time series for '{}': {}", symbol, message)));
    }

    let total = response.values.len();
    let bars: Vec<CandleBar> = response.values.iter().filter_map(TimeSeriesValue::to_bar).collect();
    if bars.len() < total {
        tracing::debug!(symbol = %symbol, skipped = total - bars.len(), "Skipped unparseable time series rows");
    }
    Ok(SymbolSeries::new(symbol, clean_bars(bars)))
}

#[async_trait]
impl SeriesSource for TimeSeriesClient {
    async fn fetch_series(&self, symbol: &str) -> Result<SymbolSeries> {
        let url = format!("{}/time_series", self.base_url);
        let output_size = self.output_size.to_string();
        let query = [
            ("symbol", symbol),
            ("interval", self.interval.as_str()),
            ("outputsize", output_size.as_str()),
            ("apikey", self.api_key.as_str()),
        ];

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(EngineError::UpstreamError(format!("time series HTTP {}: {}", status, error_msg)));
        }

        let body = response.text().await?;
        let series = parse_time_series(symbol, &body)?;
        tracing::debug!(symbol = %symbol, bars = series.bars.len(), "Fetched time series");
        Ok(series)
    }
}
