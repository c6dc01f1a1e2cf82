// HTTP client for the company overview (fundamentals) API
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::models::FundamentalMetrics;
use std::time::Duration;

use super::{FundamentalsSource, Numeric};
use crate::config::settings::FundamentalsSettings;
use crate::error::{EngineError, Result};

pub struct OverviewClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct CompanyOverview {
    #[serde(rename = "PERatio")]
    pe_ratio: Option<Numeric>,
    #[serde(rename = "ForwardPE")]
    forward_pe: Option<Numeric>,
    #[serde(rename = "PEGRatio")]
    peg_ratio: Option<Numeric>,
    #[serde(rename = "DebtToEquityRatio")]
    debt_to_equity: Option<Numeric>,
    #[serde(rename = "ReturnOnEquityTTM")]
    return_on_equity: Option<Numeric>,
    #[serde(rename = "ProfitMargin")]
    profit_margin: Option<Numeric>,
    #[serde(rename = "QuarterlyRevenueGrowthYOY")]
    revenue_growth: Option<Numeric>,

    // Rate limit and error notices arrive with a 200 status.
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

fn or_zero(field: &Option<Numeric>) -> f64 {
    field.as_ref().and_then(Numeric::value).unwrap_or(0.0)
}

// ROE, margin and growth are reported as fractions (0.147); the score bands use percent.
fn percent_or_zero(field: &Option<Numeric>) -> f64 {
    or_zero(field) * 100.0
}

/// Parses the overview payload. Missing or unparseable ("None", "-") values become 0.
pub fn parse_overview(symbol: &str, body: &str) -> Result<FundamentalMetrics> {
    let overview: CompanyOverview = serde_json::from_str(body)?;

    if let Some(notice) = overview.error_message.or(overview.note).or(overview.information) {
        return Err(EngineError::UpstreamError(format!("fundamentals for '{}': {}", symbol, notice)));
    }

    Ok(FundamentalMetrics {
        pe_ratio: or_zero(&overview.pe_ratio),
        forward_pe: or_zero(&overview.forward_pe),
        peg_ratio: or_zero(&overview.peg_ratio),
        debt_to_equity: or_zero(&overview.debt_to_equity),
        return_on_equity: percent_or_zero(&overview.return_on_equity),
        profit_margin: percent_or_zero(&overview.profit_margin),
        revenue_growth: percent_or_zero(&overview.revenue_growth),
    })
}

impl OverviewClient {
    pub fn new(settings: &FundamentalsSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl FundamentalsSource for OverviewClient {
    async fn fetch_metrics(&self, symbol: &str) -> Result<FundamentalMetrics> {
        let url = format!("{}/query", self.base_url);
        let query = [("function", "OVERVIEW"), ("symbol", symbol), ("apikey", self.api_key.as_str())];

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(EngineError::UpstreamError(format!("fundamentals HTTP {}: {}", status, error_msg)));
        }

        let body = response.text().await?;
        let metrics = parse_overview(symbol, &body)?;
        tracing::debug!(symbol = %symbol, pe = metrics.pe_ratio, peg = metrics.peg_ratio, "Fetched fundamentals");
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overview_full() {
        let body = r#"{
            "Symbol": "AAPL",
            "PERatio": "29.5",
            "ForwardPE": "27.1",
            "PEGRatio": "2.1",
            "DebtToEquityRatio": "1.45",
            "ReturnOnEquityTTM": "1.47",
            "ProfitMargin": "0.246",
            "QuarterlyRevenueGrowthYOY": "0.061"
        }"#;
        let m = parse_overview("AAPL", body).unwrap();
        assert_eq!(m.pe_ratio, 29.5);
        assert_eq!(m.forward_pe, 27.1);
        assert_eq!(m.peg_ratio, 2.1);
        assert_eq!(m.debt_to_equity, 1.45);
        assert!((m.return_on_equity - 147.0).abs() < 1e-9);
        assert!((m.profit_margin - 24.6).abs() < 1e-9);
        assert!((m.revenue_growth - 6.1).abs() < 1e-9);
    }

    #[test]
    fn test_parse_overview_missing_and_none_become_zero() {
        let body = r#"{"Symbol": "XYZ", "PERatio": "None", "PEGRatio": "-", "ProfitMargin": null}"#;
        let m = parse_overview("XYZ", body).unwrap();
        assert_eq!(m, FundamentalMetrics::default());
    }

    #[test]
    fn test_parse_overview_empty_object() {
        assert_eq!(parse_overview("XYZ", "{}").unwrap(), FundamentalMetrics::default());
    }

    #[test]
    fn test_parse_overview_rate_limit_note() {
        let body = r#"{"Note": "Thank you for using our API. Our standard API call frequency is 5 calls per minute."}"#;
        let err = parse_overview("AAPL", body).unwrap_err();
        assert!(matches!(err, EngineError::UpstreamError(ref msg) if msg.contains("call frequency")));
    }
}
