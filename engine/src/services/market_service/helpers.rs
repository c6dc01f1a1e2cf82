// Helper functions shared by the market_service handlers
use serde::Serialize;
use shared::models::{Asset, Sentiment, SymbolSeries};

use crate::workflow::WorkflowReport;

/// Compact view of a top mover for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverSummary {
    pub symbol: String,
    pub change_pct: f64,
    pub last_close: f64,
    pub bars: usize,
}

pub fn summarize_mover(series: &SymbolSeries) -> MoverSummary {
    MoverSummary {
        symbol: series.symbol.clone(),
        change_pct: series.change_pct().unwrap_or(0.0),
        last_close: series.latest().map_or(0.0, |b| b.close),
        bars: series.bars.len(),
    }
}

/// Label from the asset's insight, else keyword detection over the insight summary,
/// else over narrative sentences that mention the asset, else neutral.
pub fn resolve_sentiment(asset: &Asset, report: &WorkflowReport) -> Sentiment {
    let insight = report.insight_for(&asset.symbol);
    if let Some(sentiment) = insight.and_then(|i| i.sentiment) {
        return sentiment;
    }
    if let Some(sentiment) = insight.and_then(|i| i.summary.as_deref()).and_then(Sentiment::detect) {
        return sentiment;
    }
    report
        .narrative
        .as_deref()
        .map(|text| sentences_mentioning(text, asset))
        .filter(|mentions| !mentions.is_empty())
        .and_then(|mentions| Sentiment::detect(&mentions))
        .unwrap_or_default()
}

// An asset is mentioned by its symbol, the base of a pair ("BTC" for "BTC/USD"),
// or the first word of its name ("apple" for "Apple Inc.").
fn sentences_mentioning(text: &str, asset: &Asset) -> String {
    let symbol = asset.symbol.to_lowercase();
    let name = asset.name.to_lowercase();
    let needles: Vec<&str> = [
        symbol.as_str(),
        symbol.split('/').next().unwrap_or_default(),
        name.split_whitespace().next().unwrap_or_default().trim_matches(|c: char| !c.is_alphanumeric()),
    ]
    .into_iter()
    .filter(|n| !n.is_empty())
    .collect();

    text.split(['.', '!', '?', '\n'])
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
        .collect::<Vec<_>>()
        .join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{normalize_response, EnvelopeKind};
    use serde_json::json;
    use shared::models::{AssetInsight, AssetKind, CandleBar};
    use shared::utils::parse_timestamp;

    fn aapl() -> Asset {
        Asset::new("AAPL", "Apple Inc.", AssetKind::Stock)
    }

    #[test]
    fn test_explicit_label_wins() {
        let report = WorkflowReport {
            kind: EnvelopeKind::Data,
            insights: vec![AssetInsight {
                symbol: "AAPL".to_string(),
                sentiment: Some(Sentiment::Negative),
                summary: Some("very bullish".to_string()),
                buy_score: None,
            }],
            narrative: Some("AAPL is bullish".to_string()),
        };
        assert_eq!(resolve_sentiment(&aapl(), &report), Sentiment::Negative);
    }

    #[test]
    fn test_summary_keywords() {
        let report = normalize_response(json!({"data": [{"symbol": "AAPL", "summary": "Bearish setup, downside risk"}]}));
        assert_eq!(resolve_sentiment(&aapl(), &report), Sentiment::Negative);
    }

    #[test]
    fn test_narrative_sentences_per_asset() {
        let report = normalize_response(json!({
            "forecast": "Apple looks bullish after earnings. Bitcoin remains bearish near resistance."
        }));
        let btc = Asset::new("BTC/USD", "Bitcoin", AssetKind::Crypto);
        assert_eq!(resolve_sentiment(&aapl(), &report), Sentiment::Positive);
        assert_eq!(resolve_sentiment(&btc, &report), Sentiment::Negative);
    }

    #[test]
    fn test_no_information_is_neutral() {
        assert_eq!(resolve_sentiment(&aapl(), &WorkflowReport::default()), Sentiment::Neutral);
        let report = normalize_response(json!({"forecast": "TSLA is bullish."}));
        assert_eq!(resolve_sentiment(&aapl(), &report), Sentiment::Neutral);
    }

    #[test]
    fn test_summarize_mover() {
        let bars = vec![CandleBar { timestamp: parse_timestamp("2024-05-01").unwrap(), open: 100.0, high: 106.0, low: 99.0, close: 105.0 }];
        let summary = summarize_mover(&SymbolSeries::new("NVDA", bars));
        assert_eq!(summary.symbol, "NVDA");
        assert!((summary.change_pct - 5.0).abs() < 1e-9);
        assert_eq!(summary.last_close, 105.0);
        assert_eq!(summary.bars, 1);
    }
}
