//! Normalization of the sentiment workflow's reply.
//!
//! The workflow has answered with several envelope shapes over time
//! (`{data}`, `{analysis}`, `{forecast}`, `{output}`, bare record arrays,
//! plain text). The envelope is picked by its key, then each record inside the
//! payload is decoded on its own: a malformed record is skipped, never the
//! whole reply. Anything unrecognised becomes an empty report.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::models::{AssetInsight, Sentiment};

use crate::data::Numeric;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Data,
    Analysis,
    Forecast,
    Output,
    Records,
    Text,
    #[default]
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub kind: EnvelopeKind,
    pub insights: Vec<AssetInsight>,
    /// Free text not attributed to a single asset.
    pub narrative: Option<String>,
}

impl WorkflowReport {
    pub fn insight_for(&self, symbol: &str) -> Option<&AssetInsight> {
        self.insights.iter().find(|i| i.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.narrative.is_none()
    }
}

// Checked in this order when an object carries more than one.
const ENVELOPE_KEYS: [(&str, EnvelopeKind); 4] = [
    ("data", EnvelopeKind::Data),
    ("analysis", EnvelopeKind::Analysis),
    ("forecast", EnvelopeKind::Forecast),
    ("output", EnvelopeKind::Output),
];

// An object with any of these keys is one record, otherwise a map keyed by symbol.
const RECORD_KEYS: [&str; 12] = [
    "symbol", "ticker", "asset", "sentiment", "summary", "analysis", "text", "output", "forecast", "buyScore",
    "buy_score", "buy_score_pct",
];

// Every synonym is its own field so a record carrying two of them is not a duplicate-field error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InsightRecord {
    symbol: Option<String>,
    ticker: Option<String>,
    asset: Option<String>,
    sentiment: Option<Value>,
    summary: Option<String>,
    analysis: Option<String>,
    text: Option<String>,
    output: Option<String>,
    forecast: Option<String>,
    #[serde(rename = "buyScore")]
    buy_score_camel: Option<Numeric>,
    buy_score: Option<Numeric>,
    buy_score_pct: Option<Numeric>,
}

impl InsightRecord {
    fn symbol(&self, fallback: Option<&str>) -> Option<String> {
        [&self.symbol, &self.ticker, &self.asset]
            .into_iter()
            .find_map(|s| s.as_deref())
            .or(fallback)
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
    }

    fn summary(&self) -> Option<String> {
        [&self.summary, &self.analysis, &self.text, &self.output, &self.forecast]
            .into_iter()
            .find_map(|t| non_empty(t.as_deref()))
    }

    /// Labels only; numeric scores carry no agreed scale and are ignored.
    fn sentiment(&self) -> Option<Sentiment> {
        match self.sentiment.as_ref()? {
            Value::String(label) => Some(Sentiment::from_label(label)),
            Value::Object(fields) => fields.get("label").and_then(Value::as_str).map(Sentiment::from_label),
            _ => None,
        }
    }

    fn buy_score(&self) -> Option<f64> {
        [&self.buy_score_camel, &self.buy_score, &self.buy_score_pct]
            .into_iter()
            .flatten()
            .find_map(Numeric::value)
            .map(|v| v.clamp(0.0, 100.0))
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

#[derive(Default)]
struct ReportBuilder {
    insights: Vec<AssetInsight>,
    loose_text: Vec<String>,
}

impl ReportBuilder {
    fn push_item(&mut self, item: Value, key: Option<&str>) {
        match item {
            Value::String(text) => match key {
                Some(key) => self.push_record(InsightRecord { summary: Some(text), ..Default::default() }, Some(key)),
                None => self.loose_text.extend(non_empty(Some(&text))),
            },
            Value::Object(_) => match serde_json::from_value::<InsightRecord>(item) {
                Ok(record) => self.push_record(record, key),
                Err(e) => tracing::debug!(key = ?key, error = %e, "Skipping malformed workflow record"),
            },
            other => tracing::debug!(key = ?key, value = %other, "Skipping workflow record that is not an object"),
        }
    }

    fn push_record(&mut self, record: InsightRecord, key: Option<&str>) {
        let summary = record.summary();
        match record.symbol(key) {
            Some(symbol) => self.insights.push(AssetInsight {
                symbol,
                sentiment: record.sentiment(),
                summary,
                buy_score: record.buy_score(),
            }),
            // Records without a symbol still carry useful prose.
            None => self.loose_text.extend(summary),
        }
    }

    fn finish(self, kind: EnvelopeKind) -> WorkflowReport {
        let narrative = if self.loose_text.is_empty() { None } else { Some(self.loose_text.join("\n\n")) };
        WorkflowReport { kind, insights: self.insights, narrative }
    }
}

fn is_record(fields: &Map<String, Value>) -> bool {
    RECORD_KEYS.iter().any(|key| fields.contains_key(*key))
}

fn payload_report(payload: Value, kind: EnvelopeKind) -> WorkflowReport {
    let mut builder = ReportBuilder::default();
    match payload {
        Value::String(text) => builder.push_item(Value::String(text), None),
        Value::Array(items) => {
            for item in items {
                builder.push_item(item, None);
            }
        }
        Value::Object(fields) if is_record(&fields) => builder.push_item(Value::Object(fields), None),
        Value::Object(fields) => {
            for (key, item) in fields {
                builder.push_item(item, Some(&key));
            }
        }
        other => tracing::debug!(kind = ?kind, payload = %other, "Workflow payload carries no records"),
    }
    builder.finish(kind)
}

/// Total: every JSON value maps to a report, unknown shapes to the default one.
pub fn normalize_response(value: Value) -> WorkflowReport {
    match value {
        Value::Array(_) => payload_report(value, EnvelopeKind::Records),
        Value::String(_) => payload_report(value, EnvelopeKind::Text),
        Value::Object(mut fields) => {
            match ENVELOPE_KEYS.iter().find_map(|(key, kind)| fields.remove(*key).map(|payload| (payload, *kind))) {
                Some((payload, kind)) => payload_report(payload, kind),
                None => {
                    tracing::warn!(keys = ?fields.keys().collect::<Vec<_>>(), "Unrecognized workflow response shape");
                    WorkflowReport::default()
                }
            }
        }
        other => {
            tracing::warn!(value = %other, "Unrecognized workflow response shape");
            WorkflowReport::default()
        }
    }
}

/// Like [`normalize_response`], but bodies that are not JSON are kept as text.
pub fn parse_response_body(body: &str) -> WorkflowReport {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return WorkflowReport::default();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => normalize_response(value),
        Err(_) => payload_report(Value::String(trimmed.to_string()), EnvelopeKind::Text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_records() {
        let report = normalize_response(json!({
            "data": [
                {"symbol": "aapl", "sentiment": "Positive", "summary": "Strong iPhone cycle", "buyScore": 82},
                {"ticker": "TSLA", "sentiment": {"label": "bearish", "score": 0.81}, "analysis": "Margin pressure"}
            ]
        }));
        assert_eq!(report.kind, EnvelopeKind::Data);
        assert_eq!(report.insights.len(), 2);

        let aapl = report.insight_for("AAPL").unwrap();
        assert_eq!(aapl.sentiment, Some(Sentiment::Positive));
        assert_eq!(aapl.buy_score, Some(82.0));
        assert_eq!(aapl.summary.as_deref(), Some("Strong iPhone cycle"));

        let tsla = report.insight_for("tsla").unwrap();
        assert_eq!(tsla.sentiment, Some(Sentiment::Negative));
        assert_eq!(tsla.summary.as_deref(), Some("Margin pressure"));
    }

    #[test]
    fn test_analysis_keyed_by_symbol() {
        let report = normalize_response(json!({
            "analysis": {
                "BTC/USD": {"sentiment": "neutral", "text": "Range bound"},
                "NVDA": {"sentiment": "positive", "buyScore": "91.5"}
            }
        }));
        assert_eq!(report.kind, EnvelopeKind::Analysis);
        assert_eq!(report.insight_for("btc/usd").unwrap().sentiment, Some(Sentiment::Neutral));
        assert_eq!(report.insight_for("NVDA").unwrap().buy_score, Some(91.5));
    }

    #[test]
    fn test_forecast_text() {
        let report = normalize_response(json!({"forecast": "  Markets look bullish into earnings.  "}));
        assert_eq!(report.kind, EnvelopeKind::Forecast);
        assert!(report.insights.is_empty());
        assert_eq!(report.narrative.as_deref(), Some("Markets look bullish into earnings."));
    }

    #[test]
    fn test_bare_output_array() {
        let report = normalize_response(json!([{"output": "AAPL looks positive."}, {"output": "TSLA looks negative."}]));
        assert_eq!(report.kind, EnvelopeKind::Records);
        assert!(report.insights.is_empty());
        assert_eq!(report.narrative.as_deref(), Some("AAPL looks positive.\n\nTSLA looks negative."));
    }

    #[test]
    fn test_single_record_payload() {
        let report = normalize_response(json!({"data": {"symbol": "MSFT", "sentiment": "bullish"}}));
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].symbol, "MSFT");
    }

    #[test]
    fn test_bare_string() {
        let report = normalize_response(json!("plain text answer"));
        assert_eq!(report.kind, EnvelopeKind::Text);
        assert_eq!(report.narrative.as_deref(), Some("plain text answer"));
    }

    #[test]
    fn test_unknown_shapes_default() {
        for value in [json!(null), json!(42), json!({"status": "queued"}), json!(true)] {
            let report = normalize_response(value);
            assert_eq!(report, WorkflowReport::default());
            assert!(report.is_empty());
        }
    }

    #[test]
    fn test_buy_score_clamped() {
        let report = normalize_response(json!({"data": [{"symbol": "AMD", "buyScore": 140}]}));
        assert_eq!(report.insights[0].buy_score, Some(100.0));
    }

    #[test]
    fn test_parse_response_body_non_json() {
        let report = parse_response_body("Workflow finished: outlook positive");
        assert_eq!(report.kind, EnvelopeKind::Text);
        assert_eq!(report.narrative.as_deref(), Some("Workflow finished: outlook positive"));

        assert_eq!(parse_response_body("   "), WorkflowReport::default());
    }

    #[test]
    fn test_parse_response_body_json() {
        let report = parse_response_body(r#"{"output": [{"asset": "eth/usd", "sentiment": "negative"}]}"#);
        assert_eq!(report.kind, EnvelopeKind::Output);
        assert_eq!(report.insight_for("ETH/USD").unwrap().sentiment, Some(Sentiment::Negative));
    }

    #[test]
    fn test_malformed_record_does_not_drop_the_rest() {
        let report = normalize_response(json!({"data": [
            {"symbol": "AAPL", "sentiment": "positive"},
            {"symbol": "TSLA", "summary": ["not", "text"]},
            {"symbol": "AMD", "buyScore": true}
        ]}));
        assert_eq!(report.kind, EnvelopeKind::Data);
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insight_for("AAPL").unwrap().sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn test_record_with_several_summary_fields() {
        let report = normalize_response(json!({"data": [
            {"symbol": "AAPL", "sentiment": "positive"},
            {"symbol": "TSLA", "summary": "Delivery miss", "analysis": "Longer view"}
        ]}));
        assert_eq!(report.insights.len(), 2);
        assert_eq!(report.insight_for("TSLA").unwrap().summary.as_deref(), Some("Delivery miss"));
    }

    #[test]
    fn test_numeric_sentiment_is_ignored() {
        let report = normalize_response(json!({"data": [
            {"symbol": "AAPL", "sentiment": "positive"},
            {"symbol": "TSLA", "sentiment": 0.3, "summary": "Bearish drift"}
        ]}));
        assert_eq!(report.insights.len(), 2);
        let tsla = report.insight_for("TSLA").unwrap();
        assert_eq!(tsla.sentiment, None);
        assert_eq!(tsla.summary.as_deref(), Some("Bearish drift"));
    }

    #[test]
    fn test_keyed_text_values() {
        let report = normalize_response(json!({"analysis": {"AAPL": "Bullish outlook", "TSLA": "Bearish"}}));
        assert_eq!(report.kind, EnvelopeKind::Analysis);
        assert_eq!(report.insights.len(), 2);
        let aapl = report.insight_for("AAPL").unwrap();
        assert_eq!(aapl.summary.as_deref(), Some("Bullish outlook"));
        assert_eq!(aapl.sentiment, None);
        assert_eq!(report.insight_for("TSLA").unwrap().summary.as_deref(), Some("Bearish"));
        assert_eq!(report.narrative, None);
    }

    #[test]
    fn test_bare_array_of_strings() {
        let report = normalize_response(json!(["some text", "more text"]));
        assert_eq!(report.kind, EnvelopeKind::Records);
        assert!(report.insights.is_empty());
        assert_eq!(report.narrative.as_deref(), Some("some text\n\nmore text"));
    }
}
