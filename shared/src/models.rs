use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trading-session OHLC observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl CandleBar {
    /// Intraday percent change of this bar. A zero open yields 0 instead of dividing by it.
    pub fn change_pct(&self) -> f64 {
        if self.open == 0.0 {
            return 0.0;
        }
        (self.close - self.open) / self.open * 100.0
    }

    pub fn has_positive_prices(&self) -> bool {
        self.open > 0.0 && self.high > 0.0 && self.low > 0.0 && self.close > 0.0
    }
}

/// Bars for one ticker, chronological ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSeries {
    pub symbol: String,
    pub bars: Vec<CandleBar>,
}

impl SymbolSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<CandleBar>) -> Self {
        Self { symbol: symbol.into(), bars }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&CandleBar> {
        self.bars.last()
    }

    /// Percent change of the most recent bar, `None` when there are no bars.
    pub fn change_pct(&self) -> Option<f64> {
        self.latest().map(CandleBar::change_pct)
    }
}

/// Per-symbol fundamentals snapshot. Missing source values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    pub pe_ratio: f64,
    pub forward_pe: f64,
    pub peg_ratio: f64,
    pub debt_to_equity: f64,
    pub return_on_equity: f64,
    pub profit_margin: f64,
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Recommendation {
    pub fn from_buy_score(buy_score: f64) -> Self {
        if buy_score >= 80.0 {
            Recommendation::StrongBuy
        } else if buy_score >= 60.0 {
            Recommendation::Buy
        } else if buy_score >= 40.0 {
            Recommendation::Hold
        } else if buy_score >= 20.0 {
            Recommendation::Sell
        } else {
            Recommendation::StrongSell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub fundamental_score: f64,
    pub buy_score: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Lenient label parsing; anything unrecognised is neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" | "bullish" | "buy" | "strong buy" => Sentiment::Positive,
            "negative" | "bearish" | "sell" | "strong sell" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    /// Keyword vote over free text, for workflow replies that carry no label.
    pub fn detect(text: &str) -> Option<Self> {
        const POSITIVE: [&str; 4] = ["positive", "bullish", "upside", "outperform"];
        const NEGATIVE: [&str; 4] = ["negative", "bearish", "downside", "underperform"];

        let lower = text.to_ascii_lowercase();
        let ups: usize = POSITIVE.iter().map(|w| lower.matches(w).count()).sum();
        let downs: usize = NEGATIVE.iter().map(|w| lower.matches(w).count()).sum();
        match ups.cmp(&downs) {
            std::cmp::Ordering::Greater => Some(Sentiment::Positive),
            std::cmp::Ordering::Less => Some(Sentiment::Negative),
            std::cmp::Ordering::Equal if ups > 0 => Some(Sentiment::Neutral),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Stock,
    Crypto,
    Etf,
    Forex,
}

impl AssetKind {
    /// Only equities and funds have company fundamentals to score.
    pub fn has_fundamentals(&self) -> bool {
        matches!(self, AssetKind::Stock | AssetKind::Etf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub kind: AssetKind,
}

impl Asset {
    pub fn new(symbol: &str, name: &str, kind: AssetKind) -> Self {
        Self { symbol: symbol.to_string(), name: name.to_string(), kind }
    }
}

/// What the sentiment workflow said about one asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetInsight {
    pub symbol: String,
    pub sentiment: Option<Sentiment>,
    pub summary: Option<String>,
    pub buy_score: Option<f64>,
}
