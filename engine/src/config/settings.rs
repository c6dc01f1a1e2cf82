// Engine settings: embedded defaults, an optional JSON file, then environment overrides.
use crate::error::{EngineError, Result};
use crate::scoring::BlendPolicy;
use serde::Deserialize;
use std::path::Path;

pub const MARKET_DATA_API_KEY_VAR: &str = "MARKET_DATA_API_KEY";
pub const FUNDAMENTALS_API_KEY_VAR: &str = "FUNDAMENTALS_API_KEY";
pub const SENTIMENT_WEBHOOK_URL_VAR: &str = "SENTIMENT_WEBHOOK_URL";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub market_data: MarketDataSettings,
    pub fundamentals: FundamentalsSettings,
    pub workflow: WorkflowSettings,
    pub movers: MoversSettings,
    pub scoring: BlendPolicy,
    pub selection: SelectionSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MarketDataSettings {
    pub base_url: String,
    pub api_key: String,
    pub interval: String,
    pub output_size: u32,
    pub timeout_secs: u64,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        MarketDataSettings {
            base_url: "https://api.twelvedata.com".to_string(),
            api_key: String::new(),
            interval: "1day".to_string(),
            output_size: 30,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FundamentalsSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for FundamentalsSettings {
    fn default() -> Self {
        FundamentalsSettings {
            base_url: "https://www.alphavantage.co".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkflowSettings {
    pub webhook_url: String,
    pub timeout_secs: u64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        WorkflowSettings {
            webhook_url: String::new(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MoversSettings {
    pub candidates: Vec<String>,
    pub fallback: Vec<String>,
    pub top_n: usize,
}

impl Default for MoversSettings {
    fn default() -> Self {
        MoversSettings {
            candidates: ["AAPL", "MSFT", "NVDA", "TSLA", "AMZN", "GOOGL", "META", "AMD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback: crate::movers::FALLBACK_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            top_n: crate::movers::DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelectionSettings {
    pub max_assets: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        SelectionSettings { max_assets: 5 }
    }
}

impl EngineSettings {
    /// Settings bundled with the binary.
    pub fn load_default() -> Result<Self> {
        let config_str = include_str!("../../config/default.json");
        Self::from_json(config_str)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)?;
        Self::from_json(&config_str)
            .map_err(|e| EngineError::ConfigError(format!("Invalid config file '{}': {}", path.display(), e)))
    }

    pub fn from_json(config_str: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(config_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Secrets and endpoints are usually injected through the environment rather than the JSON file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(MARKET_DATA_API_KEY_VAR).filter(|v| !v.is_empty()) {
            self.market_data.api_key = key;
        }
        if let Some(key) = lookup(FUNDAMENTALS_API_KEY_VAR).filter(|v| !v.is_empty()) {
            self.fundamentals.api_key = key;
        }
        if let Some(url) = lookup(SENTIMENT_WEBHOOK_URL_VAR).filter(|v| !v.is_empty()) {
            self.workflow.webhook_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.movers.top_n == 0 {
            return Err(EngineError::ConfigError("movers.top_n must be greater than 0".to_string()));
        }
        if self.selection.max_assets == 0 {
            return Err(EngineError::ConfigError("selection.max_assets must be greater than 0".to_string()));
        }
        if self.scoring.sentiment_weight < 0.0 || self.scoring.fundamental_weight < 0.0 {
            return Err(EngineError::ConfigError("scoring weights must not be negative".to_string()));
        }
        Ok(())
    }
}
