// engine/src/services/market_service/mod.rs
// MarketService owns the injected collaborators and dispatches each operation to its handler module.

use std::sync::Arc;

use shared::models::{FundamentalMetrics, ScoreResult, Sentiment, SymbolSeries};

use crate::catalog::{AssetCatalog, AssetSelection};
use crate::config::EngineSettings;
use crate::data::{FundamentalsSource, OverviewClient, SeriesSource, TimeSeriesClient};
use crate::error::Result;
use crate::workflow::{SentimentWorkflow, WebhookClient};

pub mod analyze_assets;
pub mod helpers;
pub mod top_movers;

pub use analyze_assets::{AnalysisReport, AssetAnalysis};
pub use helpers::{summarize_mover, MoverSummary};

pub struct MarketService {
    series_source: Arc<dyn SeriesSource>,
    fundamentals: Arc<dyn FundamentalsSource>,
    workflow: Arc<dyn SentimentWorkflow>,
    catalog: AssetCatalog,
    settings: EngineSettings,
}

impl MarketService {
    pub fn new(
        series_source: Arc<dyn SeriesSource>,
        fundamentals: Arc<dyn FundamentalsSource>,
        workflow: Arc<dyn SentimentWorkflow>,
        settings: EngineSettings,
    ) -> Self {
        MarketService { series_source, fundamentals, workflow, catalog: AssetCatalog::default(), settings }
    }

    /// Wires the HTTP clients described by `settings`.
    pub fn from_settings(settings: EngineSettings) -> Result<Self> {
        let series_source = Arc::new(TimeSeriesClient::new(&settings.market_data)?);
        let fundamentals = Arc::new(OverviewClient::new(&settings.fundamentals)?);
        let workflow = Arc::new(WebhookClient::new(&settings.workflow)?);
        Ok(Self::new(series_source, fundamentals, workflow, settings))
    }

    pub fn with_series_source(mut self, series_source: Arc<dyn SeriesSource>) -> Self {
        self.series_source = series_source;
        self
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// An empty selection bounded by the configured maximum.
    pub fn new_selection(&self) -> AssetSelection {
        AssetSelection::new(self.settings.selection.max_assets)
    }

    pub fn select_symbols(&self, symbols: &[String]) -> Result<AssetSelection> {
        AssetSelection::from_symbols(&self.catalog, symbols, self.settings.selection.max_assets)
    }

    pub async fn top_movers(&self) -> Vec<SymbolSeries> {
        tracing::info!(candidates = self.settings.movers.candidates.len(), "Received top movers request, dispatching to handler.");
        top_movers::handle_top_movers(&self.settings.movers, self.series_source.as_ref()).await
    }

    pub async fn analyze_assets(&self, selection: &AssetSelection) -> Result<AnalysisReport> {
        tracing::info!(
            symbols = ?selection.assets().iter().map(|a| a.symbol.as_str()).collect::<Vec<_>>(),
            "Received analyze assets request, dispatching to handler."
        );
        analyze_assets::handle_analyze_assets(
            selection.assets(),
            self.workflow.as_ref(),
            self.fundamentals.as_ref(),
            &self.settings.scoring,
        )
        .await
    }

    pub fn score_metrics(&self, metrics: &FundamentalMetrics, sentiment: Sentiment) -> ScoreResult {
        self.settings.scoring.evaluate(metrics, sentiment)
    }
}
