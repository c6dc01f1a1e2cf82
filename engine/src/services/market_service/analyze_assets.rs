// Handler for sentiment + fundamentals analysis of the selected assets
use futures::future::join_all;
use serde::Serialize;
use shared::models::{Asset, FundamentalMetrics, ScoreResult, Sentiment};

use super::helpers::resolve_sentiment;
use crate::data::FundamentalsSource;
use crate::error::{EngineError, Result};
use crate::scoring::BlendPolicy;
use crate::workflow::{SentimentWorkflow, WorkflowReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAnalysis {
    pub asset: Asset,
    pub sentiment: Sentiment,
    pub summary: Option<String>,
    /// `None` for assets without company fundamentals or when the fetch failed.
    pub metrics: Option<FundamentalMetrics>,
    pub score: ScoreResult,
    /// Score suggested by the workflow itself, shown alongside ours.
    pub workflow_buy_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analyses: Vec<AssetAnalysis>,
    pub narrative: Option<String>,
}

pub async fn handle_analyze_assets(
    assets: &[Asset],
    workflow: &dyn SentimentWorkflow,
    fundamentals: &dyn FundamentalsSource,
    policy: &BlendPolicy,
) -> Result<AnalysisReport> {
    if assets.is_empty() {
        return Err(EngineError::SelectionError("no assets selected".to_string()));
    }
    tracing::debug!(assets = assets.len(), "Handling analyze assets request");

    // The workflow call and the fundamentals fetches are independent.
    let metrics_fetches = join_all(assets.iter().map(|asset| fetch_metrics(fundamentals, asset)));
    let (report, metrics) = futures::join!(workflow.request_report(assets), metrics_fetches);
    let report = report.map_err(|e| {
        tracing::error!(error = %e, "Sentiment workflow call failed");
        e
    })?;

    let analyses = assets
        .iter()
        .zip(metrics)
        .map(|(asset, metrics)| build_analysis(asset, metrics, &report, policy))
        .collect();

    Ok(AnalysisReport { analyses, narrative: report.narrative.clone() })
}

// Failures degrade to "no fundamentals" so one bad symbol does not sink the batch.
async fn fetch_metrics(fundamentals: &dyn FundamentalsSource, asset: &Asset) -> Option<FundamentalMetrics> {
    if !asset.kind.has_fundamentals() {
        return None;
    }
    match fundamentals.fetch_metrics(&asset.symbol).await {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            tracing::warn!(symbol = %asset.symbol, error = %e, "Fundamentals fetch failed, scoring with defaults");
            None
        }
    }
}

fn build_analysis(
    asset: &Asset,
    metrics: Option<FundamentalMetrics>,
    report: &WorkflowReport,
    policy: &BlendPolicy,
) -> AssetAnalysis {
    let sentiment = resolve_sentiment(asset, report);
    let insight = report.insight_for(&asset.symbol);
    let score = policy.evaluate(&metrics.unwrap_or_default(), sentiment);

    tracing::info!(
        symbol = %asset.symbol,
        %sentiment,
        fundamental_score = score.fundamental_score,
        buy_score = score.buy_score,
        recommendation = %score.recommendation,
        "Scored asset"
    );

    AssetAnalysis {
        asset: asset.clone(),
        sentiment,
        summary: insight.and_then(|i| i.summary.clone()),
        metrics,
        score,
        workflow_buy_score: insight.and_then(|i| i.buy_score),
    }
}
