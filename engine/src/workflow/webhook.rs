// HTTP client for the hosted sentiment workflow webhook
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::models::Asset;
use std::time::Duration;
use uuid::Uuid;

use super::normalize::{parse_response_body, WorkflowReport};
use super::SentimentWorkflow;
use crate::config::settings::WorkflowSettings;
use crate::error::{EngineError, Result};

pub struct WebhookClient {
    client: Client,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
pub struct WorkflowRequest<'a> {
    pub request_id: String,
    pub assets: &'a [Asset],
}

impl<'a> WorkflowRequest<'a> {
    pub fn new(assets: &'a [Asset]) -> Self {
        Self { request_id: Uuid::new_v4().to_string(), assets }
    }
}

impl WebhookClient {
    pub fn new(settings: &WorkflowSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, webhook_url: settings.webhook_url.clone() })
    }
}

#[async_trait]
impl SentimentWorkflow for WebhookClient {
    async fn request_report(&self, assets: &[Asset]) -> Result<WorkflowReport> {
        if self.webhook_url.is_empty() {
            return Err(EngineError::ConfigError("workflow.webhook_url is not set".to_string()));
        }

        let request = WorkflowRequest::new(assets);
        tracing::info!(request_id = %request.request_id, assets = assets.len(), "Calling sentiment workflow");

        let response = self.client.post(&self.webhook_url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(request_id = %request.request_id, %status, "Sentiment workflow returned an error status");
            return Err(EngineError::UpstreamError(format!("sentiment workflow HTTP {}: {}", status, body.trim())));
        }

        let report = parse_response_body(&body);
        tracing::info!(
            request_id = %request.request_id,
            kind = ?report.kind,
            insights = report.insights.len(),
            "Sentiment workflow answered"
        );
        Ok(report)
    }
}
