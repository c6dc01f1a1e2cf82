// Sentiment workflow: the external service that labels each selected asset
pub mod normalize;
pub mod webhook;

use crate::error::Result;
use async_trait::async_trait;
use shared::models::Asset;

pub use normalize::{normalize_response, parse_response_body, EnvelopeKind, WorkflowReport};
pub use webhook::WebhookClient;

#[async_trait]
pub trait SentimentWorkflow: Send + Sync {
    /// One call for the whole selection.
    async fn request_report(&self, assets: &[Asset]) -> Result<WorkflowReport>;
}
