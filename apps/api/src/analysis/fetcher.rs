//! Completion Fetcher — one chat-completion call, raced against a timer.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::analysis::models::RawCompletion;
use crate::config::LlmConfig;
use crate::errors::AppError;
use crate::llm_client::{ChatCompletion, LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("completion failed: {0}")]
    Upstream(#[from] LlmError),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout(after) => AppError::UpstreamTimeout(after),
            FetchError::Upstream(e) => AppError::UpstreamResponse(e.to_string()),
        }
    }
}

pub struct CompletionFetcher {
    client: Arc<dyn ChatCompletion>,
    timeout: Duration,
}

impl CompletionFetcher {
    pub fn new(client: Arc<dyn ChatCompletion>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds the production fetcher. Returns `Ok(None)` when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = LlmClient::new(api_key, &config.api_base)?;
        Ok(Some(Self::new(Arc::new(client), config.timeout)))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues exactly one request. Whichever of the call and the timer finishes
    /// first decides the outcome; the other is dropped.
    pub async fn fetch(&self, prompt: &str) -> Result<RawCompletion, FetchError> {
        match tokio::time::timeout(self.timeout, self.client.complete(prompt)).await {
            Ok(Ok(text)) => {
                info!("Completion received ({} chars)", text.len());
                Ok(RawCompletion(text))
            }
            Ok(Err(e)) => {
                error!("Completion request failed: {e}");
                Err(FetchError::Upstream(e))
            }
            Err(_) => {
                error!("Completion request timed out after {:?}", self.timeout);
                Err(FetchError::Timeout(self.timeout))
            }
        }
    }
}
