use std::sync::Arc;

use crate::analysis::fetcher::CompletionFetcher;
use crate::config::Config;
use crate::usage::UsageLogger;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no completion credential is configured; analysis then
    /// answers with a configuration error.
    pub fetcher: Option<Arc<CompletionFetcher>>,
    pub usage: UsageLogger,
    pub config: Config,
}
