// Usage Logger: append-only analytics events, written off the request path.
// A failed write is logged and dropped; it never affects the response.

pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::HeaderMap;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::usage::{UsageEvent, UsageEventRow};

/// Event recorded once an analysis submission passes validation.
pub const ANALYSIS_REQUESTED: &str = "analysis_requested";

/// Optional caller identity attached to usage events.
pub const USER_ID_HEADER: &str = "x-user-id";

/// `"LinkedIn"` → `"share_linkedin"`.
pub fn share_event_type(network: &str) -> String {
    format!("share_{}", network.trim().to_lowercase())
}

/// Reads `X-User-Id`, ignoring blank or non-UTF-8 values.
pub fn user_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Destination for usage events.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn append(&self, event: &UsageEvent) -> Result<()>;
}

/// Writes one row into `usage_events` per event.
pub struct PgUsageSink {
    db: PgPool,
}

impl PgUsageSink {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsageSink for PgUsageSink {
    async fn append(&self, event: &UsageEvent) -> Result<()> {
        let row = sqlx::query_as::<_, UsageEventRow>(
            r#"
            INSERT INTO usage_events (id, event_type, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_type, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.event_type)
        .bind(&event.user_id)
        .bind(event.created_at)
        .fetch_one(&self.db)
        .await?;

        debug!("Recorded usage event {} ({})", row.id, row.event_type);
        Ok(())
    }
}

/// Fire-and-forget front for a `UsageSink`.
#[derive(Clone)]
pub struct UsageLogger {
    sink: Arc<dyn UsageSink>,
}

impl UsageLogger {
    pub fn new(sink: Arc<dyn UsageSink>) -> Self {
        Self { sink }
    }

    /// Spawns the append and returns immediately. Callers are free to drop the handle.
    pub fn record(&self, event: UsageEvent) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            if let Err(e) = sink.append(&event).await {
                warn!("Failed to record usage event '{}': {e:#}", event.event_type);
            }
        })
    }
}
