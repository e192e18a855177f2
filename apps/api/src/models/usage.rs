use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One append-only analytics record. Rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    pub event_type: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UsageEvent {
    /// Stamps the event with the current time.
    pub fn now(event_type: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            event_type: event_type.into(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Row shape of `usage_events`, including the generated primary key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UsageEventRow {
    pub id: Uuid,
    pub event_type: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
