use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppSettingsRow {
    pub id: String,
    pub cooldown_days: i32,
    pub updated_at: DateTime<Utc>,
}
