use anyhow::Result;
use sqlx::PgPool;

use crate::models::settings::AppSettingsRow;

const SETTINGS_ID: &str = "singleton";

/// Returns the settings row, inserting it with `default_cooldown_days` when absent.
pub async fn get_or_create_settings(
    pool: &PgPool,
    default_cooldown_days: i32,
) -> Result<AppSettingsRow> {
    Ok(sqlx::query_as::<_, AppSettingsRow>(
        r#"
        INSERT INTO app_settings (id, cooldown_days)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET id = app_settings.id
        RETURNING *
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(default_cooldown_days)
    .fetch_one(pool)
    .await?)
}

pub async fn set_cooldown_days(pool: &PgPool, cooldown_days: i32) -> Result<AppSettingsRow> {
    Ok(sqlx::query_as::<_, AppSettingsRow>(
        r#"
        INSERT INTO app_settings (id, cooldown_days)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
            SET cooldown_days = EXCLUDED.cooldown_days, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(cooldown_days)
    .fetch_one(pool)
    .await?)
}
