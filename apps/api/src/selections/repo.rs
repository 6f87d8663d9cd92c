use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::selection::SelectionRow;

/// Confirmed history, newest first, optionally limited to `selected_at >= since`.
pub async fn list_confirmed(
    pool: &PgPool,
    since: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<SelectionRow>> {
    Ok(sqlx::query_as::<_, SelectionRow>(
        r#"
        SELECT * FROM selection_history
        WHERE confirmed AND ($1::timestamptz IS NULL OR selected_at >= $1)
        ORDER BY selected_at DESC
        LIMIT $2
        "#,
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Every confirmed record. Input to the cooldown computation.
pub async fn list_all_confirmed(pool: &PgPool) -> Result<Vec<SelectionRow>> {
    Ok(sqlx::query_as::<_, SelectionRow>(
        "SELECT * FROM selection_history WHERE confirmed",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn insert_confirmed(
    pool: &PgPool,
    meal_id: Uuid,
    notes: Option<&str>,
) -> Result<SelectionRow> {
    Ok(sqlx::query_as::<_, SelectionRow>(
        r#"
        INSERT INTO selection_history (id, meal_id, confirmed, notes)
        VALUES ($1, $2, TRUE, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(meal_id)
    .bind(notes)
    .fetch_one(pool)
    .await?)
}

/// Removes a record. Returns false when nothing matched.
pub async fn delete_selection(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM selection_history WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
