use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::validation::MealFields;
use crate::models::meal::MealRow;

/// Non-deleted meals ordered by name. Disabled meals only when asked for.
pub async fn list_meals(pool: &PgPool, include_disabled: bool) -> Result<Vec<MealRow>> {
    Ok(sqlx::query_as::<_, MealRow>(
        r#"
        SELECT * FROM meals
        WHERE deleted_at IS NULL AND ($1 OR enabled)
        ORDER BY name ASC
        "#,
    )
    .bind(include_disabled)
    .fetch_all(pool)
    .await?)
}

/// Returns the meal unless it is missing or soft-deleted.
pub async fn get_meal(pool: &PgPool, id: Uuid) -> Result<Option<MealRow>> {
    Ok(sqlx::query_as::<_, MealRow>(
        "SELECT * FROM meals WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

/// Meals referenced by history records, soft-deleted ones included.
pub async fn get_meals_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<MealRow>> {
    Ok(sqlx::query_as::<_, MealRow>("SELECT * FROM meals WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?)
}

/// `(id, name)` of every non-deleted meal, for duplicate-name checks.
pub async fn list_active_names(pool: &PgPool) -> Result<Vec<(Uuid, String)>> {
    Ok(
        sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM meals WHERE deleted_at IS NULL")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn insert_meal(pool: &PgPool, fields: &MealFields) -> Result<MealRow> {
    Ok(sqlx::query_as::<_, MealRow>(
        r#"
        INSERT INTO meals (id, name, category, description, tags, enabled)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&fields.name)
    .bind(&fields.category)
    .bind(&fields.description)
    .bind(&fields.tags)
    .bind(fields.enabled)
    .fetch_one(pool)
    .await?)
}

pub async fn update_meal(pool: &PgPool, id: Uuid, fields: &MealFields) -> Result<MealRow> {
    Ok(sqlx::query_as::<_, MealRow>(
        r#"
        UPDATE meals
        SET name = $2, category = $3, description = $4, tags = $5, enabled = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&fields.name)
    .bind(&fields.category)
    .bind(&fields.description)
    .bind(&fields.tags)
    .bind(fields.enabled)
    .fetch_one(pool)
    .await?)
}

// Guarded so a repeated delete cannot move an existing marker.
const SOFT_DELETE_SQL: &str = r#"
    UPDATE meals
    SET deleted_at = NOW(), updated_at = NOW()
    WHERE id = $1 AND deleted_at IS NULL
    RETURNING *
"#;

/// Sets the deletion marker. The row and its history are kept.
/// Returns `None` when the meal is missing or already deleted.
pub async fn soft_delete_meal(pool: &PgPool, id: Uuid) -> Result<Option<MealRow>> {
    Ok(sqlx::query_as::<_, MealRow>(SOFT_DELETE_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}
