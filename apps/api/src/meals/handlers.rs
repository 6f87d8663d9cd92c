use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::{is_unique_violation, AppError};
use crate::meals::repo::{
    get_meal, insert_meal, list_active_names, list_meals, soft_delete_meal, update_meal,
};
use crate::meals::validation::{
    duplicate_error, find_duplicate, CreateMealRequest, UpdateMealRequest,
};
use crate::models::meal::MealRow;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListMealsQuery {
    #[serde(default)]
    pub include_disabled: bool,
}

/// GET /api/v1/meals
pub async fn handle_list_meals(
    State(state): State<AppState>,
    Query(params): Query<ListMealsQuery>,
) -> Result<Json<Vec<MealRow>>, AppError> {
    let meals = list_meals(&state.db, params.include_disabled).await?;
    Ok(Json(meals))
}

/// POST /api/v1/meals
pub async fn handle_create_meal(
    State(state): State<AppState>,
    Json(req): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealRow>), AppError> {
    let fields = req.into_fields()?;

    let existing = list_active_names(&state.db).await?;
    if let Some(name) = find_duplicate(&existing, &fields.name, None) {
        return Err(duplicate_error(name));
    }

    let meal = insert_meal(&state.db, &fields)
        .await
        .map_err(|e| conflict_on_unique(e, &fields.name))?;
    info!("Created meal {} ({})", meal.name, meal.id);
    Ok((StatusCode::CREATED, Json(meal)))
}

/// GET /api/v1/meals/:id
pub async fn handle_get_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MealRow>, AppError> {
    let meal = get_meal(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;
    Ok(Json(meal))
}

/// PATCH /api/v1/meals/:id
pub async fn handle_update_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMealRequest>,
) -> Result<Json<MealRow>, AppError> {
    let meal = get_meal(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;

    let fields = req.apply_to(&meal)?;

    if req.renames(&meal) {
        let existing = list_active_names(&state.db).await?;
        if let Some(name) = find_duplicate(&existing, &fields.name, Some(id)) {
            return Err(duplicate_error(name));
        }
    }

    let updated = update_meal(&state.db, id, &fields)
        .await
        .map_err(|e| conflict_on_unique(e, &fields.name))?;
    info!(
        "Updated meal {} ({}), enabled={}",
        updated.name, updated.id, updated.enabled
    );
    Ok(Json(updated))
}

/// DELETE /api/v1/meals/:id
pub async fn handle_delete_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MealRow>, AppError> {
    let deleted = soft_delete_meal(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;
    info!("Soft-deleted meal {} ({})", deleted.name, deleted.id);
    Ok(Json(deleted))
}

/// A create/rename that lost the race against another writer.
fn conflict_on_unique(err: anyhow::Error, name: &str) -> AppError {
    if is_unique_violation(&err) {
        duplicate_error(name)
    } else {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::test_support::db_error;

    #[test]
    fn test_concurrent_duplicate_maps_to_conflict() {
        let err = conflict_on_unique(db_error(true), "Pad Thai");
        assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("Pad Thai")));
    }

    #[test]
    fn test_other_write_failures_stay_internal() {
        assert!(matches!(
            conflict_on_unique(db_error(false), "Pad Thai"),
            AppError::Internal(_)
        ));
    }
}
