use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::meals::repo::{get_meal, get_meals_by_ids};
use crate::meals::validation::normalize_text;
use crate::models::meal::MealRow;
use crate::models::selection::{SelectionRow, SelectionWithMeal};
use crate::selections::repo::{delete_selection, insert_confirmed, list_confirmed};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 100;
const MAX_HISTORY_LIMIT: i64 = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Number of days back, or "all".
    pub days: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmSelectionRequest {
    pub meal_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/v1/selections
pub async fn handle_list_selections(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<SelectionWithMeal>>, AppError> {
    let since = history_since(params.days.as_deref(), Utc::now());
    let limit = history_limit(params.limit.as_deref());

    let selections = list_confirmed(&state.db, since, limit).await?;

    let mut meal_ids: Vec<Uuid> = selections.iter().map(|s| s.meal_id).collect();
    meal_ids.sort();
    meal_ids.dedup();
    let meals = get_meals_by_ids(&state.db, &meal_ids).await?;

    Ok(Json(attach_meals(selections, meals)))
}

/// POST /api/v1/selections
pub async fn handle_confirm_selection(
    State(state): State<AppState>,
    Json(req): Json<ConfirmSelectionRequest>,
) -> Result<(StatusCode, Json<SelectionWithMeal>), AppError> {
    let meal_id = req
        .meal_id
        .ok_or_else(|| AppError::Validation("meal_id is required".to_string()))?;

    let meal = get_meal(&state.db, meal_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;

    let notes = normalize_text(req.notes.as_deref());
    let selection = insert_confirmed(&state.db, meal_id, notes.as_deref()).await?;
    info!("Confirmed selection {} of meal {}", selection.id, meal.name);

    Ok((
        StatusCode::CREATED,
        Json(SelectionWithMeal {
            selection,
            meal: Some(meal),
        }),
    ))
}

/// DELETE /api/v1/selections/:id
pub async fn handle_delete_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !delete_selection(&state.db, id).await? {
        return Err(AppError::NotFound("Selection not found".to_string()));
    }
    info!("Deleted selection {id}");
    Ok(Json(DeleteResponse { success: true }))
}

/// Lower bound for the history window. `None` for "all", absent or unparseable.
fn history_since(days: Option<&str>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let days = days.map(str::trim).filter(|d| *d != "all")?;
    let days = days.parse::<i32>().ok()?;
    now.checked_sub_signed(Duration::days(i64::from(days)))
}

fn history_limit(limit: Option<&str>) -> i64 {
    limit
        .and_then(|l| l.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

fn attach_meals(selections: Vec<SelectionRow>, meals: Vec<MealRow>) -> Vec<SelectionWithMeal> {
    let by_id: HashMap<Uuid, MealRow> = meals.into_iter().map(|m| (m.id, m)).collect();
    selections
        .into_iter()
        .map(|selection| {
            let meal = by_id.get(&selection.meal_id).cloned();
            SelectionWithMeal { selection, meal }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn make_meal(name: &str) -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: None,
            description: None,
            tags: vec![],
            enabled: true,
            created_at: fixed_now(),
            updated_at: fixed_now(),
            deleted_at: None,
        }
    }

    fn make_selection(meal_id: Uuid) -> SelectionRow {
        SelectionRow {
            id: Uuid::new_v4(),
            meal_id,
            selected_at: fixed_now(),
            confirmed: true,
            selected_by: None,
            notes: Some("kids loved it".to_string()),
        }
    }

    #[test]
    fn test_history_since_days() {
        let now = fixed_now();
        assert_eq!(history_since(Some("7"), now), Some(now - Duration::days(7)));
        assert_eq!(history_since(Some(" 30 "), now), Some(now - Duration::days(30)));
    }

    #[test]
    fn test_history_since_all_or_garbage_is_unbounded() {
        let now = fixed_now();
        assert_eq!(history_since(Some("all"), now), None);
        assert_eq!(history_since(Some("lots"), now), None);
        assert_eq!(history_since(None, now), None);
    }

    #[test]
    fn test_history_limit_defaults_and_clamps() {
        assert_eq!(history_limit(None), 100);
        assert_eq!(history_limit(Some("25")), 25);
        assert_eq!(history_limit(Some("0")), 1);
        assert_eq!(history_limit(Some("50000")), 1000);
        assert_eq!(history_limit(Some("many")), 100);
    }

    #[test]
    fn test_attach_meals_keeps_history_order() {
        let tacos = make_meal("Tacos");
        let curry = make_meal("Curry");
        let selections = vec![
            make_selection(curry.id),
            make_selection(tacos.id),
            make_selection(curry.id),
        ];

        let joined = attach_meals(selections, vec![tacos, curry]);
        let names: Vec<_> = joined
            .iter()
            .map(|s| s.meal.as_ref().map(|m| m.name.as_str()))
            .collect();
        assert_eq!(names, vec![Some("Curry"), Some("Tacos"), Some("Curry")]);
    }

    #[test]
    fn test_attach_meals_missing_meal_is_none() {
        let joined = attach_meals(vec![make_selection(Uuid::new_v4())], vec![]);
        assert!(joined[0].meal.is_none());
    }

    #[test]
    fn test_selection_serializes_flat_with_meal() {
        let meal = make_meal("Pad Thai");
        let record = SelectionWithMeal {
            selection: make_selection(meal.id),
            meal: Some(meal),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["confirmed"], true);
        assert_eq!(json["notes"], "kids loved it");
        assert_eq!(json["meal"]["name"], "Pad Thai");
    }
}
