use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::meal::MealRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SelectionRow {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub selected_at: DateTime<Utc>,
    pub confirmed: bool,
    pub selected_by: Option<String>,
    pub notes: Option<String>,
}

/// A history record with the meal it points at, as returned by the history API.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionWithMeal {
    #[serde(flatten)]
    pub selection: SelectionRow,
    pub meal: Option<MealRow>,
}
