use std::collections::HashSet;

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::eligibility::classifier::{classify, EligibilityResult};
use crate::eligibility::outcome::SpinOutcome;
use crate::eligibility::selector::pick_random_meal;
use crate::errors::AppError;
use crate::meals::repo::list_meals;
use crate::models::meal::MealRow;
use crate::models::selection::SelectionRow;
use crate::selections::repo::list_all_confirmed;
use crate::settings::handlers::validate_cooldown_days;
use crate::settings::repo::get_or_create_settings;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SpinRequest {
    #[serde(default)]
    pub session_rejected_ids: Vec<Uuid>,
    /// One-off override of the stored cooldown.
    pub cooldown_days: Option<i64>,
}

impl SpinRequest {
    /// An empty body means "no overrides"; anything else must parse.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(SpinRequest::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Invalid spin request: {e}")))
    }
}

/// Meals, confirmed history and effective cooldown read for one spin.
struct Snapshot {
    meals: Vec<MealRow>,
    history: Vec<SelectionRow>,
    cooldown_days: i32,
}

async fn load_snapshot(
    state: &AppState,
    cooldown_override: Option<i32>,
) -> Result<Snapshot, AppError> {
    let meals = list_meals(&state.db, true).await?;
    let history = list_all_confirmed(&state.db).await?;
    let cooldown_days = match cooldown_override {
        Some(days) => days,
        None => {
            get_or_create_settings(&state.db, state.config.default_cooldown_days)
                .await?
                .cooldown_days
        }
    };
    Ok(Snapshot {
        meals,
        history,
        cooldown_days,
    })
}

/// POST /api/v1/spin
pub async fn handle_spin(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SpinOutcome>, AppError> {
    let req = SpinRequest::from_body(&body)?;
    let cooldown_override = req.cooldown_days.map(validate_cooldown_days).transpose()?;

    let snapshot = load_snapshot(&state, cooldown_override).await?;
    let rejected: HashSet<Uuid> = req.session_rejected_ids.iter().copied().collect();

    let eligibility = classify(
        &snapshot.meals,
        &snapshot.history,
        snapshot.cooldown_days,
        &rejected,
    );
    let selected = {
        let mut rng = rand::thread_rng();
        pick_random_meal(&eligibility.eligible, &mut rng).cloned()
    };

    match &selected {
        Some(meal) => info!(
            "Spin picked {} ({} eligible, {} blocked, {} rejected)",
            meal.name,
            eligibility.eligible.len(),
            eligibility.blocked.len(),
            eligibility.session_rejected.len()
        ),
        None => info!(
            "Spin found no eligible meal ({} active, {} blocked, {} rejected, cooldown {} days)",
            eligibility.total_active,
            eligibility.blocked.len(),
            eligibility.session_rejected.len(),
            snapshot.cooldown_days
        ),
    }

    Ok(Json(SpinOutcome::build(
        selected,
        eligibility,
        snapshot.cooldown_days,
        !rejected.is_empty(),
    )))
}

/// GET /api/v1/eligibility
pub async fn handle_get_eligibility(
    State(state): State<AppState>,
) -> Result<Json<EligibilityResult>, AppError> {
    let snapshot = load_snapshot(&state, None).await?;
    Ok(Json(classify(
        &snapshot.meals,
        &snapshot.history,
        snapshot.cooldown_days,
        &HashSet::new(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_defaults() {
        for body in [&b""[..], &b"  \n"[..]] {
            let req = SpinRequest::from_body(body).unwrap();
            assert!(req.session_rejected_ids.is_empty());
            assert_eq!(req.cooldown_days, None);
        }
    }

    #[test]
    fn test_valid_body_parsed() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"session_rejected_ids":["{id}"],"cooldown_days":7}}"#);
        let req = SpinRequest::from_body(body.as_bytes()).unwrap();
        assert_eq!(req.session_rejected_ids, vec![id]);
        assert_eq!(req.cooldown_days, Some(7));
    }

    #[test]
    fn test_bad_rejected_id_is_an_error() {
        let body = br#"{"cooldown_days":0,"session_rejected_ids":["not-a-uuid"]}"#;
        assert!(matches!(
            SpinRequest::from_body(body),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_non_integer_cooldown_is_an_error() {
        assert!(matches!(
            SpinRequest::from_body(br#"{"cooldown_days":"soon"}"#),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            SpinRequest::from_body(b"{not json"),
            Err(AppError::Validation(_))
        ));
    }
}
