use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::settings::AppSettingsRow;
use crate::settings::repo::{get_or_create_settings, set_cooldown_days};
use crate::settings::COOLDOWN_DAYS_RANGE;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Integer or numeric string.
    pub cooldown_days: Option<Value>,
}

/// GET /api/v1/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<AppSettingsRow>, AppError> {
    let settings = get_or_create_settings(&state.db, state.config.default_cooldown_days).await?;
    Ok(Json(settings))
}

/// PATCH /api/v1/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<AppSettingsRow>, AppError> {
    let days = parse_cooldown_value(req.cooldown_days.as_ref())?;
    let settings = set_cooldown_days(&state.db, days).await?;
    info!("Cooldown set to {} days", settings.cooldown_days);
    Ok(Json(settings))
}

/// Rejects cooldowns outside the accepted range.
pub fn validate_cooldown_days(days: i64) -> Result<i32, AppError> {
    i32::try_from(days)
        .ok()
        .filter(|d| COOLDOWN_DAYS_RANGE.contains(d))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "cooldown_days must be between {} and {}",
                COOLDOWN_DAYS_RANGE.start(),
                COOLDOWN_DAYS_RANGE.end()
            ))
        })
}

fn parse_cooldown_value(value: Option<&Value>) -> Result<i32, AppError> {
    let value = match value {
        None | Some(Value::Null) => {
            return Err(AppError::Validation("cooldown_days is required".to_string()))
        }
        Some(v) => v,
    };

    let days = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match days {
        Some(days) => validate_cooldown_days(days),
        None => Err(AppError::Validation(
            "cooldown_days must be an integer".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_cooldown_rejected() {
        assert!(matches!(parse_cooldown_value(None), Err(AppError::Validation(_))));
        assert!(matches!(
            parse_cooldown_value(Some(&Value::Null)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_numeric_and_string_accepted() {
        assert_eq!(parse_cooldown_value(Some(&json!(14))).unwrap(), 14);
        assert_eq!(parse_cooldown_value(Some(&json!("30"))).unwrap(), 30);
    }

    #[test]
    fn test_out_of_range_rejected() {
        for bad in [json!(0), json!(366), json!(-1), json!("1000")] {
            assert!(
                parse_cooldown_value(Some(&bad)).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_integer_rejected() {
        assert!(parse_cooldown_value(Some(&json!(7.5))).is_err());
        assert!(parse_cooldown_value(Some(&json!("a week"))).is_err());
        assert!(parse_cooldown_value(Some(&json!([7]))).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert_eq!(validate_cooldown_days(1).unwrap(), 1);
        assert_eq!(validate_cooldown_days(365).unwrap(), 365);
        assert!(validate_cooldown_days(i64::MAX).is_err());
    }
}
