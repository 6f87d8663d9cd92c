//! Spin outcome: what the caller sees after classify + pick.
//!
//! An empty eligible pool is a valid result. The reason distinguishes an
//! empty catalog from an exhausted session from a fully cooled-down catalog,
//! and the full classification travels with it.

use serde::Serialize;

use crate::eligibility::classifier::EligibilityResult;
use crate::models::meal::MealRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoEligibleReason {
    NoMealsEnabled,
    AllRejectedThisSession,
    AllOnCooldown,
}

impl NoEligibleReason {
    pub fn from_result(result: &EligibilityResult) -> Self {
        if result.total_active == 0 {
            NoEligibleReason::NoMealsEnabled
        } else if result.session_rejected.len() == result.total_active {
            NoEligibleReason::AllRejectedThisSession
        } else {
            NoEligibleReason::AllOnCooldown
        }
    }

    pub fn message(&self, result: &EligibilityResult, cooldown_days: i32) -> String {
        match self {
            NoEligibleReason::NoMealsEnabled => {
                "No meals are enabled. Add or enable meals first.".to_string()
            }
            NoEligibleReason::AllRejectedThisSession => {
                "All meals have been rejected this session.".to_string()
            }
            NoEligibleReason::AllOnCooldown => format!(
                "All {} eligible meals are on cooldown ({} days).",
                result.blocked.len(),
                cooldown_days
            ),
        }
    }
}

/// Recovery hints shown alongside a "no eligible meals" outcome.
pub fn recovery_suggestions(cooldown_days: i32, had_session_rejections: bool) -> Vec<String> {
    let mut suggestions = Vec::new();
    if cooldown_days > 14 {
        suggestions.push("Reduce cooldown to 14 days".to_string());
    }
    if cooldown_days > 7 {
        suggestions.push("Reduce cooldown to 7 days".to_string());
    }
    if had_session_rejections {
        suggestions.push("Reset session rejections".to_string());
    }
    suggestions.push("Add more meals".to_string());
    suggestions
}

/// Response body of a spin.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SpinOutcome {
    Selected {
        selected_meal: MealRow,
        eligibility: EligibilityResult,
    },
    NoEligibleMeals {
        no_eligible_meals: bool,
        reason_code: NoEligibleReason,
        reason: String,
        eligibility: EligibilityResult,
        suggestions: Vec<String>,
    },
}

impl SpinOutcome {
    pub fn build(
        selected: Option<MealRow>,
        eligibility: EligibilityResult,
        cooldown_days: i32,
        had_session_rejections: bool,
    ) -> Self {
        match selected {
            Some(selected_meal) => SpinOutcome::Selected {
                selected_meal,
                eligibility,
            },
            None => {
                let reason_code = NoEligibleReason::from_result(&eligibility);
                SpinOutcome::NoEligibleMeals {
                    no_eligible_meals: true,
                    reason_code,
                    reason: reason_code.message(&eligibility, cooldown_days),
                    eligibility,
                    suggestions: recovery_suggestions(cooldown_days, had_session_rejections),
                }
            }
        }
    }
}
