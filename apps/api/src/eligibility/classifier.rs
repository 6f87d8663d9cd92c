//! Eligibility Classifier: partitions the active catalog into eligible,
//! cooldown-blocked and session-rejected meals.
//!
//! Pure function over an already-fetched snapshot. The last-selected map is
//! rebuilt on every call because history is mutated by the selections API.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::meal::MealRow;
use crate::models::selection::SelectionRow;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// An active meal that was confirmed inside the cooldown window.
#[derive(Debug, Clone, Serialize)]
pub struct BlockedMeal {
    pub meal: MealRow,
    pub last_selected_at: DateTime<Utc>,
    pub unblocks_at: DateTime<Utc>,
    pub days_until_unblocked: i64,
}

/// Classification of the active catalog. Each grouping keeps catalog order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EligibilityResult {
    pub eligible: Vec<MealRow>,
    pub blocked: Vec<BlockedMeal>,
    pub session_rejected: Vec<MealRow>,
    /// Enabled, non-deleted meals considered by the classifier.
    pub total_active: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Classifies the catalog as of the current instant.
pub fn classify(
    meals: &[MealRow],
    history: &[SelectionRow],
    cooldown_days: i32,
    session_rejected_ids: &HashSet<Uuid>,
) -> EligibilityResult {
    classify_at(meals, history, cooldown_days, session_rejected_ids, Utc::now())
}

/// Classifies the catalog as of `now`.
///
/// Algorithm:
/// 1. Keep enabled, non-deleted meals; everything else is invisible
/// 2. Fold confirmed history into `meal_id → latest selected_at`
/// 3. `cutoff = now − cooldown_days`
/// 4. Per active meal: session-rejected wins, then blocked if last selected
///    strictly after `cutoff`, otherwise eligible
pub fn classify_at(
    meals: &[MealRow],
    history: &[SelectionRow],
    cooldown_days: i32,
    session_rejected_ids: &HashSet<Uuid>,
    now: DateTime<Utc>,
) -> EligibilityResult {
    let active: Vec<&MealRow> = meals.iter().filter(|m| m.is_active()).collect();
    let last_selected = latest_confirmed_by_meal(history);

    let window = Duration::days(i64::from(cooldown_days));
    let cutoff = shift(now, -window);

    let mut result = EligibilityResult {
        total_active: active.len(),
        ..EligibilityResult::default()
    };

    for meal in active {
        if session_rejected_ids.contains(&meal.id) {
            result.session_rejected.push(meal.clone());
            continue;
        }

        match last_selected.get(&meal.id) {
            Some(&last) if last > cutoff => {
                let unblocks_at = shift(last, window);
                result.blocked.push(BlockedMeal {
                    meal: meal.clone(),
                    last_selected_at: last,
                    unblocks_at,
                    days_until_unblocked: days_until(now, unblocks_at),
                });
            }
            _ => result.eligible.push(meal.clone()),
        }
    }

    result
}

/// Most recent confirmed selection per meal. Unconfirmed draws are ignored.
fn latest_confirmed_by_meal(history: &[SelectionRow]) -> HashMap<Uuid, DateTime<Utc>> {
    history
        .iter()
        .filter(|s| s.confirmed)
        .fold(HashMap::new(), |mut latest, s| {
            latest
                .entry(s.meal_id)
                .and_modify(|at: &mut DateTime<Utc>| {
                    if s.selected_at > *at {
                        *at = s.selected_at;
                    }
                })
                .or_insert(s.selected_at);
            latest
        })
}

/// Whole days from `now` until `until`, rounded up.
fn days_until(now: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// `ts + delta`, saturating at the representable range.
fn shift(ts: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    ts.checked_add_signed(delta).unwrap_or(if delta < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
