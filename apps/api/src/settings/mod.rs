// Cooldown setting: a single row keyed 'singleton', created on first read.

use std::ops::RangeInclusive;

pub mod handlers;
pub mod repo;

/// Cooldown used until a household picks its own.
pub const DEFAULT_COOLDOWN_DAYS: i32 = 21;

/// Accepted cooldown values at the API boundary.
pub const COOLDOWN_DAYS_RANGE: RangeInclusive<i32> = 1..=365;
