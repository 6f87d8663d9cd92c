// Meal eligibility and random selection.
// Pure computation over a snapshot: classifier partitions the active catalog,
// selector draws from the eligible pool, outcome explains an empty pool.

pub mod classifier;
pub mod handlers;
pub mod outcome;
pub mod selector;
