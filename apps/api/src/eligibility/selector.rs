use rand::Rng;

use crate::models::meal::MealRow;

/// Picks one meal uniformly at random from the eligible pool.
/// Returns `None` when the pool is empty.
pub fn pick_random_meal<'a, R>(eligible: &'a [MealRow], rng: &mut R) -> Option<&'a MealRow>
where
    R: Rng + ?Sized,
{
    if eligible.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..eligible.len());
    eligible.get(idx)
}
