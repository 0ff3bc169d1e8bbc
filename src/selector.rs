use crate::models::{Product, Shift};
use chrono::{Datelike, NaiveDate};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::env;
use std::hash::{Hash, Hasher};

/// How the daily 3-item package is carved out of the candidate list.
///
/// Both policies are deterministic for a fixed calendar date. Rotation also
/// guarantees disjoint selections across the three shifts whenever the
/// candidate count is a multiple of 3; shuffle does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Rotate the whole list left by `ordinal_day % len`, then slice the
    /// shift window. Default, matches the original service.
    Rotation,
    /// Permute the whole list with a generator seeded from `{date}-{shift}`,
    /// then slice the shift window.
    Shuffle,
}

impl SelectionPolicy {
    pub fn from_env() -> Self {
        match env::var("SELECTION_POLICY") {
            Ok(value) if value.trim().eq_ignore_ascii_case("shuffle") => Self::Shuffle,
            _ => Self::Rotation,
        }
    }
}

/// Picks at most 3 candidates for `shift` on `today`. Candidates are
/// expected pre-sorted by popularity; an empty list selects nothing.
pub fn select(
    candidates: &[Product],
    shift: Shift,
    today: NaiveDate,
    policy: SelectionPolicy,
) -> Vec<Product> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let arranged = match policy {
        SelectionPolicy::Rotation => rotate_for_day(candidates, today),
        SelectionPolicy::Shuffle => shuffle_for_day(candidates, shift, today),
    };

    let window = shift.window();
    arranged
        .into_iter()
        .skip(window.start)
        .take(window.len())
        .collect()
}

fn rotate_for_day(candidates: &[Product], today: NaiveDate) -> Vec<Product> {
    let offset = (today.num_days_from_ce() as usize) % candidates.len();
    let mut arranged = candidates.to_vec();
    arranged.rotate_left(offset);
    arranged
}

fn shuffle_for_day(candidates: &[Product], shift: Shift, today: NaiveDate) -> Vec<Product> {
    let mut arranged = candidates.to_vec();
    let mut rng = SmallRng::seed_from_u64(daily_seed(shift, today));
    arranged.shuffle(&mut rng);
    arranged
}

/// Stable seed for one (date, shift) pair, so a package never changes
/// within its posting window.
fn daily_seed(shift: Shift, today: NaiveDate) -> u64 {
    let mut hasher = DefaultHasher::new();
    format!("{}-{}", today.format("%Y-%m-%d"), shift.as_str()).hash(&mut hasher);
    hasher.finish()
}
