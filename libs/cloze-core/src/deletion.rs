//! Choosing which words to hide.
//!
//! The base selection for a percentage is reproducible: it depends only on
//! the percentage and the word list, so a saved percentage rebuilds the same
//! hidden set. Growing or shrinking an existing set draws from the injected
//! RNG instead.

use crate::types::Token;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Fewest words hidden at any percentage.
pub const MIN_DELETED_WORDS: usize = 2;
/// Percentage change for one harder/easier step.
pub const PERCENTAGE_STEP: u32 = 5;
/// Percentage at which practice moves to one segment at a time.
pub const SEGMENT_MODE_THRESHOLD: u32 = 50;

/// Hash a seed to [0, 1).
///
/// Fractional part of `sin(seed) * 10000`. Not uniform, only repeatable.
fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

/// Target number of hidden words: `max(2, round(total * percentage / 100))`.
///
/// Not clamped to `total_words`; the selectors clamp.
pub fn calculate_deletion_count(total_words: usize, percentage: u32) -> usize {
    let rounded = (total_words * percentage as usize + 50) / 100;
    rounded.max(MIN_DELETED_WORDS)
}

/// Lowest percentage the easier action may reach for a passage.
pub fn calculate_min_percentage(total_words: usize) -> u32 {
    if total_words == 0 {
        return PERCENTAGE_STEP;
    }
    let five_percent = (total_words * 5).div_ceil(100);
    let min_words = five_percent.min(10).max(MIN_DELETED_WORDS);
    let percentage = (min_words * 100).div_ceil(total_words);
    (percentage as u32).max(PERCENTAGE_STEP)
}

/// Pick the hidden word indices for a percentage, sorted ascending.
///
/// The i-th pick indexes into the shrinking pool of unpicked words using
/// seed `i + percentage * 1000`.
pub fn select_words_to_delete(tokens: &[Token], percentage: u32, total_words: usize) -> Vec<usize> {
    let mut available: Vec<usize> = tokens.iter().filter_map(|t| t.word_index).collect();
    let count = calculate_deletion_count(total_words, percentage)
        .min(total_words)
        .min(available.len());

    let mut selected = Vec::with_capacity(count);
    for i in 0..count {
        let seed = i as f64 + f64::from(percentage) * 1000.0;
        let pick = (seeded_random(seed) * available.len() as f64) as usize;
        selected.push(available.remove(pick.min(available.len() - 1)));
    }

    selected.sort_unstable();
    selected
}

/// Grow the hidden set to `target_count`, keeping every current index.
pub fn add_more_deletions<R: Rng + ?Sized>(
    tokens: &[Token],
    current_indices: &[usize],
    target_count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let present: HashSet<usize> = current_indices.iter().copied().collect();
    let available: Vec<usize> = tokens
        .iter()
        .filter_map(|t| t.word_index)
        .filter(|i| !present.contains(i))
        .collect();

    let to_add = target_count
        .saturating_sub(current_indices.len())
        .min(available.len());
    if to_add == 0 {
        return current_indices.to_vec();
    }

    let mut indices = current_indices.to_vec();
    indices.extend(available.choose_multiple(rng, to_add).copied());
    indices.sort_unstable();
    indices
}

/// Shrink the hidden set to `target_count` by dropping random indices.
pub fn remove_deletions<R: Rng + ?Sized>(
    current_indices: &[usize],
    target_count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if target_count >= current_indices.len() {
        return current_indices.to_vec();
    }

    let mut shuffled = current_indices.to_vec();
    shuffled.shuffle(rng);
    let mut kept = shuffled.split_off(current_indices.len() - target_count);
    kept.sort_unstable();
    kept
}
