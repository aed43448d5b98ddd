//! Spaced repetition for segment practice.
//!
//! Segments move through three stages: unstarted (no progress), learning
//! (one completion) and reviewable (two or more). Reviewable segments carry
//! a next-review time; once it passes they join the due queue.

pub mod ladder;
pub mod navigation;

pub use ladder::{IntervalLadder, AGAIN_INTERVAL, COMPLETIONS_FOR_REVIEW, DEFAULT_STEPS, FIRST_REVIEW_INTERVAL};
pub use navigation::{choose_next_segment, NextSegment};

use crate::types::{ProgressMap, Quality, VerseProgress};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

static DEFAULT_LADDER: Lazy<IntervalLadder> = Lazy::new(IntervalLadder::default);

/// Next interval on the default ladder.
pub fn get_next_interval(quality: Quality, current_interval: u64) -> u64 {
    DEFAULT_LADDER.next_interval(quality, current_interval)
}

/// Progress after a segment's first completion.
pub fn create_initial_progress(now: DateTime<Utc>) -> VerseProgress {
    VerseProgress {
        completions: 1,
        interval: 0,
        next_review: None,
        last_completed: now,
        last_reviewed: None,
    }
}

/// Progress after another completion (`quality` is `None`) or a rated review,
/// on the default ladder.
pub fn update_progress(
    current: &VerseProgress,
    quality: Option<Quality>,
    now: DateTime<Utc>,
) -> VerseProgress {
    DEFAULT_LADDER.update_progress(current, quality, now)
}

/// Whether a segment has entered review rotation and its time has come.
pub fn is_verse_due(progress: &VerseProgress, now: DateTime<Utc>) -> bool {
    DEFAULT_LADDER.is_due(progress, now)
}

/// Due segment numbers, earliest next-review first.
pub fn get_due_reviews(progress: &ProgressMap, now: DateTime<Utc>) -> Vec<u32> {
    DEFAULT_LADDER.due_reviews(progress, now)
}

/// Human-readable countdown: `now`, `42s`, or `3m 5s`.
pub fn format_time_until(ms: i64) -> String {
    if ms <= 0 {
        return "now".to_string();
    }
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn progress(completions: u32, next_review: Option<DateTime<Utc>>) -> VerseProgress {
        VerseProgress {
            completions,
            interval: 120_000,
            next_review,
            last_completed: Utc::now(),
            last_reviewed: None,
        }
    }

    #[test]
    fn due_queue_orders_by_next_review() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(3, Some(now - Duration::milliseconds(5000))));
        map.insert(2, progress(2, Some(now - Duration::milliseconds(10000))));
        map.insert(3, progress(4, Some(now - Duration::milliseconds(2000))));
        assert_eq!(get_due_reviews(&map, now), vec![2, 1, 3]);
    }

    #[test]
    fn due_requires_two_completions_and_past_time() {
        let now = Utc::now();
        assert!(!is_verse_due(&progress(1, Some(now - Duration::seconds(1))), now));
        assert!(!is_verse_due(&progress(2, None), now));
        assert!(!is_verse_due(&progress(2, Some(now + Duration::seconds(1))), now));
        assert!(is_verse_due(&progress(2, Some(now)), now));
    }

    #[test]
    fn due_ties_keep_segment_order() {
        let now = Utc::now();
        let at = now - Duration::seconds(30);
        let mut map = ProgressMap::new();
        map.insert(7, progress(2, Some(at)));
        map.insert(4, progress(2, Some(at)));
        map.insert(5, progress(1, Some(at)));
        assert_eq!(get_due_reviews(&map, now), vec![4, 7]);
    }

    #[test]
    fn due_queue_is_idempotent() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(2, Some(now - Duration::seconds(3))));
        assert_eq!(get_due_reviews(&map, now), get_due_reviews(&map, now));
        assert!(get_due_reviews(&map, now - Duration::seconds(10)).is_empty());
    }

    #[test]
    fn formats_countdown() {
        assert_eq!(format_time_until(0), "now");
        assert_eq!(format_time_until(-5), "now");
        assert_eq!(format_time_until(42_900), "42s");
        assert_eq!(format_time_until(185_000), "3m 5s");
        assert_eq!(format_time_until(60_000), "1m 0s");
    }

    #[test]
    fn initial_progress_is_learning() {
        let now = Utc::now();
        let p = create_initial_progress(now);
        assert_eq!(p.completions, 1);
        assert_eq!(p.interval, 0);
        assert_eq!(p.next_review, None);
        assert_eq!(p.last_completed, now);
    }
}
