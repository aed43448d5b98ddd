//! Fixed-ladder interval scheduling.
//!
//! Intervals are short (minutes, not days): the ladder is tuned for a single
//! memorization sitting.

use crate::types::{ProgressMap, Quality, VerseProgress};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 1 minute.
pub const AGAIN_INTERVAL: u64 = 60_000;
/// 2 minutes.
pub const FIRST_REVIEW_INTERVAL: u64 = 120_000;
/// 0, 1m, 2m, 5m, 10m, 20m, 30m.
pub const DEFAULT_STEPS: [u64; 7] = [0, 60_000, 120_000, 300_000, 600_000, 1_200_000, 1_800_000];
/// Completions before a segment joins review rotation.
pub const COMPLETIONS_FOR_REVIEW: u32 = 2;

/// Interval ladder with configurable rungs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalLadder {
    /// Ascending rungs in milliseconds.
    pub steps: Vec<u64>,
    pub again_interval: u64,
    pub first_review_interval: u64,
    pub completions_for_review: u32,
}

impl Default for IntervalLadder {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS.to_vec(),
            again_interval: AGAIN_INTERVAL,
            first_review_interval: FIRST_REVIEW_INTERVAL,
            completions_for_review: COMPLETIONS_FOR_REVIEW,
        }
    }
}

impl IntervalLadder {
    /// Interval following `current_interval` for a review of `quality`.
    ///
    /// The current rung is the smallest step at or above the interval, or
    /// the top step when the interval exceeds the ladder.
    pub fn next_interval(&self, quality: Quality, current_interval: u64) -> u64 {
        if quality == Quality::Again {
            return self.again_interval;
        }
        let Some(top) = self.steps.len().checked_sub(1) else {
            return current_interval;
        };
        let rung = self
            .steps
            .iter()
            .position(|&step| step >= current_interval)
            .unwrap_or(top);

        match quality {
            Quality::Hard => self.steps[rung],
            Quality::Again | Quality::Easy => self.steps[(rung + 1).min(top)],
        }
    }

    /// Progress after completing a segment outside a review.
    pub fn complete(&self, current: Option<&VerseProgress>, now: DateTime<Utc>) -> VerseProgress {
        match current {
            Some(progress) => self.update_progress(progress, None, now),
            None => super::create_initial_progress(now),
        }
    }

    /// Progress after a rated review.
    ///
    /// A segment reviewed without recorded progress is treated as freshly
    /// reviewable.
    pub fn review(
        &self,
        current: Option<&VerseProgress>,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> VerseProgress {
        let base = current.cloned().unwrap_or_else(|| VerseProgress {
            completions: self.completions_for_review,
            interval: self.first_review_interval,
            next_review: None,
            last_completed: now,
            last_reviewed: None,
        });
        self.update_progress(&base, Some(quality), now)
    }

    /// Apply one completion, rated when `quality` is given.
    pub fn update_progress(
        &self,
        current: &VerseProgress,
        quality: Option<Quality>,
        now: DateTime<Utc>,
    ) -> VerseProgress {
        let completions = current.completions.saturating_add(1);

        let interval = match quality {
            Some(quality) => Some(self.next_interval(quality, current.interval)),
            None if completions == self.completions_for_review => Some(self.first_review_interval),
            None if completions > self.completions_for_review => {
                Some(self.next_interval(Quality::Easy, current.interval))
            }
            None => None,
        };

        let (interval, next_review) = match interval {
            None => (current.interval, None),
            Some(ms) => match review_time(now, ms) {
                Some(at) => (ms, Some(at)),
                None => {
                    tracing::warn!(interval = ms, "interval out of range; keeping current interval");
                    let at = review_time(now, current.interval).or(current.next_review);
                    (current.interval, at)
                }
            },
        };

        VerseProgress {
            completions,
            interval,
            next_review,
            last_completed: now,
            last_reviewed: if quality.is_some() {
                Some(now)
            } else {
                current.last_reviewed
            },
        }
    }

    pub fn is_due(&self, progress: &VerseProgress, now: DateTime<Utc>) -> bool {
        progress.completions >= self.completions_for_review
            && progress.next_review.is_some_and(|at| at <= now)
    }

    /// Due segment numbers, earliest next-review first; ties by segment number.
    pub fn due_reviews(&self, progress: &ProgressMap, now: DateTime<Utc>) -> Vec<u32> {
        let mut due: Vec<(u32, DateTime<Utc>)> = progress
            .iter()
            .filter(|(_, p)| self.is_due(p, now))
            .filter_map(|(&number, p)| p.next_review.map(|at| (number, at)))
            .collect();
        due.sort_by_key(|&(_, at)| at);
        due.into_iter().map(|(number, _)| number).collect()
    }
}

fn review_time(now: DateTime<Utc>, ms: u64) -> Option<DateTime<Utc>> {
    let ms = i64::try_from(ms).ok()?;
    now.checked_add_signed(Duration::milliseconds(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ladder() -> IntervalLadder {
        IntervalLadder::default()
    }

    #[test]
    fn again_resets_to_one_minute() {
        for current in [0, 60_000, 120_000, 1_800_000, 5_000_000] {
            assert_eq!(ladder().next_interval(Quality::Again, current), 60_000);
        }
    }

    #[test]
    fn hard_holds_the_rung() {
        assert_eq!(ladder().next_interval(Quality::Hard, 120_000), 120_000);
        assert_eq!(ladder().next_interval(Quality::Hard, 90_000), 120_000);
        assert_eq!(ladder().next_interval(Quality::Hard, 0), 0);
    }

    #[test]
    fn easy_climbs_one_rung() {
        assert_eq!(ladder().next_interval(Quality::Easy, 120_000), 300_000);
        assert_eq!(ladder().next_interval(Quality::Easy, 90_000), 300_000);
    }

    #[test]
    fn easy_is_capped_at_top() {
        assert_eq!(ladder().next_interval(Quality::Easy, 1_800_000), 1_800_000);
        assert_eq!(ladder().next_interval(Quality::Easy, 9_000_000), 1_800_000);
    }

    #[test]
    fn easy_walks_the_ladder() {
        let mut interval = 0;
        let mut walked = vec![interval];
        for _ in 0..7 {
            interval = ladder().next_interval(Quality::Easy, interval);
            walked.push(interval);
        }
        assert!(walked.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(&walked[..7], &DEFAULT_STEPS[..]);
        assert_eq!(walked[7], 1_800_000);
    }

    #[test]
    fn second_completion_enters_review() {
        let now = Utc::now();
        let first = ladder().complete(None, now);
        assert_eq!(first.next_review, None);

        let second = ladder().complete(Some(&first), now);
        assert_eq!(second.completions, 2);
        assert_eq!(second.interval, FIRST_REVIEW_INTERVAL);
        assert_eq!(second.next_review, Some(now + Duration::milliseconds(120_000)));
    }

    #[test]
    fn further_completions_advance_like_easy() {
        let now = Utc::now();
        let progress = VerseProgress {
            completions: 2,
            interval: 120_000,
            next_review: Some(now),
            last_completed: now,
            last_reviewed: None,
        };
        let next = ladder().complete(Some(&progress), now);
        assert_eq!(next.completions, 3);
        assert_eq!(next.interval, 300_000);
        assert_eq!(next.last_reviewed, None);
    }

    #[test]
    fn review_sets_timestamps() {
        let now = Utc::now();
        let progress = VerseProgress {
            completions: 4,
            interval: 600_000,
            next_review: Some(now),
            last_completed: now - Duration::minutes(10),
            last_reviewed: None,
        };
        let next = ladder().review(Some(&progress), Quality::Hard, now);
        assert_eq!(next.completions, 5);
        assert_eq!(next.interval, 600_000);
        assert_eq!(next.next_review, Some(now + Duration::minutes(10)));
        assert_eq!(next.last_reviewed, Some(now));
        assert_eq!(next.last_completed, now);
    }

    #[test]
    fn review_without_progress_starts_from_first_review() {
        let now = Utc::now();
        let next = ladder().review(None, Quality::Easy, now);
        assert_eq!(next.completions, 3);
        assert_eq!(next.interval, 300_000);
    }

    #[test]
    fn empty_ladder_degrades() {
        let empty = IntervalLadder {
            steps: Vec::new(),
            ..IntervalLadder::default()
        };
        assert_eq!(empty.next_interval(Quality::Easy, 5_000), 5_000);
        assert_eq!(empty.next_interval(Quality::Again, 5_000), AGAIN_INTERVAL);
    }

    #[test]
    fn completions_saturate() {
        let now = Utc::now();
        let progress = VerseProgress {
            completions: u32::MAX,
            interval: 120_000,
            next_review: Some(now),
            last_completed: now,
            last_reviewed: None,
        };
        let next = ladder().complete(Some(&progress), now);
        assert_eq!(next.completions, u32::MAX);
        assert_eq!(next.interval, 300_000);
    }

    #[test]
    fn out_of_range_interval_keeps_current() {
        let now = Utc::now();
        let huge = IntervalLadder {
            first_review_interval: u64::MAX,
            steps: vec![0, 60_000, i64::MAX as u64],
            ..IntervalLadder::default()
        };
        let first = huge.complete(None, now);
        let second = huge.complete(Some(&first), now);
        assert_eq!(second.completions, 2);
        assert_eq!(second.interval, first.interval);
        assert_eq!(second.next_review, Some(now));

        let progress = VerseProgress {
            completions: 3,
            interval: 60_000,
            next_review: Some(now),
            last_completed: now,
            last_reviewed: None,
        };
        let reviewed = huge.review(Some(&progress), Quality::Easy, now);
        assert_eq!(reviewed.interval, 60_000);
        assert_eq!(reviewed.next_review, Some(now + Duration::minutes(1)));
    }
}
