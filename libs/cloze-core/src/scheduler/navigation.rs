//! Which segment to offer after a completion or review.

use super::IntervalLadder;
use crate::types::ProgressMap;
use chrono::{DateTime, Utc};

/// Decision returned by [`choose_next_segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextSegment {
    /// Go back one position to re-confirm a segment completed only once.
    StepBack(usize),
    /// Review the earliest due segment.
    Review { index: usize, number: u32 },
    /// Continue in document order.
    Advance(usize),
    /// Last segment reached with nothing due.
    Stay(usize),
}

impl NextSegment {
    /// Position in the segment order to show next.
    pub fn index(&self) -> usize {
        match *self {
            Self::StepBack(index) | Self::Advance(index) | Self::Stay(index) => index,
            Self::Review { index, .. } => index,
        }
    }

    /// Segment number entering review, if any.
    pub fn reviewing(&self) -> Option<u32> {
        match *self {
            Self::Review { number, .. } => Some(number),
            _ => None,
        }
    }
}

/// Pick the next segment position.
///
/// `order` lists segment numbers in document order and `progress` must
/// already include the action just taken on `order[current_index]`.
/// Stepping back applies only right after a first completion, when the
/// previous segment also has exactly one completion. Otherwise the earliest
/// due segment (other than the current one) wins over document order.
pub fn choose_next_segment(
    ladder: &IntervalLadder,
    order: &[u32],
    progress: &ProgressMap,
    current_index: usize,
    just_completed_first_time: bool,
    now: DateTime<Utc>,
) -> NextSegment {
    if just_completed_first_time && current_index > 0 {
        let previous = order
            .get(current_index - 1)
            .and_then(|number| progress.get(number));
        if previous.is_some_and(|p| p.completions == 1) {
            return NextSegment::StepBack(current_index - 1);
        }
    }

    let current_number = order.get(current_index).copied();
    let due = ladder
        .due_reviews(progress, now)
        .into_iter()
        .filter(|&number| Some(number) != current_number)
        .find_map(|number| {
            order
                .iter()
                .position(|&n| n == number)
                .map(|index| (index, number))
        });
    if let Some((index, number)) = due {
        return NextSegment::Review { index, number };
    }

    if current_index + 1 < order.len() {
        NextSegment::Advance(current_index + 1)
    } else {
        NextSegment::Stay(current_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VerseProgress;
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

    fn choose(progress: &ProgressMap, current: usize, first_time: bool, now: DateTime<Utc>) -> NextSegment {
        choose_next_segment(&IntervalLadder::default(), &[1, 2, 3, 4], progress, current, first_time, now)
    }

    #[test]
    fn advances_in_order_when_nothing_due() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(1, None));
        assert_eq!(choose(&map, 0, true, now), NextSegment::Advance(1));
    }

    #[test]
    fn steps_back_to_reconfirm_previous() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(1, None));
        map.insert(2, progress(1, None));
        assert_eq!(choose(&map, 1, true, now), NextSegment::StepBack(0));
    }

    #[test]
    fn no_step_back_once_previous_is_confirmed() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(2, Some(now + Duration::minutes(2))));
        map.insert(2, progress(1, None));
        assert_eq!(choose(&map, 1, true, now), NextSegment::Advance(2));
    }

    #[test]
    fn no_step_back_unless_first_completion() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(1, None));
        map.insert(2, progress(2, Some(now + Duration::minutes(2))));
        assert_eq!(choose(&map, 1, false, now), NextSegment::Advance(2));
    }

    #[test]
    fn due_segment_beats_document_order() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(1, progress(2, Some(now - Duration::seconds(5))));
        map.insert(2, progress(3, Some(now - Duration::seconds(50))));
        map.insert(3, progress(1, None));
        let next = choose(&map, 2, true, now);
        assert_eq!(next, NextSegment::Review { index: 1, number: 2 });
        assert_eq!(next.index(), 1);
        assert_eq!(next.reviewing(), Some(2));
    }

    #[test]
    fn current_segment_is_not_offered_for_review() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(3, progress(2, Some(now - Duration::seconds(5))));
        assert_eq!(choose(&map, 2, false, now), NextSegment::Advance(3));
    }

    #[test]
    fn stays_on_last_segment() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(4, progress(1, None));
        assert_eq!(choose(&map, 3, true, now), NextSegment::Stay(3));
        assert_eq!(NextSegment::Stay(3).reviewing(), None);
    }

    #[test]
    fn due_segment_missing_from_order_is_skipped() {
        let now = Utc::now();
        let mut map = ProgressMap::new();
        map.insert(9, progress(2, Some(now - Duration::seconds(5))));
        assert_eq!(choose(&map, 0, false, now), NextSegment::Advance(1));
    }
}
