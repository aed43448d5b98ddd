//! Practice session state machine.
//!
//! A session starts in percentage mode, where a growing share of the passage
//! is hidden. Once the percentage reaches the segment-mode threshold it
//! switches to reciting one segment at a time, with completed segments fed
//! to the review scheduler.

use crate::deletion::{
    add_more_deletions, calculate_deletion_count, calculate_min_percentage, remove_deletions,
    select_words_to_delete,
};
use crate::error::{Error, Result};
use crate::optional::prepare_text;
use crate::scheduler::{choose_next_segment, IntervalLadder, NextSegment};
use crate::segmenter::{map_segment_word_indices, parse_verses};
use crate::tokenizer::{tokenize, word_count};
use crate::types::{PassageKind, ProgressMap, ProgressRecord, Quality, Segment, Token, TrainerSettings};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How words are hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    /// Hide the deletion set across the whole passage.
    Percentage,
    /// Hide every word of the active segment.
    Segment,
}

impl Default for PracticeMode {
    fn default() -> Self {
        Self::Percentage
    }
}

/// A user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Harder,
    Easier,
    ToggleShowAll,
    ToggleSegmentMode,
    CompleteSegment,
    SubmitReviewQuality(Quality),
    StartReview(u32),
    PreviousSegment,
}

impl Action {
    /// Parse a kebab-case action name and its optional argument.
    ///
    /// `submit-review-quality` takes a quality (default `easy`),
    /// `start-review` a segment number.
    pub fn parse(name: &str, argument: Option<&str>) -> Result<Self> {
        let action = match name {
            "harder" => Self::Harder,
            "easier" => Self::Easier,
            "toggle-show-all" => Self::ToggleShowAll,
            "toggle-segment-mode" => Self::ToggleSegmentMode,
            "complete-segment" => Self::CompleteSegment,
            "previous-segment" => Self::PreviousSegment,
            "submit-review-quality" => Self::SubmitReviewQuality(Quality::from(argument.unwrap_or("easy"))),
            "start-review" => {
                let number = argument
                    .and_then(|value| value.parse().ok())
                    .ok_or_else(|| Error::InvalidActionArgument {
                        action: name.to_string(),
                        value: argument.map(str::to_string),
                    })?;
                Self::StartReview(number)
            }
            other => return Err(Error::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

/// Navigation state not covered by the persisted record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionCursor {
    pub mode: PracticeMode,
    /// Position in segment order (titles excluded).
    pub current_index: usize,
    /// Segment being reviewed from the due queue.
    pub reviewing: Option<u32>,
    /// Segment whose review was recited and awaits a quality rating.
    pub awaiting_quality: Option<u32>,
    pub show_all: bool,
}

/// Session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keep optional spans instead of removing them.
    pub include_optional: bool,
    pub trainer: TrainerSettings,
    pub ladder: IntervalLadder,
}

/// One learner practicing one passage.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    config: SessionConfig,
    tokens: Vec<Token>,
    total_words: usize,
    segments: Vec<Segment>,
    order: Vec<u32>,
    segment_words: BTreeMap<u32, Vec<usize>>,
    percentage: u32,
    deleted_indices: Vec<usize>,
    verse_progress: ProgressMap,
    cursor: SessionCursor,
}

impl PracticeSession {
    /// Start a passage from scratch.
    pub fn new(text: &str, kind: PassageKind, config: SessionConfig) -> Self {
        let record = ProgressRecord {
            deletion_percentage: config.trainer.initial_percentage,
            ..ProgressRecord::default()
        };
        Self::restore(text, kind, config, record)
    }

    /// Resume a passage from its persisted record.
    ///
    /// An empty deletion set is rebuilt from the percentage. Indices beyond
    /// the passage's word count are dropped.
    pub fn restore(text: &str, kind: PassageKind, config: SessionConfig, record: ProgressRecord) -> Self {
        let processed = prepare_text(text, config.include_optional);
        let tokens = tokenize(&processed);
        let total_words = word_count(&tokens);
        let segments = parse_verses(&processed, kind);
        let order = segments.iter().filter(|s| !s.is_title).map(|s| s.number).collect();
        let segment_words = map_segment_word_indices(&tokens, &segments);
        let percentage = record.deletion_percentage;

        let mut deleted_indices: Vec<usize> = record
            .deleted_indices
            .iter()
            .copied()
            .filter(|&i| i < total_words)
            .collect();
        if deleted_indices.len() != record.deleted_indices.len() {
            tracing::warn!(
                dropped = record.deleted_indices.len() - deleted_indices.len(),
                total_words,
                "dropping deleted indices beyond passage length"
            );
        }
        deleted_indices.sort_unstable();
        deleted_indices.dedup();
        if deleted_indices.is_empty() {
            deleted_indices = select_words_to_delete(&tokens, percentage, total_words);
        }

        let mode = if percentage >= config.trainer.segment_mode_threshold {
            PracticeMode::Segment
        } else {
            PracticeMode::Percentage
        };

        tracing::debug!(total_words, percentage, ?mode, "session restored");

        Self {
            config,
            tokens,
            total_words,
            segments,
            order,
            segment_words,
            percentage,
            deleted_indices,
            verse_progress: record.verse_progress,
            cursor: SessionCursor {
                mode,
                ..SessionCursor::default()
            },
        }
    }

    /// Resume navigation state, discarding references to unknown segments.
    pub fn with_cursor(mut self, cursor: SessionCursor) -> Self {
        let known = |number: &u32| self.order.contains(number);
        self.cursor = SessionCursor {
            current_index: cursor.current_index.min(self.order.len().saturating_sub(1)),
            reviewing: cursor.reviewing.filter(known),
            awaiting_quality: cursor.awaiting_quality.filter(known),
            ..cursor
        };
        self
    }

    /// Apply a user action.
    ///
    /// Actions that make no sense in the current state are ignored.
    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, now: DateTime<Utc>, rng: &mut R) {
        match action {
            Action::Harder => self.harder(rng),
            Action::Easier => self.easier(rng),
            Action::ToggleShowAll => self.cursor.show_all = !self.cursor.show_all,
            Action::ToggleSegmentMode => self.toggle_segment_mode(),
            Action::CompleteSegment => self.complete_segment(now),
            Action::SubmitReviewQuality(quality) => self.submit_review_quality(quality, now),
            Action::StartReview(number) => self.start_review(number),
            Action::PreviousSegment => {
                if self.cursor.mode == PracticeMode::Segment {
                    self.cursor.current_index = self.cursor.current_index.saturating_sub(1);
                }
            }
        }
    }

    /// Segment completion is offered only while reciting segments and no
    /// review rating is pending.
    pub fn can_complete_segment(&self) -> bool {
        self.cursor.mode == PracticeMode::Segment
            && self.cursor.awaiting_quality.is_none()
            && self.current_segment_number().is_some()
    }

    pub fn can_make_harder(&self) -> bool {
        self.cursor.mode == PracticeMode::Percentage && self.percentage < 100
    }

    pub fn can_make_easier(&self) -> bool {
        self.cursor.mode == PracticeMode::Percentage && self.percentage > self.min_percentage()
    }

    fn harder<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.can_make_harder() {
            return;
        }
        let percentage = (self.percentage + self.config.trainer.percentage_step).min(100);
        let target = calculate_deletion_count(self.total_words, percentage);
        self.deleted_indices = add_more_deletions(&self.tokens, &self.deleted_indices, target, rng);
        self.percentage = percentage;
        self.cursor.show_all = false;

        if percentage >= self.config.trainer.segment_mode_threshold {
            tracing::debug!(percentage, "switching to segment mode");
            self.cursor.mode = PracticeMode::Segment;
            self.cursor.current_index = 0;
        }
    }

    fn easier<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.can_make_easier() {
            return;
        }
        let percentage = self
            .percentage
            .saturating_sub(self.config.trainer.percentage_step)
            .max(self.min_percentage());
        let target = calculate_deletion_count(self.total_words, percentage);
        self.deleted_indices = remove_deletions(&self.deleted_indices, target, rng);
        self.percentage = percentage;
        self.cursor.show_all = false;
    }

    fn toggle_segment_mode(&mut self) {
        self.cursor.mode = match self.cursor.mode {
            PracticeMode::Percentage => {
                self.cursor.current_index = 0;
                PracticeMode::Segment
            }
            PracticeMode::Segment => PracticeMode::Percentage,
        };
    }

    fn complete_segment(&mut self, now: DateTime<Utc>) {
        if !self.can_complete_segment() {
            return;
        }
        let Some(number) = self.current_segment_number() else {
            return;
        };
        if self.cursor.reviewing.is_some() {
            self.cursor.awaiting_quality = Some(number);
            return;
        }

        let progress = self.config.ladder.complete(self.verse_progress.get(&number), now);
        let first_time = progress.completions == 1;
        tracing::debug!(segment = number, completions = progress.completions, "segment completed");
        self.verse_progress.insert(number, progress);

        let next = self.next_segment(self.cursor.current_index, first_time, now);
        self.follow(next);
    }

    fn submit_review_quality(&mut self, quality: Quality, now: DateTime<Utc>) {
        if self.cursor.mode != PracticeMode::Segment {
            return;
        }
        let Some(number) = self.cursor.awaiting_quality.take() else {
            return;
        };
        let progress = self
            .config
            .ladder
            .review(self.verse_progress.get(&number), quality, now);
        tracing::debug!(segment = number, quality = quality.as_str(), interval = progress.interval, "review rated");
        self.verse_progress.insert(number, progress);
        self.cursor.reviewing = None;

        let index = self
            .order
            .iter()
            .position(|&n| n == number)
            .unwrap_or(self.cursor.current_index);
        let next = self.next_segment(index, false, now);
        self.follow(next);
    }

    fn start_review(&mut self, number: u32) {
        if self.cursor.mode != PracticeMode::Segment {
            return;
        }
        if let Some(index) = self.order.iter().position(|&n| n == number) {
            self.cursor.reviewing = Some(number);
            self.cursor.current_index = index;
        }
    }

    fn next_segment(&self, index: usize, first_time: bool, now: DateTime<Utc>) -> NextSegment {
        choose_next_segment(
            &self.config.ladder,
            &self.order,
            &self.verse_progress,
            index,
            first_time,
            now,
        )
    }

    fn follow(&mut self, next: NextSegment) {
        if let Some(number) = next.reviewing() {
            tracing::debug!(segment = number, "review due");
            self.cursor.reviewing = Some(number);
        }
        self.cursor.current_index = next.index();
    }

    fn current_segment_number(&self) -> Option<u32> {
        self.order.get(self.cursor.current_index).copied()
    }

    /// Whether a word is currently blanked out.
    pub fn is_hidden(&self, word_index: usize) -> bool {
        if self.cursor.show_all {
            return false;
        }
        match self.cursor.mode {
            PracticeMode::Percentage => self.deleted_indices.binary_search(&word_index).is_ok(),
            PracticeMode::Segment => self
                .current_segment_number()
                .and_then(|number| self.segment_words.get(&number))
                .is_some_and(|indices| indices.contains(&word_index)),
        }
    }

    /// Hidden flag for every word index.
    pub fn hidden_mask(&self) -> Vec<bool> {
        (0..self.total_words).map(|i| self.is_hidden(i)).collect()
    }

    /// Due segment numbers, earliest first.
    pub fn due_reviews(&self, now: DateTime<Utc>) -> Vec<u32> {
        self.config.ladder.due_reviews(&self.verse_progress, now)
    }

    pub fn min_percentage(&self) -> u32 {
        calculate_min_percentage(self.total_words)
    }

    /// The record to persist.
    pub fn to_record(&self) -> ProgressRecord {
        ProgressRecord {
            deletion_percentage: self.percentage,
            deleted_indices: self.deleted_indices.clone(),
            verse_progress: self.verse_progress.clone(),
        }
    }

    pub fn cursor(&self) -> &SessionCursor {
        &self.cursor
    }

    pub fn mode(&self) -> PracticeMode {
        self.cursor.mode
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    pub fn deleted_indices(&self) -> &[usize] {
        &self.deleted_indices
    }

    pub fn verse_progress(&self) -> &ProgressMap {
        &self.verse_progress
    }

    /// The title segment, if the passage has one.
    pub fn title(&self) -> Option<&Segment> {
        self.segments.iter().find(|s| s.is_title)
    }

    /// Practice segments in document order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| !s.is_title)
    }

    /// The active segment.
    pub fn current_segment(&self) -> Option<&Segment> {
        let number = self.current_segment_number()?;
        self.segments().find(|s| s.number == number)
    }

    /// Word indices of a segment.
    pub fn segment_word_indices(&self, number: u32) -> &[usize] {
        self.segment_words
            .get(&number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
