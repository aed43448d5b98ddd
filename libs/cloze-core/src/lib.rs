//! Core memorization library shared by cloze trainer hosts.
//!
//! Provides:
//! - Optional span filtering (`[OPTIONAL]` ... `[/OPTIONAL]`)
//! - Word tokenizer with stable word indices
//! - Verse and couplet segmentation
//! - Reproducible word-deletion selection
//! - Interval-ladder review scheduling
//! - Practice session state machine tying the above together

pub mod deletion;
pub mod error;
pub mod optional;
pub mod scheduler;
pub mod segmenter;
pub mod session;
pub mod tokenizer;
pub mod types;

pub use deletion::{
    add_more_deletions, calculate_deletion_count, calculate_min_percentage, remove_deletions,
    select_words_to_delete,
};
pub use error::{Error, Result};
pub use optional::{
    has_optional_sections, parse_content_with_optional, prepare_text, remove_optional_sections,
    strip_optional_markers,
};
pub use scheduler::{
    choose_next_segment, format_time_until, get_due_reviews, get_next_interval, IntervalLadder,
    NextSegment,
};
pub use segmenter::{get_word_indices_for_verse, map_segment_word_indices, parse_verses};
pub use session::{Action, PracticeMode, PracticeSession, SessionConfig, SessionCursor};
pub use tokenizer::tokenize;
pub use types::{
    ContentPart, PassageKind, ProgressMap, ProgressRecord, Quality, Segment, Token, TokenKind,
    TrainerSettings, VerseProgress,
};
