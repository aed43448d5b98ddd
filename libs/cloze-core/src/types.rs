//! Core types for the cloze trainer.

use crate::deletion::{PERCENTAGE_STEP, SEGMENT_MODE_THRESHOLD};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Word,
    Other,
}

/// A slice of processed passage text.
///
/// Word tokens carry a zero-based `word_index`; separator runs do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_index: Option<usize>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Token {
    /// Create a word token.
    pub fn word(value: impl Into<String>, word_index: usize) -> Self {
        Self {
            kind: TokenKind::Word,
            value: value.into(),
            word_index: Some(word_index),
            bold: false,
            italic: false,
        }
    }

    /// Create a separator/punctuation token.
    pub fn other(value: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Other,
            value: value.into(),
            word_index: None,
            bold: false,
            italic: false,
        }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// Passage kind, which decides how text is segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageKind {
    Scripture,
    Poetry,
}

impl Default for PassageKind {
    fn default() -> Self {
        Self::Scripture
    }
}

impl PassageKind {
    /// Get the kind tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scripture => "scripture",
            Self::Poetry => "poetry",
        }
    }
}

impl FromStr for PassageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scripture" => Ok(Self::Scripture),
            "poetry" => Ok(Self::Poetry),
            other => Err(Error::UnknownPassageKind(other.to_string())),
        }
    }
}

impl fmt::Display for PassageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An addressable unit of a passage: a verse, a couplet, or the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub number: u32,
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_title: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_couplet: bool,
}

impl Segment {
    pub fn title(content: impl Into<String>) -> Self {
        Self {
            number: 0,
            content: content.into(),
            is_title: true,
            is_couplet: false,
        }
    }

    pub fn verse(number: u32, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
            is_title: false,
            is_couplet: false,
        }
    }

    pub fn couplet(number: u32, content: impl Into<String>) -> Self {
        Self {
            number,
            content: content.into(),
            is_title: false,
            is_couplet: true,
        }
    }
}

/// A piece of passage text, flagged when it sits inside an optional span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPart {
    pub content: String,
    pub optional: bool,
}

/// Review quality reported after reciting a due segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Again,
    Hard,
    Easy,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Easy => "easy",
        }
    }
}

/// Unrecognized quality tags advance the interval like `easy`.
impl From<&str> for Quality {
    fn from(s: &str) -> Self {
        match s {
            "again" => Self::Again,
            "hard" => Self::Hard,
            _ => Self::Easy,
        }
    }
}

/// Per-segment learning progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseProgress {
    pub completions: u32,
    /// Current review interval in milliseconds.
    pub interval: u64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_completed: DateTime<Utc>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// Progress keyed by segment number.
pub type ProgressMap = BTreeMap<u32, VerseProgress>;

/// The record a host persists per user and passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub deletion_percentage: u32,
    #[serde(default)]
    pub deleted_indices: Vec<usize>,
    #[serde(default)]
    pub verse_progress: ProgressMap,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            deletion_percentage: TrainerSettings::default().initial_percentage,
            deleted_indices: Vec::new(),
            verse_progress: ProgressMap::new(),
        }
    }
}

impl ProgressRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Practice tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSettings {
    /// Percentage change applied by one harder/easier action.
    pub percentage_step: u32,
    /// Percentage at which practice switches to one segment at a time.
    pub segment_mode_threshold: u32,
    /// Percentage a fresh passage starts at.
    pub initial_percentage: u32,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            percentage_step: PERCENTAGE_STEP,
            segment_mode_threshold: SEGMENT_MODE_THRESHOLD,
            initial_percentage: PERCENTAGE_STEP,
        }
    }
}
