//! Passage segmentation.
//!
//! # Scripture
//! ```text
//! The Beatitudes
//!
//! 3 Blessed are the poor in spirit,
//! for theirs is the kingdom of heaven.
//! 4 Blessed are those who mourn,
//! ```
//! A line starting with a number and whitespace opens a verse; every line up
//! to the next numbered line belongs to it. The first non-blank line before
//! any verse becomes the title (number 0).
//!
//! # Poetry
//! Non-blank lines are paired two at a time into couplets numbered from 1.
//! A first line that starts with a capital and contains a number is taken as
//! the title. Play headings ("Hamlet Act 3, Scene 1") and bare optional
//! markers are skipped.

use crate::optional::{OPTIONAL_CLOSE, OPTIONAL_OPEN};
use crate::tokenizer::words;
use crate::types::{PassageKind, Segment, Token};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static VERSE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s").expect("verse number pattern"));
static PLAY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z].*Act \d+.*Scene \d+").expect("play heading pattern"));
static POEM_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z].*\d+").expect("poem title pattern"));

/// Parse text into verses or couplets depending on passage kind.
pub fn parse_verses(text: &str, kind: PassageKind) -> Vec<Segment> {
    match kind {
        PassageKind::Scripture => parse_scripture_verses(text),
        PassageKind::Poetry => parse_couplets(text),
    }
}

/// Parse numbered scripture text into verses.
pub fn parse_scripture_verses(text: &str) -> Vec<Segment> {
    let mut verses = Vec::new();
    let mut current: Option<(u32, Vec<&str>)> = None;

    for line in text.split('\n') {
        if let Some(number) = verse_number(line) {
            if let Some((number, lines)) = current.take() {
                verses.push(Segment::verse(number, lines.join("\n")));
            }
            current = Some((number, vec![line]));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        } else if verses.is_empty() && !line.trim().is_empty() {
            verses.push(Segment::title(line));
        }
    }

    if let Some((number, lines)) = current {
        verses.push(Segment::verse(number, lines.join("\n")));
    }

    verses
}

/// Parse poetry into couplets.
pub fn parse_couplets(text: &str) -> Vec<Segment> {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !PLAY_HEADING.is_match(trimmed)
                && trimmed != OPTIONAL_OPEN
                && trimmed != OPTIONAL_CLOSE
        })
        .collect();

    let mut couplets = Vec::new();
    let mut body = lines.as_slice();

    if let Some((first, rest)) = lines.split_first() {
        if POEM_TITLE.is_match(first) {
            couplets.push(Segment::title(*first));
            body = rest;
        }
    }

    for (number, pair) in (1..).zip(body.chunks(2)) {
        couplets.push(Segment::couplet(number, pair.join("\n")));
    }

    couplets
}

/// Word indices covered by a segment, matched in order from `start_search_index`.
///
/// A result shorter than the segment's word count means the segment could
/// not be fully located.
pub fn get_word_indices_for_verse(
    tokens: &[Token],
    verse_content: &str,
    start_search_index: usize,
) -> Vec<usize> {
    match_segment(tokens, verse_content, start_search_index).0
}

/// Word indices of every non-title segment, keyed by segment number.
///
/// Segments are matched in document order; each search starts after the
/// last word the previous segment matched.
pub fn map_segment_word_indices(tokens: &[Token], segments: &[Segment]) -> BTreeMap<u32, Vec<usize>> {
    let mut result = BTreeMap::new();
    let mut cursor = 0;

    for segment in segments.iter().filter(|s| !s.is_title) {
        let (indices, next) = match_segment(tokens, &segment.content, cursor);
        cursor = next;
        result.insert(segment.number, indices);
    }

    result
}

/// Returns matched indices and the token position after the last match.
fn match_segment(tokens: &[Token], content: &str, start: usize) -> (Vec<usize>, usize) {
    let segment_words = words(content);
    let mut indices = Vec::with_capacity(segment_words.len());
    let mut cursor = start;

    for (pos, token) in tokens.iter().enumerate().skip(start) {
        let Some(expected) = segment_words.get(indices.len()) else {
            break;
        };
        match token.word_index {
            Some(word_index) if token.value == *expected => {
                indices.push(word_index);
                cursor = pos + 1;
            }
            _ => {}
        }
    }

    (indices, cursor)
}

fn verse_number(line: &str) -> Option<u32> {
    let captures = VERSE_NUMBER.captures(line)?;
    captures[1].parse().ok()
}
