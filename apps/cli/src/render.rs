//! Plain-text rendering of a practice session.

use chrono::{DateTime, Utc};
use cloze_core::{format_time_until, PracticeMode, PracticeSession};
use std::fmt::Write;

/// Passage text with hidden words replaced by underscores.
pub fn passage(session: &PracticeSession) -> String {
    session
        .tokens()
        .iter()
        .map(|token| match token.word_index {
            Some(index) if session.is_hidden(index) => "_".repeat(token.value.chars().count()),
            _ => token.value.clone(),
        })
        .collect()
}

/// One-line summary of where the learner stands.
pub fn status(session: &PracticeSession, now: DateTime<Utc>) -> String {
    match session.mode() {
        PracticeMode::Percentage => format!(
            "{} of {} words hidden ({}%)",
            session.deleted_indices().len(),
            session.total_words(),
            session.percentage()
        ),
        PracticeMode::Segment => {
            let cursor = session.cursor();
            let Some(segment) = session.current_segment() else {
                return "No segments to practice".to_string();
            };
            let mut line = if cursor.awaiting_quality.is_some() {
                format!("Rate review of segment {}: again, hard or easy", segment.number)
            } else if cursor.reviewing.is_some() {
                format!("Reviewing segment {}", segment.number)
            } else {
                format!("Segment {}", segment.number)
            };
            if let Some(progress) = session.verse_progress().get(&segment.number) {
                let _ = write!(line, " (completed {}x)", progress.completions);
            }
            let due = session.due_reviews(now).len();
            if due > 0 {
                let _ = write!(line, ", {} due", due);
            }
            line
        }
    }
}

/// Per-segment progress with time until each next review.
pub fn progress_report(session: &PracticeSession, now: DateTime<Utc>) -> String {
    let mut report = String::new();
    for segment in session.segments() {
        let Some(progress) = session.verse_progress().get(&segment.number) else {
            continue;
        };
        let when = match progress.next_review {
            Some(at) if at <= now => "due!".to_string(),
            Some(at) => format_time_until((at - now).num_milliseconds()),
            None => "learning".to_string(),
        };
        let _ = writeln!(
            report,
            "{:>4}  completed {:>2}x  {}",
            segment.number, progress.completions, when
        );
    }
    if report.is_empty() {
        report.push_str("No segments completed yet\n");
    }
    report
}

/// Full screen: title, status, blank line, passage.
pub fn screen(session: &PracticeSession, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if let Some(title) = session.title() {
        let _ = writeln!(out, "{}", title.content.trim());
    }
    let _ = writeln!(out, "{}", status(session, now));
    let _ = writeln!(out);
    out.push_str(&passage(session));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
