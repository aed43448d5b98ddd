//! Optional span handling.
//!
//! Authors mark skippable passages with `[OPTIONAL]` ... `[/OPTIONAL]`.
//! Spans pair minimally and left to right. An open marker with no close
//! marker runs to the end of the text, and a close marker with no open
//! marker is discarded.

use crate::types::ContentPart;

pub const OPTIONAL_OPEN: &str = "[OPTIONAL]";
pub const OPTIONAL_CLOSE: &str = "[/OPTIONAL]";

/// Check if text contains optional sections.
pub fn has_optional_sections(text: &str) -> bool {
    text.contains(OPTIONAL_OPEN)
}

/// Remove every optional span, markers included.
pub fn remove_optional_sections(text: &str) -> String {
    parse_content_with_optional(text)
        .into_iter()
        .filter(|part| !part.optional)
        .map(|part| part.content)
        .collect()
}

/// Strip the marker literals but keep the enclosed content.
pub fn strip_optional_markers(text: &str) -> String {
    text.replace(OPTIONAL_OPEN, "").replace(OPTIONAL_CLOSE, "")
}

/// Split text into plain and optional parts, in order.
///
/// Marker literals are not part of any content.
pub fn parse_content_with_optional(text: &str) -> Vec<ContentPart> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(OPTIONAL_OPEN) {
        push_part(&mut parts, &rest[..open], false);
        let inner = &rest[open + OPTIONAL_OPEN.len()..];

        match inner.find(OPTIONAL_CLOSE) {
            Some(close) => {
                push_part(&mut parts, &inner[..close], true);
                rest = &inner[close + OPTIONAL_CLOSE.len()..];
            }
            None => {
                tracing::warn!("unterminated optional section; treating rest of text as optional");
                push_part(&mut parts, inner, true);
                rest = "";
            }
        }
    }
    push_part(&mut parts, rest, false);

    parts
}

/// Resolve optional spans ahead of tokenizing and segmenting.
pub fn prepare_text(text: &str, include_optional: bool) -> String {
    if include_optional {
        strip_optional_markers(text)
    } else {
        remove_optional_sections(text)
    }
}

fn push_part(parts: &mut Vec<ContentPart>, content: &str, optional: bool) {
    let content = if optional {
        content.to_string()
    } else {
        if content.contains(OPTIONAL_CLOSE) {
            tracing::warn!("discarding unmatched optional close marker");
        }
        content.replace(OPTIONAL_CLOSE, "")
    };
    if content.is_empty() && !optional {
        return;
    }
    parts.push(ContentPart { content, optional });
}
