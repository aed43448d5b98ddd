//! Word tokenizer.
//!
//! A word is a run of ASCII letters, optionally joined to a second run by a
//! single apostrophe (`didn't`). Everything else is grouped into maximal
//! separator runs, so concatenating token values reproduces the input.
//!
//! `*` and `**` inside separator runs toggle italic and bold for the words
//! that follow. The asterisks stay in the separator text.

use crate::types::Token;

/// Split text into word and separator tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut style = Style::default();
    let mut word_index = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        if bytes[pos].is_ascii_alphabetic() {
            pos = word_end(bytes, pos);
            let mut token = Token::word(&text[start..pos], word_index);
            token.bold = style.bold;
            token.italic = style.italic;
            tokens.push(token);
            word_index += 1;
        } else {
            while pos < bytes.len() && !bytes[pos].is_ascii_alphabetic() {
                pos += 1;
            }
            let value = &text[start..pos];
            style.apply(value);
            tokens.push(Token::other(value));
        }
    }

    tokens
}

/// Number of word tokens.
pub fn word_count(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_word()).count()
}

/// Word values in order, without separators.
pub fn words(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.is_word())
        .map(|t| t.value)
        .collect()
}

fn word_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = skip_letters(bytes, start);
    // One internal apostrophe, only when letters follow it.
    if pos + 1 < bytes.len() && bytes[pos] == b'\'' && bytes[pos + 1].is_ascii_alphabetic() {
        pos = skip_letters(bytes, pos + 1);
    }
    pos
}

fn skip_letters(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
        pos += 1;
    }
    pos
}

#[derive(Debug, Default)]
struct Style {
    bold: bool,
    italic: bool,
}

impl Style {
    fn apply(&mut self, separator: &str) {
        let mut rest = separator;
        while let Some(star) = rest.find('*') {
            rest = &rest[star..];
            if rest.starts_with("**") {
                self.bold = !self.bold;
                rest = &rest[2..];
            } else {
                self.italic = !self.italic;
                rest = &rest[1..];
            }
        }
    }
}
