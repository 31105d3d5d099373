//! Greedy word wrap over styled tokens.
//!
//! Whitespace runs collapse to a single space; a word never breaks, so a word
//! wider than the wrap width sits alone on an overlong line.

use crate::fonts::{FaceId, FontBook};
use crate::layout::markup::Token;

/// Text in a single face, measured at the line's font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub face: FaceId,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, text: &str, face: FaceId, width: f32) {
        match self.runs.last_mut() {
            Some(last) if last.face == face => {
                last.text.push_str(text);
                last.width += width;
            }
            _ => self.runs.push(Run {
                text: text.to_string(),
                face,
                width,
            }),
        }
        self.width += width;
    }

    /// Concatenated text of all runs.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

enum Item {
    /// Unbreakable word, possibly spanning faces.
    Word(Vec<(String, FaceId)>),
    /// Collapsed whitespace, measured in the face it appeared in.
    Space(FaceId),
    Break,
}

fn is_break_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn itemize(tokens: &[Token]) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();
    for token in tokens {
        match token {
            Token::Break => items.push(Item::Break),
            Token::Text { text, face } => {
                let mut rest = text.as_str();
                while !rest.is_empty() {
                    let space_len = rest.len() - rest.trim_start_matches(is_break_space).len();
                    if space_len > 0 {
                        if !matches!(items.last(), Some(Item::Space(_))) {
                            items.push(Item::Space(*face));
                        }
                        rest = &rest[space_len..];
                        continue;
                    }
                    let word_len = rest.find(is_break_space).unwrap_or(rest.len());
                    let fragment = (rest[..word_len].to_string(), *face);
                    match items.last_mut() {
                        Some(Item::Word(frags)) => frags.push(fragment),
                        _ => items.push(Item::Word(vec![fragment])),
                    }
                    rest = &rest[word_len..];
                }
            }
        }
    }
    items
}

/// Wraps `tokens` at `max_width` points with every face drawn at `size`.
///
/// Hard breaks always start a new line; trailing empty lines are dropped so
/// a closing `<br/>` does not add height.
pub fn wrap_tokens(tokens: &[Token], book: &FontBook, size: f32, max_width: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current = Line::default();
    let mut pending_space: Option<FaceId> = None;

    for item in itemize(tokens) {
        match item {
            Item::Break => {
                lines.push(std::mem::take(&mut current));
                pending_space = None;
            }
            Item::Space(face) => {
                if !current.is_empty() {
                    pending_space = Some(face);
                }
            }
            Item::Word(frags) => {
                let word_width: f32 = frags
                    .iter()
                    .map(|(text, face)| book.measure(*face, text, size))
                    .sum();
                let space_width = pending_space
                    .map(|face| book.measure(face, " ", size))
                    .unwrap_or(0.0);

                if !current.is_empty() && current.width + space_width + word_width > max_width {
                    lines.push(std::mem::take(&mut current));
                } else if let Some(face) = pending_space {
                    current.push(" ", face, space_width);
                }
                pending_space = None;

                for (text, face) in &frags {
                    let width = book.measure(*face, text, size);
                    current.push(text, *face, width);
                }
            }
        }
    }
    lines.push(current);

    while lines.last().is_some_and(Line::is_empty) {
        lines.pop();
    }
    lines
}
