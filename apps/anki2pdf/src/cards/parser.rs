//! Anki plain-text export reader.
//!
//! Export format: one note per line, tab-separated, `#` lines are headers such
//! as `#separator:tab`. Fields 0 and 1 are Anki's own identifiers (guid, notetype),
//! field 2 is the deck path, fields 3 and 4 are front and back.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::cards::sanitize::sanitize_html;
use crate::cards::CardRecord;
use crate::errors::AppError;
use crate::fonts::fallback::apply_font_fallback;
use crate::fonts::SymbolFonts;

const COMMENT_MARKER: char = '#';
const FIELD_DELIMITER: char = '\t';
const DECK_SEPARATOR: &str = "::";
const MIN_FIELDS: usize = 5;

const DECK_FIELD: usize = 2;
const QUESTION_FIELD: usize = 3;
const ANSWER_FIELD: usize = 4;

/// Line counters for a single export read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub comments: usize,
    pub malformed: usize,
    pub cards: usize,
}

/// Returns the last `::` segment of a hierarchical deck path.
pub fn deck_name(deck_path: &str) -> &str {
    deck_path.rsplit(DECK_SEPARATOR).next().unwrap_or(deck_path)
}

/// Parses one export line. `None` for comments and lines with too few fields.
pub fn parse_line(line: &str, symbols: Option<&SymbolFonts>) -> Option<CardRecord> {
    if line.starts_with(COMMENT_MARKER) {
        return None;
    }
    let fields: Vec<&str> = line.trim().split(FIELD_DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let prepare = |raw: &str| apply_font_fallback(&sanitize_html(raw), symbols);

    Some(CardRecord {
        deck: deck_name(fields[DECK_FIELD]).to_string(),
        question: prepare(fields[QUESTION_FIELD]),
        answer: prepare(fields[ANSWER_FIELD]),
    })
}

/// Reads every line from `reader` and returns the accepted cards in input order.
///
/// Malformed lines are dropped without error; only their count is reported.
pub fn parse_export<R: BufRead>(
    reader: R,
    symbols: Option<&SymbolFonts>,
) -> Result<(Vec<CardRecord>, ParseStats), AppError> {
    let mut cards = Vec::new();
    let mut stats = ParseStats::default();

    for line in reader.lines() {
        let line = line?;
        if line.starts_with(COMMENT_MARKER) {
            stats.comments += 1;
            continue;
        }
        match parse_line(&line, symbols) {
            Some(card) => cards.push(card),
            None => stats.malformed += 1,
        }
    }
    stats.cards = cards.len();

    if stats.malformed > 0 {
        debug!(malformed = stats.malformed, "Skipped lines with too few fields");
    }
    Ok((cards, stats))
}

/// Opens `path` and parses it with [`parse_export`].
pub fn parse_export_file(
    path: &Path,
    symbols: Option<&SymbolFonts>,
) -> Result<(Vec<CardRecord>, ParseStats), AppError> {
    let file = File::open(path)?;
    parse_export(BufReader::new(file), symbols)
}
