//! Inline markup reader.
//!
//! Understands the subset produced by the card parser: `<br/>`, `<b>`/`<strong>`,
//! `<font name="...">` and character entities. Every other tag is dropped and
//! its content kept as plain text.

use crate::fonts::{FaceId, FontBook};

/// A styled text fragment or a hard line break.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text { text: String, face: FaceId },
    Break,
}

/// Splits `markup` into tokens, starting in face `base`.
pub fn parse_markup(markup: &str, book: &FontBook, base: FaceId) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut faces = vec![base];
    let mut buf = String::new();
    let mut rest = markup;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match rest.find('>') {
                Some(end) => {
                    let tag = &rest[1..end];
                    rest = &rest[end + 1..];
                    let current = faces.last().copied().unwrap_or(base);
                    match classify_tag(tag) {
                        Tag::Break => {
                            flush(&mut tokens, &mut buf, current);
                            tokens.push(Token::Break);
                        }
                        Tag::Open(kind) => {
                            let next = match kind {
                                FaceTag::Bold => book.bold(),
                                FaceTag::Font(Some(name)) => {
                                    book.face_by_name(&name).unwrap_or(current)
                                }
                                FaceTag::Font(None) => current,
                            };
                            if next != current {
                                flush(&mut tokens, &mut buf, current);
                            }
                            faces.push(next);
                        }
                        Tag::Close => {
                            if faces.len() > 1 {
                                let popped = faces.pop().unwrap_or(base);
                                let now = faces.last().copied().unwrap_or(base);
                                if popped != now {
                                    flush(&mut tokens, &mut buf, popped);
                                }
                            }
                        }
                        Tag::Other => {}
                    }
                }
                None => {
                    buf.push('<');
                    rest = &rest[1..];
                }
            },
            '&' => {
                let (decoded, consumed) = decode_entity(rest);
                buf.push(decoded);
                rest = &rest[consumed..];
            }
            _ => {
                buf.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    let current = faces.last().copied().unwrap_or(base);
    flush(&mut tokens, &mut buf, current);
    tokens
}

fn flush(tokens: &mut Vec<Token>, buf: &mut String, face: FaceId) {
    if !buf.is_empty() {
        tokens.push(Token::Text {
            text: std::mem::take(buf),
            face,
        });
    }
}

enum FaceTag {
    Bold,
    Font(Option<String>),
}

enum Tag {
    Break,
    Open(FaceTag),
    Close,
    Other,
}

fn classify_tag(tag: &str) -> Tag {
    let tag = tag.trim();
    let (closing, body) = match tag.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, tag),
    };
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match (closing, name.as_str()) {
        (false, "br") => Tag::Break,
        (true, "b" | "strong" | "font") => Tag::Close,
        (false, "b" | "strong") => Tag::Open(FaceTag::Bold),
        (false, "font") => Tag::Open(FaceTag::Font(attribute(body, "name"))),
        _ => Tag::Other,
    }
}

/// Value of `key="..."` (or single-quoted) inside a tag body.
fn attribute(body: &str, key: &str) -> Option<String> {
    let pattern = format!("{key}=");
    let start = body.find(&pattern)? + pattern.len();
    let value = &body[start..];
    let quote = value.chars().next().filter(|q| *q == '"' || *q == '\'')?;
    let value = &value[1..];
    let end = value.find(quote)?;
    Some(value[..end].to_string())
}

/// Decodes the entity at the start of `s` (which begins with `&`).
/// Returns the character and the number of bytes consumed; unknown or
/// unterminated entities decode to a literal `&`.
fn decode_entity(s: &str) -> (char, usize) {
    let literal = ('&', 1);
    let Some(end) = s[1..].find(';').map(|i| i + 1) else {
        return literal;
    };
    if end > 10 {
        return literal;
    }
    let name = &s[1..end];
    let decoded = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "bull" => Some('•'),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        "hellip" => Some('…'),
        _ => name.strip_prefix('#').and_then(|num| {
            let hex = num.strip_prefix('x').or_else(|| num.strip_prefix('X'));
            let code = match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };
    match decoded {
        Some(c) => (c, end + 1),
        None => literal,
    }
}
