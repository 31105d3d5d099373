//! Glyph-range font fallback.
//!
//! Noto Sans lacks most symbols and pictographs, so each character in those
//! ranges is wrapped in a `<font name="...">` directive naming a symbol face.

use crate::fonts::SymbolFonts;

/// Supplemental symbols, emoji and pictographs.
const PICTOGRAPH_RANGE: std::ops::RangeInclusive<u32> = 0x1F000..=0x1FFFF;
/// General punctuation through miscellaneous symbols and arrows.
const SYMBOL_RANGE: std::ops::RangeInclusive<u32> = 0x2000..=0x2BFF;

/// Name of the face registered for `c`, or `None` if the primary font handles it.
pub fn fallback_font_for(c: char, fonts: &SymbolFonts) -> Option<&str> {
    let code = c as u32;
    if PICTOGRAPH_RANGE.contains(&code) {
        Some(&fonts.symbols2)
    } else if SYMBOL_RANGE.contains(&code) {
        Some(&fonts.symbols)
    } else {
        None
    }
}

/// Wraps every symbol-range character in a font-switch directive.
///
/// Identity when `symbols` is `None` (built-in fonts only).
pub fn apply_font_fallback(text: &str, symbols: Option<&SymbolFonts>) -> String {
    let Some(fonts) = symbols else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match fallback_font_for(c, fonts) {
            Some(name) => {
                out.push_str("<font name=\"");
                out.push_str(name);
                out.push_str("\">");
                out.push(c);
                out.push_str("</font>");
            }
            None => out.push(c),
        }
    }
    out
}
