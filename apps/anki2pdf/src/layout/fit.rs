//! Fitted text: the largest font size whose wrapped block fits a cell.
//!
//! The search walks down from `max` to `min` one point at a time and stops at
//! the first size that fits.

use tracing::debug;

use crate::fonts::FontBook;
use crate::layout::markup::Token;
use crate::layout::wrap::{wrap_tokens, Line, Run};
use crate::layout::Rect;

/// Line spacing as a multiple of font size.
pub const LEADING_FACTOR: f32 = 1.2;

/// Font size search range and cell padding, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub min_size: u16,
    pub max_size: u16,
    /// Subtracted from both width and height before measuring.
    pub padding: f32,
}

/// A wrapped block at one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<Line>,
    pub size: f32,
    pub leading: f32,
    /// Widest line.
    pub width: f32,
    /// `lines × leading`
    pub height: f32,
}

impl TextBlock {
    pub fn layout(tokens: &[Token], book: &FontBook, size: f32, wrap_width: f32) -> Self {
        let lines = wrap_tokens(tokens, book, size, wrap_width);
        let leading = size * LEADING_FACTOR;
        let width = lines.iter().map(|l| l.width).fold(0.0_f32, f32::max);
        let height = lines.len() as f32 * leading;
        TextBlock {
            lines,
            size,
            leading,
            width,
            height,
        }
    }
}

/// Outcome of the size search.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub block: TextBlock,
    /// False when even `min_size` overflowed and the block is drawn clipped.
    pub fits: bool,
}

/// Finds the largest size in `[min_size, max_size]` whose block fits inside
/// `width × height` after padding. Falls back to `min_size` when nothing fits.
pub fn fit_text(
    tokens: &[Token],
    book: &FontBook,
    width: f32,
    height: f32,
    params: &FitParams,
) -> FittedText {
    let avail_width = width - params.padding;
    let avail_height = height - params.padding;

    let mut size = params.max_size;
    while size >= params.min_size {
        let block = TextBlock::layout(tokens, book, f32::from(size), avail_width);
        if block.width <= avail_width && block.height <= avail_height {
            return FittedText { block, fits: true };
        }
        if size == 0 {
            break;
        }
        size -= 1;
    }

    debug!(
        min_size = params.min_size,
        width, height, "Text overflows cell at minimum size; drawing clipped"
    );
    FittedText {
        block: TextBlock::layout(tokens, book, f32::from(params.min_size), avail_width),
        fits: false,
    }
}

/// A run positioned on the page: `(x, y)` is the baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRun<'a> {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub run: &'a Run,
}

/// Positions a block inside `rect`: vertically centered, each line centered
/// within the padded width, offset by half the padding from the left edge.
pub fn place_block<'a>(block: &'a TextBlock, rect: &Rect, padding: f32) -> Vec<PlacedRun<'a>> {
    let avail_width = rect.width - padding;
    let y_offset = (rect.height - block.height) / 2.0;
    let top = rect.y + rect.height - y_offset;
    let left = rect.x + padding / 2.0;

    let mut placed = Vec::new();
    for (i, line) in block.lines.iter().enumerate() {
        let baseline = top - block.size - i as f32 * block.leading;
        let mut x = left + (avail_width - line.width) / 2.0;
        for run in &line.runs {
            placed.push(PlacedRun {
                x,
                y: baseline,
                size: block.size,
                run,
            });
            x += run.width;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::markup::parse_markup;
    use crate::layout::MM;

    fn params() -> FitParams {
        FitParams {
            min_size: 6,
            max_size: 16,
            padding: 4.0 * MM,
        }
    }

    fn fit(markup: &str, width: f32, height: f32) -> FittedText {
        let book = FontBook::builtin();
        let tokens = parse_markup(markup, &book, book.regular());
        fit_text(&tokens, &book, width, height, &params())
    }

    #[test]
    fn test_roomy_rect_uses_max_size() {
        let fitted = fit("der Hund", 270.0, 180.0);
        assert!(fitted.fits);
        assert_eq!(fitted.block.size, 16.0);
        assert_eq!(fitted.block.lines.len(), 1);
    }

    #[test]
    fn test_empty_text_fits_at_max_size() {
        let fitted = fit("", 50.0, 20.0);
        assert!(fitted.fits);
        assert_eq!(fitted.block.size, 16.0);
        assert_eq!(fitted.block.height, 0.0);
    }

    #[test]
    fn test_long_text_shrinks_within_range() {
        let text = "word ".repeat(60);
        let fitted = fit(&text, 270.0, 160.0);
        let size = fitted.block.size;
        assert!((6.0..=16.0).contains(&size), "size {size} out of range");
        assert!(size < 16.0);
        assert!(fitted.fits);
        assert!(fitted.block.height <= 160.0 - 4.0 * MM);
    }

    #[test]
    fn test_chosen_size_is_largest_that_fits() {
        let book = FontBook::builtin();
        let text = "Lorem ipsum dolor sit amet ".repeat(12);
        let tokens = parse_markup(&text, &book, book.regular());
        let p = params();
        let (w, h) = (270.0, 160.0);
        let fitted = fit_text(&tokens, &book, w, h, &p);
        assert!(fitted.fits);

        let bigger = fitted.block.size + 1.0;
        if bigger <= f32::from(p.max_size) {
            let block = TextBlock::layout(&tokens, &book, bigger, w - p.padding);
            assert!(block.width > w - p.padding || block.height > h - p.padding);
        }
    }

    #[test]
    fn test_overflow_falls_back_to_min_size() {
        let fitted = fit(&"overflow ".repeat(500), 100.0, 40.0);
        assert!(!fitted.fits);
        assert_eq!(fitted.block.size, 6.0);
    }

    #[test]
    fn test_unbreakable_word_never_fits_narrow_rect() {
        let fitted = fit("Donaudampfschifffahrtsgesellschaft", 40.0, 200.0);
        assert!(!fitted.fits);
        assert_eq!(fitted.block.size, 6.0);
    }

    #[test]
    fn test_place_block_centers_vertically_and_horizontally() {
        let book = FontBook::builtin();
        let tokens = parse_markup("one<br/>two", &book, book.regular());
        let block = TextBlock::layout(&tokens, &book, 10.0, 200.0);
        let rect = Rect {
            x: 100.0,
            y: 50.0,
            width: 200.0,
            height: 100.0,
        };
        let padding = 4.0 * MM;
        let placed = place_block(&block, &rect, padding);
        assert_eq!(placed.len(), 2);

        // Block height 24pt, so the top sits 38pt below the rect top.
        let top = 50.0 + 100.0 - 38.0;
        assert!((placed[0].y - (top - 10.0)).abs() < 1e-3);
        assert!((placed[1].y - (top - 22.0)).abs() < 1e-3);

        let line = &block.lines[0];
        let expected_x = 100.0 + padding / 2.0 + (200.0 - padding - line.width) / 2.0;
        assert!((placed[0].x - expected_x).abs() < 1e-3);
    }
}
