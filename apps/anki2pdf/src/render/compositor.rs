//! Sheet compositor: lays out chunks of cards as front/back page pairs.
//!
//! Each chunk becomes two consecutive pages. The front carries the question,
//! a deck header and a marker per occupied cell; the back carries only the
//! answer, with every row mirrored so it lands behind its question.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::cards::CardRecord;
use crate::errors::AppError;
use crate::fonts::{FaceId, FontBook};
use crate::layout::{
    fit_text, page_count, parse_markup, place_block, FitParams, GridGeometry, LayoutSettings, Rect,
};
use crate::render::canvas::{PdfCanvas, BLACK, GREY, LIGHT_GREY};

const SYMBOL_MARKER: &str = "\u{2605}";
const PLAIN_MARKER: &str = "*";

/// Pages produced for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub chunks: usize,
    pub pages: usize,
}

/// Draws all `cards` onto `canvas` without finishing it.
pub fn render_cards<W: Write>(
    cards: &[CardRecord],
    canvas: &mut PdfCanvas<'_, W>,
    settings: &LayoutSettings,
) -> Result<RenderSummary, AppError> {
    let grid = GridGeometry::new(settings);
    let marker = marker_glyph(canvas.book());
    let mut chunks = 0;

    for chunk in cards.chunks(grid.capacity()) {
        for (index, slot) in grid.front_slots(chunk).into_iter().enumerate() {
            if let Some(card) = slot {
                draw_front(canvas, &grid, settings, grid.cell_rect(index), card, marker)?;
            }
        }
        canvas.show_page();

        for (index, slot) in grid.back_slots(chunk).into_iter().enumerate() {
            if let Some(card) = slot {
                let rect = grid.cell_rect(index);
                draw_fitted_text(canvas, &card.answer, &rect, &settings.fit)?;
            }
        }
        canvas.show_page();

        chunks += 1;
        debug!(chunk = chunks, cards = chunk.len(), "Chunk rendered");
    }

    Ok(RenderSummary {
        chunks,
        pages: canvas.page_count(),
    })
}

/// Renders `cards` to a new PDF at `output`.
pub fn create_pdf(
    cards: &[CardRecord],
    output: &Path,
    book: &FontBook,
    settings: &LayoutSettings,
) -> Result<RenderSummary, AppError> {
    let mut canvas = PdfCanvas::create(output, book, settings.page_width, settings.page_height)?;
    let summary = render_cards(cards, &mut canvas, settings)?;
    let written = canvas.finish()?;
    debug_assert_eq!(written, page_count(cards.len(), settings.rows * settings.cols));

    info!(
        cards = cards.len(),
        chunks = summary.chunks,
        pages = summary.pages,
        output = %output.display(),
        "Flashcard PDF rendered"
    );
    Ok(summary)
}

fn draw_front<W: Write>(
    canvas: &mut PdfCanvas<'_, W>,
    grid: &GridGeometry,
    settings: &LayoutSettings,
    rect: Rect,
    card: &CardRecord,
    marker: (FaceId, &str),
) -> Result<(), AppError> {
    let book = canvas.book();
    let center_x = rect.x + grid.cell_width / 2.0;

    canvas.stroke_rect(&rect, LIGHT_GREY);
    canvas.draw_centred_text(
        book.bold(),
        settings.header_size,
        center_x,
        rect.y + rect.height - settings.header_offset,
        &card.deck,
        GREY,
    )?;

    let (marker_face, marker_text) = marker;
    canvas.draw_centred_text(
        marker_face,
        settings.marker_size,
        center_x,
        rect.y + settings.marker_offset,
        marker_text,
        GREY,
    )?;

    let body = Rect {
        height: rect.height - settings.header_reserve,
        ..rect
    };
    draw_fitted_text(canvas, &card.question, &body, &settings.fit)
}

/// Fits `markup` into `rect` and draws it centered.
fn draw_fitted_text<W: Write>(
    canvas: &mut PdfCanvas<'_, W>,
    markup: &str,
    rect: &Rect,
    params: &FitParams,
) -> Result<(), AppError> {
    let book = canvas.book();
    let tokens = parse_markup(markup, book, book.regular());
    let fitted = fit_text(&tokens, book, rect.width, rect.height, params);
    for placed in place_block(&fitted.block, rect, params.padding) {
        canvas.draw_text(
            placed.run.face,
            placed.size,
            placed.x,
            placed.y,
            &placed.run.text,
            BLACK,
        )?;
    }
    Ok(())
}

/// `★` from the first symbol face when it is loaded, `*` otherwise.
fn marker_glyph(book: &FontBook) -> (FaceId, &'static str) {
    book.config()
        .symbols
        .as_ref()
        .and_then(|symbols| book.face_by_name(&symbols.symbols))
        .map(|face| (face, SYMBOL_MARKER))
        .unwrap_or((book.regular(), PLAIN_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(deck: &str, question: &str, answer: &str) -> CardRecord {
        CardRecord {
            deck: deck.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn cards(n: usize) -> Vec<CardRecord> {
        (0..n)
            .map(|i| card("Deck", &format!("question {i}"), &format!("answer {i}")))
            .collect()
    }

    fn render(cards: &[CardRecord]) -> (RenderSummary, Vec<u8>) {
        let book = FontBook::builtin();
        let settings = LayoutSettings::default();
        let mut out = Vec::new();
        let summary = {
            let mut canvas = PdfCanvas::new(&mut out, &book, settings.page_width, settings.page_height);
            let summary = render_cards(cards, &mut canvas, &settings).unwrap();
            assert_eq!(canvas.finish().unwrap(), summary.pages);
            summary
        };
        (summary, out)
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_two_cards_make_one_sheet() {
        let (summary, out) = render(&[
            card("Verbs", "gehen", "to go"),
            card("Nouns", "der Hund", "the dog"),
        ]);
        assert_eq!(summary, RenderSummary { chunks: 1, pages: 2 });
        assert!(out.starts_with(b"%PDF-"));
        assert_eq!(count(&out, b"(Verbs)"), 1);
        assert_eq!(count(&out, b"(Nouns)"), 1);
        assert_eq!(count(&out, b"(to go)"), 1);
        // One marker per occupied front cell.
        assert_eq!(count(&out, b"(*)"), 2);
    }

    #[test]
    fn test_page_count_follows_chunks() {
        for (n, pages) in [(1, 2), (9, 2), (10, 4), (27, 6), (28, 8)] {
            let (summary, _) = render(&cards(n));
            assert_eq!(summary.pages, pages, "{n} cards");
            assert_eq!(summary.pages, page_count(n, 9));
            assert_eq!(summary.chunks * 2, pages);
        }
    }

    #[test]
    fn test_no_cards_no_pages() {
        let (summary, out) = render(&[]);
        assert_eq!(summary, RenderSummary { chunks: 0, pages: 0 });
        assert!(out.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_oversized_text_still_renders() {
        let long = "overflow ".repeat(400);
        let (summary, _) = render(&[card("Deck", &long, &long)]);
        assert_eq!(summary.pages, 2);
    }

    #[test]
    fn test_marker_without_symbol_fonts_is_plain() {
        let book = FontBook::builtin();
        assert_eq!(marker_glyph(&book), (book.regular(), PLAIN_MARKER));
    }

    #[test]
    fn test_create_pdf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("cards.pdf");
        let book = FontBook::builtin();
        let summary = create_pdf(&cards(10), &output, &book, &LayoutSettings::default()).unwrap();
        assert_eq!(summary.pages, 4);

        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_create_pdf_unwritable_output_fails() {
        let book = FontBook::builtin();
        let result = create_pdf(
            &cards(1),
            Path::new("/no/such/dir/cards.pdf"),
            &book,
            &LayoutSettings::default(),
        );
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
