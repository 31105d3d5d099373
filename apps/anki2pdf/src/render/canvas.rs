//! Page-oriented drawing surface over `pdf-writer`.
//!
//! Content streams are built page by page; font objects are written once in
//! [`PdfCanvas::finish`], after every glyph in use is known. TrueType faces are
//! embedded whole as CIDFontType2 with Identity-H encoding (text shown as
//! big-endian glyph ids); built-in faces use the standard Type1 fonts with
//! WinAnsiEncoding.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Content, Finish, Name, Pdf, Rect as PdfRect, Ref, Str};
use tracing::debug;

use crate::errors::AppError;
use crate::fonts::{Face, FaceId, FaceKind, FontBook};
use crate::layout::Rect;

/// Gray levels used by the compositor.
pub const BLACK: f32 = 0.0;
pub const GREY: f32 = 0.5;
pub const LIGHT_GREY: f32 = 0.827;

pub struct PdfCanvas<'a, W: Write> {
    out: W,
    book: &'a FontBook,
    page_width: f32,
    page_height: f32,
    pages: Vec<Vec<u8>>,
    current: Content,
    used_faces: BTreeSet<FaceId>,
    /// Glyph id → width (1/1000 em) per TrueType face.
    used_glyphs: BTreeMap<FaceId, BTreeMap<u16, f32>>,
}

impl<'a> PdfCanvas<'a, BufWriter<File>> {
    /// Creates the output file up front so an unwritable path fails before rendering.
    pub fn create(
        path: &Path,
        book: &'a FontBook,
        page_width: f32,
        page_height: f32,
    ) -> Result<Self, AppError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), book, page_width, page_height))
    }
}

impl<'a, W: Write> PdfCanvas<'a, W> {
    pub fn new(out: W, book: &'a FontBook, page_width: f32, page_height: f32) -> Self {
        PdfCanvas {
            out,
            book,
            page_width,
            page_height,
            pages: Vec::new(),
            current: Content::new(),
            used_faces: BTreeSet::new(),
            used_glyphs: BTreeMap::new(),
        }
    }

    pub fn book(&self) -> &'a FontBook {
        self.book
    }

    /// Number of completed pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Ends the current page and starts a fresh one.
    pub fn show_page(&mut self) {
        let content = std::mem::replace(&mut self.current, Content::new());
        self.pages.push(content.finish().to_vec());
    }

    pub fn stroke_rect(&mut self, rect: &Rect, gray: f32) {
        self.current
            .save_state()
            .set_stroke_gray(gray)
            .set_line_width(1.0)
            .rect(rect.x, rect.y, rect.width, rect.height)
            .stroke()
            .restore_state();
    }

    /// Draws `text` with its baseline origin at `(x, y)`.
    pub fn draw_text(
        &mut self,
        face_id: FaceId,
        size: f32,
        x: f32,
        y: f32,
        text: &str,
        gray: f32,
    ) -> Result<(), AppError> {
        if text.is_empty() {
            return Ok(());
        }
        let book = self.book;
        let face = book.face(face_id)?;
        let bytes = self.encode(face_id, face, text);
        let name = font_resource_name(face_id);

        self.current
            .set_fill_gray(gray)
            .begin_text()
            .set_font(Name(name.as_bytes()), size)
            .set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y])
            .show(Str(&bytes))
            .end_text();
        Ok(())
    }

    /// Draws `text` horizontally centered on `center_x`.
    pub fn draw_centred_text(
        &mut self,
        face_id: FaceId,
        size: f32,
        center_x: f32,
        y: f32,
        text: &str,
        gray: f32,
    ) -> Result<(), AppError> {
        let width = self.book.face(face_id)?.measure(text, size);
        self.draw_text(face_id, size, center_x - width / 2.0, y, text, gray)
    }

    fn encode(&mut self, face_id: FaceId, face: &Face, text: &str) -> Vec<u8> {
        self.used_faces.insert(face_id);
        match &face.kind {
            FaceKind::Builtin(metrics) => metrics.encode(text),
            FaceKind::TrueType(tt) => {
                let glyphs = self.used_glyphs.entry(face_id).or_default();
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for c in text.chars() {
                    let glyph = tt.glyph(c);
                    glyphs.insert(glyph.id, glyph.width);
                    bytes.extend_from_slice(&glyph.id.to_be_bytes());
                }
                bytes
            }
        }
    }

    /// Serializes the document and flushes it to the output. Returns the page count.
    ///
    /// A page with pending drawing that was never shown is emitted as well.
    pub fn finish(mut self) -> Result<usize, AppError> {
        let pending = std::mem::replace(&mut self.current, Content::new())
            .finish()
            .to_vec();
        if !pending.is_empty() {
            self.pages.push(pending);
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let page_ids: Vec<Ref> = self.pages.iter().map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = self.pages.iter().map(|_| alloc()).collect();

        let book = self.book;
        let mut font_pairs: Vec<(String, Ref)> = Vec::new();
        for &face_id in &self.used_faces {
            let face = book.face(face_id)?;
            let font_ref = alloc();
            match &face.kind {
                FaceKind::Builtin(metrics) => {
                    pdf.type1_font(font_ref)
                        .base_font(Name(metrics.base_font.as_bytes()))
                        .encoding_predefined(Name(b"WinAnsiEncoding"));
                }
                FaceKind::TrueType(tt) => {
                    let cid_ref = alloc();
                    let descriptor_ref = alloc();
                    let file_ref = alloc();
                    let base_font = face.name.clone();
                    let metrics = tt.metrics();

                    pdf.type0_font(font_ref)
                        .base_font(Name(base_font.as_bytes()))
                        .encoding_predefined(Name(b"Identity-H"))
                        .descendant_font(cid_ref);

                    let mut cid = pdf.cid_font(cid_ref);
                    cid.subtype(CidFontType::Type2)
                        .base_font(Name(base_font.as_bytes()))
                        .system_info(SystemInfo {
                            registry: Str(b"Adobe"),
                            ordering: Str(b"Identity"),
                            supplement: 0,
                        })
                        .font_descriptor(descriptor_ref)
                        .default_width(0.0)
                        .cid_to_gid_map_predefined(Name(b"Identity"));
                    if let Some(glyphs) = self.used_glyphs.get(&face_id) {
                        let mut widths = cid.widths();
                        for (&gid, &width) in glyphs {
                            widths.consecutive(gid, [width]);
                        }
                        widths.finish();
                    }
                    cid.finish();

                    let [x_min, y_min, x_max, y_max] = metrics.bbox;
                    pdf.font_descriptor(descriptor_ref)
                        .name(Name(base_font.as_bytes()))
                        .flags(FontFlags::NON_SYMBOLIC)
                        .bbox(PdfRect::new(x_min, y_min, x_max, y_max))
                        .italic_angle(0.0)
                        .ascent(metrics.ascent)
                        .descent(metrics.descent)
                        .cap_height(metrics.cap_height)
                        .stem_v(80.0)
                        .font_file2(file_ref);

                    let data = tt.data();
                    pdf.stream(file_ref, data)
                        .pair(Name(b"Length1"), data.len() as i32);
                }
            }
            font_pairs.push((font_resource_name(face_id), font_ref));
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (i, content) in self.pages.iter().enumerate() {
            {
                let mut page = pdf.page(page_ids[i]);
                page.media_box(PdfRect::new(0.0, 0.0, self.page_width, self.page_height))
                    .parent(pages_id)
                    .contents(content_ids[i]);
                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                for (name, font_ref) in &font_pairs {
                    fonts.pair(Name(name.as_bytes()), *font_ref);
                }
            }
            pdf.stream(content_ids[i], content);
        }

        let bytes = pdf.finish();
        self.out.write_all(&bytes)?;
        self.out.flush()?;
        debug!(
            pages = self.pages.len(),
            fonts = font_pairs.len(),
            bytes = bytes.len(),
            "PDF written"
        );
        Ok(self.pages.len())
    }
}

fn font_resource_name(face_id: FaceId) -> String {
    format!("F{}", face_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontPaths;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn pages_in(pdf: &[u8]) -> usize {
        count(pdf, b"/Type /Page") - count(pdf, b"/Type /Pages")
    }

    #[test]
    fn test_pages_and_fonts_are_written() {
        let book = FontBook::builtin();
        let mut out = Vec::new();
        {
            let mut canvas = PdfCanvas::new(&mut out, &book, 842.0, 595.0);
            canvas
                .draw_text(book.regular(), 12.0, 10.0, 10.0, "front", BLACK)
                .unwrap();
            canvas.show_page();
            canvas
                .draw_centred_text(book.bold(), 8.0, 100.0, 10.0, "back", GREY)
                .unwrap();
            canvas.show_page();
            assert_eq!(canvas.page_count(), 2);
            assert_eq!(canvas.finish().unwrap(), 2);
        }
        assert!(out.starts_with(b"%PDF-"));
        assert_eq!(pages_in(&out), 2);
        assert_eq!(count(&out, b"/BaseFont /Helvetica"), 2);
        assert_eq!(count(&out, b"/BaseFont /Helvetica-Bold"), 1);
        assert_eq!(count(&out, b"(front)"), 1);
    }

    #[test]
    fn test_unused_faces_are_not_written() {
        let book = FontBook::builtin();
        let mut out = Vec::new();
        {
            let mut canvas = PdfCanvas::new(&mut out, &book, 842.0, 595.0);
            canvas.stroke_rect(
                &Rect {
                    x: 1.0,
                    y: 1.0,
                    width: 10.0,
                    height: 10.0,
                },
                LIGHT_GREY,
            );
            canvas.show_page();
            canvas.finish().unwrap();
        }
        assert_eq!(count(&out, b"/BaseFont"), 0);
        assert_eq!(pages_in(&out), 1);
    }

    #[test]
    fn test_empty_document_has_no_pages() {
        let book = FontBook::builtin();
        let mut out = Vec::new();
        let pages = PdfCanvas::new(&mut out, &book, 842.0, 595.0).finish().unwrap();
        assert_eq!(pages, 0);
        assert!(out.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_unknown_face_is_an_error() {
        let book = FontBook::builtin();
        let mut canvas = PdfCanvas::new(Vec::new(), &book, 842.0, 595.0);
        let err = canvas
            .draw_text(FaceId(42), 10.0, 0.0, 0.0, "x", BLACK)
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownFace(42)));
    }

    #[test]
    fn test_truetype_faces_are_embedded_as_cid_fonts() {
        let font = Path::new("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
        if !font.exists() {
            return;
        }
        let paths = FontPaths {
            regular: font.to_path_buf(),
            bold: font.to_path_buf(),
            symbols: font.to_path_buf(),
            symbols2: font.to_path_buf(),
        };
        let book = FontBook::load(&paths).unwrap();
        let mut out = Vec::new();
        {
            let mut canvas = PdfCanvas::new(&mut out, &book, 842.0, 595.0);
            canvas
                .draw_text(book.regular(), 12.0, 10.0, 10.0, "Hund", BLACK)
                .unwrap();
            canvas.show_page();
            assert_eq!(canvas.finish().unwrap(), 1);
        }
        assert_eq!(pages_in(&out), 1);
        assert_eq!(count(&out, b"/Type0"), 1);
        assert_eq!(count(&out, b"/CIDFontType2"), 1);
        assert_eq!(count(&out, b"/Identity-H"), 1);
        assert_eq!(count(&out, b"/FontFile2"), 1);
        assert_eq!(count(&out, b"/Length1"), 1);
        assert_eq!(count(&out, b"/W "), 1);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let book = FontBook::builtin();
        let result = PdfCanvas::create(Path::new("/no/such/dir/out.pdf"), &book, 1.0, 1.0);
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
