//! Font setup and the face registry shared by layout and PDF output.
//!
//! Setup either loads all four Noto faces or none of them: a partial set would
//! leave the fallback directives pointing at faces that do not exist.

pub mod fallback;
pub mod metrics;
pub mod truetype;

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::FontPaths;
use crate::errors::AppError;
use crate::fonts::metrics::{BuiltinMetrics, HELVETICA, HELVETICA_BOLD};
use crate::fonts::truetype::TrueTypeFace;

pub const REGULAR_NAME: &str = "NotoSans";
pub const BOLD_NAME: &str = "NotoSans-Bold";
pub const SYMBOLS_NAME: &str = "NotoSymbols";
pub const SYMBOLS2_NAME: &str = "NotoSymbols2";

/// Index of a face inside a [`FontBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

/// Registered names of the two symbol fallback faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFonts {
    /// U+2000..=U+2BFF
    pub symbols: String,
    /// U+1F000..=U+1FFFF
    pub symbols2: String,
}

/// Result of font setup: which faces to use for body and header text, and
/// whether glyph fallback is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontConfig {
    pub regular: FaceId,
    pub bold: FaceId,
    pub symbols: Option<SymbolFonts>,
}

#[derive(Debug)]
pub enum FaceKind {
    Builtin(&'static BuiltinMetrics),
    TrueType(TrueTypeFace),
}

#[derive(Debug)]
pub struct Face {
    pub name: String,
    pub kind: FaceKind,
}

impl Face {
    /// Advance of `c` in 1/1000 em.
    pub fn width(&self, c: char) -> f32 {
        match &self.kind {
            FaceKind::Builtin(m) => f32::from(m.width(c)),
            FaceKind::TrueType(t) => t.glyph(c).width,
        }
    }

    /// Advance of `text` at `size` points.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.width(c)).sum::<f32>() * size / 1000.0
    }
}

/// Loaded faces plus the [`FontConfig`] that selects among them.
#[derive(Debug)]
pub struct FontBook {
    faces: Vec<Face>,
    by_name: HashMap<String, FaceId>,
    config: FontConfig,
}

impl FontBook {
    /// Helvetica and Helvetica-Bold only; glyph fallback disabled.
    pub fn builtin() -> Self {
        let mut book = FontBook {
            faces: Vec::new(),
            by_name: HashMap::new(),
            config: FontConfig {
                regular: FaceId(0),
                bold: FaceId(0),
                symbols: None,
            },
        };
        book.config.regular = book.register(HELVETICA.base_font, FaceKind::Builtin(&HELVETICA));
        book.config.bold =
            book.register(HELVETICA_BOLD.base_font, FaceKind::Builtin(&HELVETICA_BOLD));
        book
    }

    /// Loads the four external faces; any failure yields an error and nothing is kept.
    pub fn load(paths: &FontPaths) -> Result<Self, AppError> {
        let regular = TrueTypeFace::load(&paths.regular)?;
        let bold = TrueTypeFace::load(&paths.bold)?;
        let symbols = TrueTypeFace::load(&paths.symbols)?;
        let symbols2 = TrueTypeFace::load(&paths.symbols2)?;

        let mut book = FontBook {
            faces: Vec::new(),
            by_name: HashMap::new(),
            config: FontConfig {
                regular: FaceId(0),
                bold: FaceId(0),
                symbols: Some(SymbolFonts {
                    symbols: SYMBOLS_NAME.to_string(),
                    symbols2: SYMBOLS2_NAME.to_string(),
                }),
            },
        };
        book.config.regular = book.register(REGULAR_NAME, FaceKind::TrueType(regular));
        book.config.bold = book.register(BOLD_NAME, FaceKind::TrueType(bold));
        book.register(SYMBOLS_NAME, FaceKind::TrueType(symbols));
        book.register(SYMBOLS2_NAME, FaceKind::TrueType(symbols2));
        Ok(book)
    }

    fn register(&mut self, name: &str, kind: FaceKind) -> FaceId {
        let id = FaceId(self.faces.len());
        self.faces.push(Face {
            name: name.to_string(),
            kind,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    pub fn regular(&self) -> FaceId {
        self.config.regular
    }

    pub fn bold(&self) -> FaceId {
        self.config.bold
    }

    pub fn face(&self, id: FaceId) -> Result<&Face, AppError> {
        self.faces.get(id.0).ok_or(AppError::UnknownFace(id.0))
    }

    pub fn face_by_name(&self, name: &str) -> Option<FaceId> {
        self.by_name.get(name).copied()
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces.iter().enumerate().map(|(i, f)| (FaceId(i), f))
    }

    /// Advance of `text` in face `id` at `size` points. Unknown ids measure as zero.
    pub fn measure(&self, id: FaceId, text: &str, size: f32) -> f32 {
        self.faces
            .get(id.0)
            .map(|f| f.measure(text, size))
            .unwrap_or(0.0)
    }
}

/// Loads the external fonts, degrading to the built-in family on any failure.
pub fn setup_fonts(paths: &FontPaths) -> FontBook {
    match FontBook::load(paths) {
        Ok(book) => {
            info!(faces = book.faces().count(), "Noto fonts loaded");
            book
        }
        Err(e) => {
            warn!(error = %e, "Noto fonts not found. Falling back to Helvetica.");
            FontBook::builtin()
        }
    }
}
