//! TrueType faces loaded from disk.
//!
//! The file is parsed once with `ttf-parser`; the Unicode cmap and horizontal
//! advances are copied out so the face owns no borrowed data. The raw bytes are
//! kept for embedding as `FontFile2`.

use std::collections::HashMap;
use std::path::Path;

use ttf_parser::GlyphId;

use crate::errors::AppError;

/// Glyph id plus advance in 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub id: u16,
    pub width: f32,
}

/// Metrics of a TrueType face scaled to 1/1000 em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: f32,
    /// `[x_min, y_min, x_max, y_max]`
    pub bbox: [f32; 4],
}

#[derive(Debug)]
pub struct TrueTypeFace {
    data: Vec<u8>,
    cmap: HashMap<char, u16>,
    advances: Vec<u16>,
    units_per_em: f32,
    metrics: FaceMetrics,
}

impl TrueTypeFace {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let data = std::fs::read(path).map_err(|e| AppError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(data).map_err(|reason| AppError::Font {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;

        let mut cmap = HashMap::new();
        if let Some(table) = face.tables().cmap {
            for subtable in table.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let (Some(ch), Some(gid)) = (char::from_u32(cp), subtable.glyph_index(cp)) {
                        cmap.entry(ch).or_insert(gid.0);
                    }
                });
            }
        }
        if cmap.is_empty() {
            return Err("font has no Unicode cmap".to_string());
        }

        let advances = (0..face.number_of_glyphs())
            .map(|g| face.glyph_hor_advance(GlyphId(g)).unwrap_or(0))
            .collect();

        let units_per_em = f32::from(face.units_per_em());
        let scale = |v: i16| f32::from(v) * 1000.0 / units_per_em;
        let bbox = face.global_bounding_box();
        let metrics = FaceMetrics {
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or(face.ascender())),
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
        };

        Ok(TrueTypeFace {
            data,
            cmap,
            advances,
            units_per_em,
            metrics,
        })
    }

    /// Glyph for `c`; unmapped characters get `.notdef` (glyph 0).
    pub fn glyph(&self, c: char) -> Glyph {
        let id = self.cmap.get(&c).copied().unwrap_or(0);
        let advance = self.advances.get(usize::from(id)).copied().unwrap_or(0);
        Glyph {
            id,
            width: f32::from(advance) * 1000.0 / self.units_per_em,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(TrueTypeFace::from_bytes(b"not a font".to_vec()).is_err());
        assert!(TrueTypeFace::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_file_is_font_error() {
        let err = TrueTypeFace::load(Path::new("/no/such/font.ttf")).unwrap_err();
        assert!(matches!(err, AppError::Font { .. }));
    }
}
