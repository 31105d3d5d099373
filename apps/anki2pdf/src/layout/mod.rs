// Layout: markup reading, word wrap, fitted font sizes and the sheet grid.
// All lengths are PDF points with the origin at the bottom-left of the page.

pub mod fit;
pub mod grid;
pub mod markup;
pub mod wrap;

pub use fit::{fit_text, place_block, FitParams};
pub use grid::{page_count, GridGeometry};
pub use markup::parse_markup;

/// One millimetre in points.
pub const MM: f32 = 72.0 / 25.4;

/// Axis-aligned rectangle; `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Fixed layout parameters for a run.
///
/// Defaults: A4 landscape, 5mm margin, 3×3 grid, body text 6–16pt with 4mm
/// padding, 5mm reserved at the top of each front cell for the deck header.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub rows: usize,
    pub cols: usize,
    pub fit: FitParams,
    /// Height cut from the cell before fitting body text.
    pub header_reserve: f32,
    pub header_size: f32,
    /// Header baseline distance below the cell top.
    pub header_offset: f32,
    pub marker_size: f32,
    /// Marker baseline distance above the cell bottom.
    pub marker_offset: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            page_width: 297.0 * MM,
            page_height: 210.0 * MM,
            margin: 5.0 * MM,
            rows: 3,
            cols: 3,
            fit: FitParams {
                min_size: 6,
                max_size: 16,
                padding: 4.0 * MM,
            },
            header_reserve: 5.0 * MM,
            header_size: 8.0,
            header_offset: 4.0 * MM,
            marker_size: 10.0,
            marker_offset: 2.0 * MM,
        }
    }
}
