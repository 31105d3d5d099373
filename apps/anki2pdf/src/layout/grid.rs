//! Sheet grid: cell geometry, chunking and back-side mirroring.
//!
//! Sheets are flipped along the long edge for duplex printing, which swaps
//! left and right. Reversing every row of the back page puts each answer
//! directly behind its question.
//!
//! ```text
//! front          back
//! [0][1][2]      [2][1][0]
//! [3][4][5]  ->  [5][4][3]
//! [6][7][8]      [8][7][6]
//! ```

use crate::layout::{LayoutSettings, Rect};

/// Page and cell dimensions in points. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl GridGeometry {
    pub fn new(settings: &LayoutSettings) -> Self {
        let (rows, cols) = (settings.rows, settings.cols);
        GridGeometry {
            page_width: settings.page_width,
            page_height: settings.page_height,
            margin: settings.margin,
            rows,
            cols,
            cell_width: (settings.page_width - 2.0 * settings.margin) / cols as f32,
            cell_height: (settings.page_height - 2.0 * settings.margin) / rows as f32,
        }
    }

    /// Cards per sheet.
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// `(row, col)` of slot `index`, row 0 at the top.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Bottom-left anchored rectangle of slot `index`.
    pub fn cell_rect(&self, index: usize) -> Rect {
        let (row, col) = self.position(index);
        Rect {
            x: self.margin + col as f32 * self.cell_width,
            y: self.page_height - self.margin - (row + 1) as f32 * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Front-side slots of one chunk, padded with `None` to full capacity.
    pub fn front_slots<'a, T>(&self, chunk: &'a [T]) -> Vec<Option<&'a T>> {
        let mut slots: Vec<Option<&T>> = chunk.iter().take(self.capacity()).map(Some).collect();
        slots.resize(self.capacity(), None);
        slots
    }

    /// Back-side slots: the front slots with every row reversed.
    pub fn back_slots<'a, T>(&self, chunk: &'a [T]) -> Vec<Option<&'a T>> {
        mirror_rows(&self.front_slots(chunk), self.cols)
    }
}

/// Reverses each `cols`-wide row of `slots` independently.
/// A trailing partial row is reversed on its own.
pub fn mirror_rows<T: Clone>(slots: &[T], cols: usize) -> Vec<T> {
    if cols == 0 {
        return slots.to_vec();
    }
    slots
        .chunks(cols)
        .flat_map(|row| row.iter().rev().cloned())
        .collect()
}

/// Output pages for `cards` cards: one front and one back per started sheet.
pub fn page_count(cards: usize, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    2 * cards.div_ceil(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MM;

    fn grid() -> GridGeometry {
        GridGeometry::new(&LayoutSettings::default())
    }

    #[test]
    fn test_a4_landscape_cells() {
        let g = grid();
        assert_eq!(g.capacity(), 9);
        assert!((g.page_width - 297.0 * MM).abs() < 1e-3);
        assert!((g.page_height - 210.0 * MM).abs() < 1e-3);
        assert!((g.cell_width - (297.0 - 10.0) * MM / 3.0).abs() < 1e-3);
        assert!((g.cell_height - (210.0 - 10.0) * MM / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_row_zero_is_topmost() {
        let g = grid();
        let top_left = g.cell_rect(0);
        assert!((top_left.x - g.margin).abs() < 1e-3);
        assert!((top_left.y + top_left.height - (g.page_height - g.margin)).abs() < 1e-3);

        let bottom_right = g.cell_rect(8);
        assert_eq!(g.position(8), (2, 2));
        assert!((bottom_right.y - g.margin).abs() < 1e-3);
        assert!((bottom_right.x + bottom_right.width - (g.page_width - g.margin)).abs() < 1e-3);
    }

    #[test]
    fn test_mirror_reverses_each_row() {
        let slots: Vec<u8> = (0..9).collect();
        assert_eq!(mirror_rows(&slots, 3), vec![2, 1, 0, 5, 4, 3, 8, 7, 6]);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        for n in 0..=9 {
            let cards: Vec<usize> = (0..n).collect();
            let g = grid();
            let front = g.front_slots(&cards);
            assert_eq!(mirror_rows(&mirror_rows(&front, 3), 3), front);
        }
    }

    #[test]
    fn test_mirror_keeps_row_membership() {
        let g = grid();
        for n in 0..=9 {
            let cards: Vec<usize> = (0..n).collect();
            let front = g.front_slots(&cards);
            let back = g.back_slots(&cards);
            assert_eq!(front.len(), back.len());
            for (f_row, b_row) in front.chunks(3).zip(back.chunks(3)) {
                let mut f: Vec<_> = f_row.to_vec();
                let mut b: Vec<_> = b_row.to_vec();
                let reversed: Vec<_> = f_row.iter().rev().cloned().collect();
                assert_eq!(b_row, reversed.as_slice());
                f.sort();
                b.sort();
                assert_eq!(f, b);
            }
        }
    }

    #[test]
    fn test_two_card_chunk_back_side() {
        let g = grid();
        let cards = ["Verbs", "Nouns"];
        let back = g.back_slots(&cards);
        assert_eq!(back.len(), 9);
        assert_eq!(&back[..3], &[None, Some(&"Nouns"), Some(&"Verbs")]);
        assert_eq!(back.iter().filter(|s| s.is_none()).count(), 7);
        assert_eq!(g.front_slots(&cards).iter().filter(|s| s.is_none()).count(), 7);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 9), 0);
        assert_eq!(page_count(1, 9), 2);
        assert_eq!(page_count(9, 9), 2);
        assert_eq!(page_count(10, 9), 4);
        assert_eq!(page_count(27, 9), 6);
        assert_eq!(page_count(28, 9), 8);
    }
}
