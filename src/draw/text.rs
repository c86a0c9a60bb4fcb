use std::sync::Arc;

use crate::draw::list::{DrawList, TextRun};
use crate::foundation::core::{Affine, Point, Vec2};

/// Horizontal advance of a shaped run.
///
/// Implemented by the font-backed layout engine; planners and tests can substitute a fixed
/// advance model.
pub trait TextMeasure {
    /// Advance width of `run` in pixels, letter spacing included. `0.0` when it cannot be shaped.
    fn measure(&mut self, run: &TextRun) -> f64;
}

/// Every character advances by `size · ratio` plus the letter spacing.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvance {
    /// Advance per character as a fraction of the font size.
    pub ratio: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { ratio: 0.6 }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, run: &TextRun) -> f64 {
        run.char_count() as f64 * (run.size * self.ratio + run.letter_spacing)
    }
}

/// Cell layout of a repeated-text grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextGrid {
    /// Columns.
    pub repeat_x: u32,
    /// Rows.
    pub repeat_y: u32,
    /// Cell width.
    pub cell_width: f64,
    /// Cell height.
    pub cell_height: f64,
}

impl TextGrid {
    /// Grid for `run`: cells are `(measured + spacing·chars) × (size·1.2)`.
    pub fn for_run(run: &TextRun, measured: f64, repeat_x: u32, repeat_y: u32) -> Self {
        Self {
            repeat_x,
            repeat_y,
            cell_width: measured + run.letter_spacing * run.char_count() as f64,
            cell_height: run.size * 1.2,
        }
    }

    /// Anchor of cell `(x, y)` relative to the grid center.
    pub fn cell_offset(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(
            (f64::from(x) - f64::from(self.repeat_x) / 2.0 + 0.5) * self.cell_width,
            (f64::from(y) - f64::from(self.repeat_y) / 2.0 + 0.5) * self.cell_height,
        )
    }
}

/// Emit one text copy per grid cell, centered on `center`, rows first.
pub fn draw_text_grid(list: &mut DrawList, run: &Arc<TextRun>, grid: &TextGrid, center: Point) {
    for y in 0..grid.repeat_y {
        for x in 0..grid.repeat_x {
            let at = center + grid.cell_offset(x, y);
            list.text(run, Affine::translate(at.to_vec2()));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/text.rs"]
mod tests;
