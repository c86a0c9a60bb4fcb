use std::sync::Arc;

use kurbo::PathEl;
use smallvec::SmallVec;

use crate::assets::custom::SlotId;
use crate::foundation::core::{Affine, BezPath, Rect};

/// Flattening tolerance for circles and arcs, in local units.
pub(crate) const TOLERANCE: f64 = 0.1;

/// Styled text content shared by every copy of a repeated run.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Text content.
    pub text: String,
    /// Font family name.
    pub family: String,
    /// Font size in pixels.
    pub size: f64,
    /// Extra advance after each character, in pixels.
    pub letter_spacing: f64,
}

impl TextRun {
    /// Number of characters, as used by the letter-spacing cell width.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One drawing command in layer-local coordinates.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Stroke every subpath of `path` with `width` (butt caps, miter joins).
    Stroke {
        /// Geometry to stroke.
        path: BezPath,
        /// Stroke width in local units.
        width: f64,
    },
    /// Fill `path` with the non-zero rule.
    Fill {
        /// Geometry to fill.
        path: BezPath,
    },
    /// Bold text, centered horizontally and middle-anchored on the origin of `transform`.
    Text {
        /// Shared run style.
        run: Arc<TextRun>,
        /// Placement of the run's anchor.
        transform: Affine,
    },
    /// A layer's custom image stretched over `rect`.
    Image {
        /// Which asset slot to sample.
        slot: SlotId,
        /// Destination rectangle.
        rect: Rect,
    },
}

/// Ordered draw commands of one layer.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    ops: SmallVec<[DrawOp; 4]>,
}

impl DrawList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// `true` when nothing will be drawn.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append a stroke; empty paths and non-positive widths are dropped.
    pub fn stroke(&mut self, path: BezPath, width: f64) {
        if path.elements().is_empty() || !(width.is_finite() && width > 0.0) {
            return;
        }
        self.ops.push(DrawOp::Stroke { path, width });
    }

    /// Append a fill; empty paths are dropped.
    pub fn fill(&mut self, path: BezPath) {
        if path.elements().is_empty() {
            return;
        }
        self.ops.push(DrawOp::Fill { path });
    }

    /// Append one stroke per subpath of `path`.
    ///
    /// Each op is composited on its own, so crossings between subpaths see each other
    /// through the layer's opacity and blend.
    pub fn stroke_each(&mut self, path: &BezPath, width: f64) {
        for sub in subpaths(path) {
            self.stroke(sub, width);
        }
    }

    /// Append one fill per subpath of `path`.
    pub fn fill_each(&mut self, path: &BezPath) {
        for sub in subpaths(path) {
            self.fill(sub);
        }
    }

    /// Append one text copy.
    pub fn text(&mut self, run: &Arc<TextRun>, transform: Affine) {
        if run.text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            run: Arc::clone(run),
            transform,
        });
    }

    /// Append an image placement.
    pub fn image(&mut self, slot: SlotId, rect: Rect) {
        self.ops.push(DrawOp::Image { slot, rect });
    }
}

/// Split `path` at every move-to.
pub(crate) fn subpaths(path: &BezPath) -> Vec<BezPath> {
    let mut out: Vec<BezPath> = Vec::new();
    for &el in path.elements() {
        if matches!(el, PathEl::MoveTo(_)) || out.is_empty() {
            out.push(BezPath::new());
        }
        if let Some(last) = out.last_mut() {
            last.push(el);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/draw/list.rs"]
mod tests;
