use std::sync::Arc;

use crate::draw::list::{DrawList, TextRun};
use crate::draw::patterns::{circle_into, steps_from};
use crate::draw::text::{TextGrid, draw_text_grid};
use crate::foundation::core::{BezPath, Point};
use crate::settings::model::OverlayKind;

/// Stroke width of the ruled overlays.
const OVERLAY_STROKE: f64 = 1.0;

/// Emit the text-mode reveal layer.
///
/// `text` is the base layer's run and grid, redrawn around the local origin for
/// [`OverlayKind::Text`].
pub fn draw_overlay(
    list: &mut DrawList,
    kind: &OverlayKind,
    spacing: f64,
    size: f64,
    text: (&Arc<TextRun>, &TextGrid),
) {
    match kind {
        OverlayKind::Text => {
            let (run, grid) = text;
            draw_text_grid(list, run, grid, Point::ORIGIN);
        }
        OverlayKind::Lines => {
            list.stroke_each(&rulings(size, spacing, true, false), OVERLAY_STROKE)
        }
        OverlayKind::VerticalLines => {
            list.stroke_each(&rulings(size, spacing, false, true), OVERLAY_STROKE)
        }
        OverlayKind::Grid => list.stroke_each(&rulings(size, spacing, true, true), OVERLAY_STROKE),
        OverlayKind::Circles => {
            let mut path = BezPath::new();
            for r in steps_from(spacing, size, spacing) {
                circle_into(&mut path, r);
            }
            list.stroke_each(&path, OVERLAY_STROKE);
        }
        OverlayKind::Unknown(id) => {
            tracing::debug!(overlay = %id, "unknown text overlay, layer left empty");
        }
    }
}

fn rulings(size: f64, spacing: f64, horizontal: bool, vertical: bool) -> BezPath {
    let mut path = BezPath::new();
    for p in steps_from(-size, size, spacing) {
        if horizontal {
            path.move_to((-size, p));
            path.line_to((size, p));
        }
        if vertical {
            path.move_to((p, -size));
            path.line_to((p, size));
        }
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/draw/overlay.rs"]
mod tests;
