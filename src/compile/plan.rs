use crate::compile::fingerprint::FrameFingerprint;
use crate::draw::list::DrawList;
use crate::foundation::core::{Affine, Canvas, Rgba8};
use crate::settings::model::BlendMode;

/// Which of the two layers a pass draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerRole {
    /// Drawn first; cacheable.
    Base,
    /// Drawn second with the frame's blend mode.
    Reveal,
}

/// Horizontal band `[x0, x1)` of the surface a layer may touch, in un-rotated pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSpan {
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
}

impl ClipSpan {
    /// `[0, cutoff% · width]`.
    pub fn base(cutoff_percent: f64, width: f64) -> Self {
        Self {
            x0: 0.0,
            x1: fraction(cutoff_percent) * width,
        }
    }

    /// `[width − cutoff% · width, width]`.
    pub fn reveal(cutoff_percent: f64, width: f64) -> Self {
        Self {
            x0: width - fraction(cutoff_percent) * width,
            x1: width,
        }
    }

    /// Width of the band.
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Pixel columns `[c0, c1)` covered by the band on a surface `width` pixels wide.
    pub fn columns(&self, width: u32) -> (usize, usize) {
        let w = f64::from(width);
        let c0 = self.x0.round().clamp(0.0, w) as usize;
        let c1 = self.x1.round().clamp(0.0, w) as usize;
        (c0, c1.max(c0))
    }
}

fn fraction(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// One layer: what to draw, where, and how it composites.
#[derive(Clone, Debug)]
pub struct LayerPass {
    /// Base or reveal.
    pub role: LayerRole,
    /// Horizontal clip band.
    pub clip: ClipSpan,
    /// Layer-local to surface transform, canvas rotation included.
    pub transform: Affine,
    /// Opacity of each command in `[0, 1]`.
    pub opacity: f32,
    /// Operator compositing each command onto what lies below.
    pub blend: BlendMode,
    /// Paint color of every command.
    pub color: Rgba8,
    /// Commands in layer-local coordinates.
    pub draw: DrawList,
}

/// Everything needed to rasterize one frame.
#[derive(Clone, Debug)]
pub struct FramePlan {
    /// Surface size.
    pub canvas: Canvas,
    /// Fill under both layers.
    pub background: Rgba8,
    /// Canvas rotation about the center.
    pub global: Affine,
    /// First layer.
    pub base: LayerPass,
    /// Second layer.
    pub reveal: LayerPass,
    /// Fingerprint of the background and base layer.
    pub base_key: FrameFingerprint,
}

impl FramePlan {
    /// Both passes in paint order.
    pub fn passes(&self) -> [&LayerPass; 2] {
        [&self.base, &self.reveal]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
