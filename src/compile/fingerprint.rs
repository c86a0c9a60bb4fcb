use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{Canvas, Rgba8};
use crate::settings::model::{ActiveMode, Settings};

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Stable fingerprint of the inputs a cached base layer depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint the background and base layer of a frame.
///
/// Covers the surface size, the mode, the active block's base-layer fields, both colors, the
/// base cutoff, the canvas rotation and the readiness of the base custom asset. Time, movement
/// and every reveal-only field are deliberately left out, so an animated reveal keeps the key.
pub(crate) fn fingerprint_base(
    settings: &Settings,
    canvas: Canvas,
    base_asset_generation: u64,
) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(canvas.width);
    h.write_u32(canvas.height);
    h.write_str(settings.mode.as_str());

    match settings.active_mode() {
        ActiveMode::Svg(p) => {
            h.write_str(p.pattern1.as_str());
            h.write_f64(p.scale1);
            h.write_f64(p.rotation1);
            h.write_f64(p.opacity1);
            h.write_f64(p.stroke_width1);
            h.write_str(&p.custom1);
            h.write_u64(base_asset_generation);
        }
        ActiveMode::Geometric(p) => {
            h.write_str(p.shape1.as_str());
            h.write_u32(p.count);
            h.write_f64(p.thickness);
            h.write_f64(p.spacing);
        }
        ActiveMode::Text(p) => {
            h.write_str(&p.text);
            h.write_str(&p.font);
            h.write_f64(p.size);
            h.write_f64(p.spacing);
            h.write_u32(p.repeat_x);
            h.write_u32(p.repeat_y);
        }
        ActiveMode::Line(p) => {
            h.write_f64(p.period_base);
            h.write_f64(p.thickness_base);
            h.write_f64(p.angle_base);
            h.write_f64(p.opacity_base);
        }
        ActiveMode::Shape(p) => {
            h.write_str(&p.text);
            h.write_str(&p.font);
            h.write_f64(p.font_size);
            h.write_f64(p.period_base);
            h.write_f64(p.compression);
            h.write_u32(p.repeat_x);
        }
    }

    let g = &settings.global;
    h.write_rgba(g.foreground);
    h.write_rgba(g.background);
    h.write_f64(g.cutoff_base);
    h.write_f64(g.canvas_rotation);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn write_rgba(&mut self, c: Rgba8) {
        self.write_bytes(&[c.r, c.g, c.b, c.a]);
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
