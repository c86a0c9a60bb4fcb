//! Named parameter bundles.
//!
//! A preset only touches the fields it lists; everything else keeps the caller's values.

use std::str::FromStr;

use crate::foundation::error::MoireError;
use crate::settings::model::{
    Axis, BlendMode, GeoShape, Mode, MovementKind, Pattern, Settings,
};

/// One of the built-in presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Two nearly equal circle fields.
    Hypnotic,
    /// Dense radial fans.
    Optical,
    /// Slowly drifting waves.
    Zen,
    /// Hexagons against a spinning grid.
    Chaos,
    /// Sparse circles.
    Minimal,
    /// Spiral against a ray fan, xor-composited.
    Psychedelic,
    /// Gratings of period 10 and 11 sliding vertically.
    LineSpeedup,
    /// Curved reveal grating.
    LineWave,
    /// Tilted gratings swinging on both axes.
    LineTilt,
    /// Compressed text under a sliding slit mask.
    ShapeMagnify,
}

impl Preset {
    /// All presets in catalog order.
    pub const ALL: [Preset; 10] = [
        Preset::Hypnotic,
        Preset::Optical,
        Preset::Zen,
        Preset::Chaos,
        Preset::Minimal,
        Preset::Psychedelic,
        Preset::LineSpeedup,
        Preset::LineWave,
        Preset::LineTilt,
        Preset::ShapeMagnify,
    ];

    /// Preset name as shown to users.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hypnotic => "hypnotic",
            Self::Optical => "optical",
            Self::Zen => "zen",
            Self::Chaos => "chaos",
            Self::Minimal => "minimal",
            Self::Psychedelic => "psychedelic",
            Self::LineSpeedup => "lineSpeedup",
            Self::LineWave => "lineWave",
            Self::LineTilt => "lineTilt",
            Self::ShapeMagnify => "shapeMagnify",
        }
    }

    /// Merge this preset's fields into `s`.
    pub fn apply(self, s: &mut Settings) {
        match self {
            Self::Hypnotic => {
                s.mode = Mode::Svg;
                let p = &mut s.svg;
                p.pattern1 = Pattern::Circles;
                p.scale1 = 100.0;
                p.rotation1 = 0.0;
                p.opacity1 = 100.0;
                p.pattern2 = Pattern::Circles;
                p.scale2 = 102.0;
                p.rotation2 = 0.0;
                p.speed2 = 5.0;
                p.opacity2 = 100.0;
                s.global.blend_mode = BlendMode::Difference;
            }
            Self::Optical => {
                s.mode = Mode::Geometric;
                let g = &mut s.geometric;
                g.shape1 = GeoShape::RadialLines;
                g.shape2 = GeoShape::RadialLines;
                g.count = 60;
                g.thickness = 1.0;
                g.spacing = 15.0;
                g.scale_diff = 0.0;
                g.offset_x = 5.0;
                g.offset_y = 5.0;
                s.movement.speed = 3.0;
            }
            Self::Zen => {
                s.mode = Mode::Svg;
                let p = &mut s.svg;
                p.pattern1 = Pattern::Waves;
                p.scale1 = 100.0;
                p.rotation1 = 0.0;
                p.opacity1 = 100.0;
                p.pattern2 = Pattern::Waves;
                p.scale2 = 100.0;
                p.rotation2 = 5.0;
                p.speed2 = 2.0;
                p.opacity2 = 100.0;
                p.offset_x2 = 0.0;
                p.offset_y2 = 5.0;
            }
            Self::Chaos => {
                s.mode = Mode::Svg;
                let p = &mut s.svg;
                p.pattern1 = Pattern::Hexagon;
                p.scale1 = 80.0;
                p.rotation1 = 0.0;
                p.opacity1 = 100.0;
                p.pattern2 = Pattern::Grid;
                p.scale2 = 90.0;
                p.rotation2 = 15.0;
                p.speed2 = 15.0;
                p.opacity2 = 100.0;
                s.global.blend_mode = BlendMode::Exclusion;
            }
            Self::Minimal => {
                s.mode = Mode::Geometric;
                let g = &mut s.geometric;
                g.shape1 = GeoShape::Circles;
                g.shape2 = GeoShape::Circles;
                g.count = 20;
                g.thickness = 1.0;
                g.spacing = 25.0;
                g.scale_diff = 3.0;
                g.offset_x = 0.0;
                g.offset_y = 0.0;
                s.movement.speed = 1.0;
            }
            Self::Psychedelic => {
                s.mode = Mode::Svg;
                let p = &mut s.svg;
                p.pattern1 = Pattern::Spiral;
                p.scale1 = 100.0;
                p.pattern2 = Pattern::Radial;
                p.scale2 = 100.0;
                p.speed2 = 20.0;
                s.global.blend_mode = BlendMode::Xor;
            }
            Self::LineSpeedup => {
                s.mode = Mode::Line;
                set_gratings(s, [10.0, 4.0, 0.0, 100.0], [11.0, 4.0, 0.0, 100.0]);
                s.line.curve_enabled = false;
                set_movement(s, MovementKind::Linear, Axis::Y, 50.0, 100.0, 5.0);
                s.global.blend_mode = BlendMode::Difference;
            }
            Self::LineWave => {
                s.mode = Mode::Line;
                set_gratings(s, [8.0, 3.0, 0.0, 100.0], [9.0, 3.0, 0.0, 100.0]);
                s.line.curve_enabled = true;
                s.line.curve_amplitude = 20.0;
                s.line.curve_frequency = 3.0;
                s.line.curve_speed = 15.0;
                set_movement(s, MovementKind::Linear, Axis::Y, 50.0, 100.0, 8.0);
                s.global.blend_mode = BlendMode::Difference;
            }
            Self::LineTilt => {
                s.mode = Mode::Line;
                set_gratings(s, [12.0, 5.0, 10.0, 100.0], [12.0, 5.0, 10.0, 100.0]);
                s.line.curve_enabled = false;
                set_movement(s, MovementKind::Swing, Axis::Both, 30.0, 30.0, 8.0);
                s.global.blend_mode = BlendMode::Difference;
            }
            Self::ShapeMagnify => {
                s.mode = Mode::Shape;
                let p = &mut s.shape;
                p.text = "HELLO".to_owned();
                p.font = "Arial Black".to_owned();
                p.font_size = 80.0;
                p.period_base = 10.0;
                p.compression = 10.0;
                p.repeat_x = 3;
                p.period_reveal = 11.0;
                p.slit_width = 2.0;
                p.reveal_opacity = 100.0;
                set_movement(s, MovementKind::Linear, Axis::Y, 50.0, 100.0, 8.0);
            }
        }
    }
}

fn set_gratings(s: &mut Settings, base: [f64; 4], reveal: [f64; 4]) {
    let l = &mut s.line;
    [
        l.period_base,
        l.thickness_base,
        l.angle_base,
        l.opacity_base,
    ] = base;
    [
        l.period_reveal,
        l.thickness_reveal,
        l.angle_reveal,
        l.opacity_reveal,
    ] = reveal;
}

fn set_movement(
    s: &mut Settings,
    kind: MovementKind,
    axis: Axis,
    swing_x: f64,
    swing_y: f64,
    speed: f64,
) {
    let m = &mut s.movement;
    m.kind = kind;
    m.axis = axis;
    m.swing_x = swing_x;
    m.swing_y = swing_y;
    m.speed = speed;
}

impl FromStr for Preset {
    type Err = MoireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MoireError::validation(format!("unknown preset \"{s}\"")))
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Settings {
    /// Return a copy of these settings with `preset` merged in.
    pub fn with_preset(&self, preset: Preset) -> Settings {
        let mut out = self.clone();
        preset.apply(&mut out);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/presets.rs"]
mod tests;
