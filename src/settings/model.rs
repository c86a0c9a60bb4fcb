use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{MoireError, MoireResult};

/// Defines a catalog identifier enum that keeps unknown identifiers instead of rejecting them.
macro_rules! catalog_id {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $id:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Identifier outside the catalog. Layers using it draw nothing.
            Unknown(String),
        }

        impl $name {
            /// Every catalog member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Catalog identifier as used in settings documents.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $id,)+
                    Self::Unknown(s) => s.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($id => Self::$variant,)+
                    other => Self::Unknown(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from(s.as_str())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.as_str().to_owned()
            }
        }
    };
}

catalog_id! {
    /// Overlay-pattern catalog used by the `svg` mode.
    Pattern {
        /// Concentric circles.
        Circles => "circles",
        /// Archimedean spiral.
        Spiral => "spiral",
        /// Ray fan.
        Radial => "radial",
        /// Square ruling.
        Grid => "grid",
        /// Hexagonal tiling.
        Hexagon => "hexagon",
        /// Sine scanlines.
        Waves => "waves",
        /// Checkerboard.
        Checkers => "checkers",
        /// Chained quarter arcs with Fibonacci radii.
        Fibonacci => "fibonacci",
        /// The layer's custom image asset.
        Custom => "custom",
    }
}

catalog_id! {
    /// Shape catalog used by the `geometric` mode.
    GeoShape {
        /// Concentric circles at `spacing` steps.
        Circles => "circles",
        /// Ray fan with `count` rays.
        RadialLines => "radialLines",
        /// Square ruling of `2·count + 1` lines per axis.
        RectangularGrid => "rectangularGrid",
        /// Hexagonal tiling.
        HexGrid => "hexGrid",
        /// Nested upward triangles.
        Triangles => "triangles",
        /// Dot lattice.
        Dots => "dots",
    }
}

catalog_id! {
    /// Reveal-layer catalog used by the `text` mode.
    OverlayKind {
        /// The text grid itself.
        Text => "text",
        /// Horizontal rulings.
        Lines => "lines",
        /// Vertical rulings.
        VerticalLines => "verticalLines",
        /// Horizontal and vertical rulings.
        Grid => "grid",
        /// Concentric rings.
        Circles => "circles",
    }
}

/// Which pattern family renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Overlay patterns from the [`Pattern`] catalog.
    #[default]
    Svg,
    /// Spacing/count driven shapes from the [`GeoShape`] catalog.
    Geometric,
    /// Repeated text with an overlay.
    Text,
    /// Angled line gratings.
    Line,
    /// Compressed text revealed through slits.
    Shape,
}

impl Mode {
    /// Identifier as used in settings documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Geometric => "geometric",
            Self::Text => "text",
            Self::Line => "line",
            Self::Shape => "shape",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "svg" => Self::Svg,
            "geometric" => Self::Geometric,
            "text" => Self::Text,
            "line" => Self::Line,
            "shape" => Self::Shape,
            _ => return None,
        })
    }
}

/// Compositing operator for reveal layers.
///
/// Unknown identifiers deserialize to [`BlendMode::Normal`], which is what a drawing surface does
/// with an operator it does not support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// `s·d`.
    Multiply,
    /// `s + d − s·d`.
    Screen,
    /// Hard light with swapped operands.
    Overlay,
    /// `|d − s|`.
    Difference,
    /// `s + d − 2·s·d`.
    Exclusion,
    /// Porter-Duff xor.
    Xor,
}

impl BlendMode {
    /// Identifier as used in settings documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Xor => "xor",
        }
    }
}

impl From<&str> for BlendMode {
    fn from(s: &str) -> Self {
        match s {
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            "xor" => Self::Xor,
            _ => Self::Normal,
        }
    }
}

impl From<String> for BlendMode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<BlendMode> for String {
    fn from(v: BlendMode) -> Self {
        v.as_str().to_owned()
    }
}

/// Movement oscillator model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// No displacement; layers rely on their own rotation.
    #[default]
    Rotation,
    /// Independent sines per axis.
    Swing,
    /// Triangle wave per axis.
    Linear,
    /// Ellipse driven by one phase.
    Circular,
    /// 3:2·ratio Lissajous figure.
    Lissajous,
}

impl MovementKind {
    /// Identifier as used in settings documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::Swing => "swing",
            Self::Linear => "linear",
            Self::Circular => "circular",
            Self::Lissajous => "lissajous",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "rotation" => Self::Rotation,
            "swing" => Self::Swing,
            "linear" => Self::Linear,
            "circular" => Self::Circular,
            "lissajous" => Self::Lissajous,
            _ => return None,
        })
    }
}

/// Axis restriction applied after the oscillator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Keep both components.
    #[default]
    Both,
    /// Keep `dx` only.
    X,
    /// Keep `dy` only.
    Y,
}

impl Axis {
    /// Identifier as used in settings documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::X => "x",
            Self::Y => "y",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "both" => Self::Both,
            "x" => Self::X,
            "y" => Self::Y,
            _ => return None,
        })
    }
}

/// Parameters of the overlay-pattern (`svg`) mode.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SvgParams {
    /// Base pattern.
    pub pattern1: Pattern,
    /// Base scale in percent.
    pub scale1: f64,
    /// Base rotation in degrees.
    pub rotation1: f64,
    /// Base opacity in percent.
    pub opacity1: f64,
    /// Base stroke width.
    pub stroke_width1: f64,
    /// Custom asset source for the base layer (SVG markup or a file path).
    pub custom1: String,
    /// Reveal pattern.
    pub pattern2: Pattern,
    /// Reveal scale in percent.
    pub scale2: f64,
    /// Reveal rotation in degrees.
    pub rotation2: f64,
    /// Reveal spin speed (degrees per time unit divided by 10).
    pub speed2: f64,
    /// Reveal opacity in percent.
    pub opacity2: f64,
    /// Reveal stroke width.
    pub stroke_width2: f64,
    /// Reveal horizontal offset.
    pub offset_x2: f64,
    /// Reveal vertical offset.
    pub offset_y2: f64,
    /// Custom asset source for the reveal layer.
    pub custom2: String,
}

impl Default for SvgParams {
    fn default() -> Self {
        Self {
            pattern1: Pattern::Circles,
            scale1: 100.0,
            rotation1: 0.0,
            opacity1: 100.0,
            stroke_width1: 2.0,
            custom1: String::new(),
            pattern2: Pattern::Spiral,
            scale2: 100.0,
            rotation2: 0.0,
            speed2: 10.0,
            opacity2: 100.0,
            stroke_width2: 2.0,
            offset_x2: 0.0,
            offset_y2: 0.0,
            custom2: String::new(),
        }
    }
}

/// Parameters of the `geometric` mode.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometricParams {
    /// Base shape.
    pub shape1: GeoShape,
    /// Reveal shape.
    pub shape2: GeoShape,
    /// Number of rings/rays/lines.
    pub count: u32,
    /// Stroke width, and dot radius for [`GeoShape::Dots`].
    pub thickness: f64,
    /// Distance between successive elements.
    pub spacing: f64,
    /// Extra reveal scale in percent.
    pub scale_diff: f64,
    /// Reveal horizontal offset.
    pub offset_x: f64,
    /// Reveal vertical offset.
    pub offset_y: f64,
    /// Reveal spin speed.
    pub rotation_speed: f64,
}

impl Default for GeometricParams {
    fn default() -> Self {
        Self {
            shape1: GeoShape::Circles,
            shape2: GeoShape::Circles,
            count: 40,
            thickness: 2.0,
            spacing: 15.0,
            scale_diff: 5.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation_speed: 10.0,
        }
    }
}

/// Parameters of the repeated-text mode.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextParams {
    /// Text content.
    pub text: String,
    /// Font family.
    pub font: String,
    /// Font size in pixels.
    pub size: f64,
    /// Letter spacing in pixels.
    pub spacing: f64,
    /// Columns of the grid.
    pub repeat_x: u32,
    /// Rows of the grid.
    pub repeat_y: u32,
    /// Reveal layer kind.
    pub overlay: OverlayKind,
    /// Ruling/ring spacing of the reveal layer.
    pub overlay_spacing: f64,
    /// Reveal horizontal offset.
    pub offset_x: f64,
    /// Reveal vertical offset.
    pub offset_y: f64,
    /// Reveal spin speed.
    pub rotation_speed: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            text: "MOIRÉ".to_owned(),
            font: "Inter".to_owned(),
            size: 80.0,
            spacing: 0.0,
            repeat_x: 5,
            repeat_y: 5,
            overlay: OverlayKind::Text,
            overlay_spacing: 8.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation_speed: 5.0,
        }
    }
}

/// Parameters of the line-grating mode.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineParams {
    /// Base line period.
    pub period_base: f64,
    /// Base line thickness.
    pub thickness_base: f64,
    /// Base inclination in degrees.
    pub angle_base: f64,
    /// Base opacity in percent.
    pub opacity_base: f64,
    /// Reveal line period.
    pub period_reveal: f64,
    /// Reveal line thickness.
    pub thickness_reveal: f64,
    /// Reveal inclination in degrees.
    pub angle_reveal: f64,
    /// Reveal opacity in percent.
    pub opacity_reveal: f64,
    /// Enables the traveling-wave distortion of the reveal grating.
    pub curve_enabled: bool,
    /// Wave amplitude in degrees.
    pub curve_amplitude: f64,
    /// Wave count across the grating.
    pub curve_frequency: f64,
    /// Wave travel speed.
    pub curve_speed: f64,
    /// Reveal spin speed.
    pub rotation_speed: f64,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            period_base: 8.0,
            thickness_base: 3.0,
            angle_base: 0.0,
            opacity_base: 100.0,
            period_reveal: 9.0,
            thickness_reveal: 3.0,
            angle_reveal: 0.0,
            opacity_reveal: 100.0,
            curve_enabled: false,
            curve_amplitude: 15.0,
            curve_frequency: 2.0,
            curve_speed: 10.0,
            rotation_speed: 0.0,
        }
    }
}

/// Parameters of the compressed-text reveal mode.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeParams {
    /// Hidden text.
    pub text: String,
    /// Font family.
    pub font: String,
    /// Font size in pixels before compression.
    pub font_size: f64,
    /// Slice period of the compressed text.
    pub period_base: f64,
    /// Vertical compression factor.
    pub compression: f64,
    /// Horizontal repetitions.
    pub repeat_x: u32,
    /// Bar period of the reveal layer.
    pub period_reveal: f64,
    /// Height of the transparent slits between bars.
    pub slit_width: f64,
    /// Bar opacity in percent.
    pub reveal_opacity: f64,
    /// Reveal spin speed.
    pub rotation_speed: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            text: "HELLO".to_owned(),
            font: "Arial Black".to_owned(),
            font_size: 60.0,
            period_base: 8.0,
            compression: 8.0,
            repeat_x: 3,
            period_reveal: 9.0,
            slit_width: 2.0,
            reveal_opacity: 100.0,
            rotation_speed: 0.0,
        }
    }
}

/// Movement oscillator parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovementParams {
    /// Oscillator model.
    #[serde(rename = "type")]
    pub kind: MovementKind,
    /// Axis restriction.
    pub axis: Axis,
    /// Horizontal amplitude.
    pub swing_x: f64,
    /// Vertical amplitude.
    pub swing_y: f64,
    /// Time multiplier.
    pub speed: f64,
    /// Vertical to horizontal frequency ratio.
    pub xy_ratio: f64,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            kind: MovementKind::Rotation,
            axis: Axis::Both,
            swing_x: 50.0,
            swing_y: 50.0,
            speed: 10.0,
            xy_ratio: 10.0,
        }
    }
}

/// Scale animation parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleAnimParams {
    /// Disabled means a constant factor of 1.
    pub enabled: bool,
    /// Lower bound in percent.
    pub min: f64,
    /// Upper bound in percent.
    pub max: f64,
    /// Time multiplier.
    pub speed: f64,
}

impl Default for ScaleAnimParams {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 80.0,
            max: 120.0,
            speed: 10.0,
        }
    }
}

/// Colors, compositing and frame-wide switches.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalParams {
    /// Pattern color.
    pub foreground: Rgba8,
    /// Surface fill, and the bar color of the compressed-text reveal.
    pub background: Rgba8,
    /// Reveal-layer compositing operator.
    pub blend_mode: BlendMode,
    /// Advances time on each tick when set.
    pub animation_enabled: bool,
    /// Runs time backwards.
    pub reverse: bool,
    /// Whole-surface rotation about the center, in degrees.
    pub canvas_rotation: f64,
    /// Visible fraction of the base layer from the left edge, in percent.
    pub cutoff_base: f64,
    /// Visible fraction of the reveal layer from the right edge, in percent.
    pub cutoff_reveal: f64,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            foreground: Rgba8::rgb(0xff, 0xff, 0xff),
            background: Rgba8::rgb(0x0a, 0x0a, 0x0f),
            blend_mode: BlendMode::Difference,
            animation_enabled: true,
            reverse: false,
            canvas_rotation: 0.0,
            cutoff_base: 100.0,
            cutoff_reveal: 100.0,
        }
    }
}

/// Complete per-frame settings snapshot.
///
/// Settings are values: callers build the next snapshot and hand it over wholesale.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Active pattern family.
    pub mode: Mode,
    /// `svg` mode block.
    pub svg: SvgParams,
    /// `geometric` mode block.
    pub geometric: GeometricParams,
    /// `text` mode block.
    pub text: TextParams,
    /// `line` mode block.
    pub line: LineParams,
    /// `shape` mode block.
    pub shape: ShapeParams,
    /// Movement oscillator.
    pub movement: MovementParams,
    /// Scale oscillator.
    pub scale: ScaleAnimParams,
    /// Frame-wide switches.
    pub global: GlobalParams,
}

/// The active mode together with its parameter block.
#[derive(Clone, Copy, Debug)]
pub enum ActiveMode<'a> {
    /// Overlay patterns.
    Svg(&'a SvgParams),
    /// Geometric shapes.
    Geometric(&'a GeometricParams),
    /// Repeated text.
    Text(&'a TextParams),
    /// Line gratings.
    Line(&'a LineParams),
    /// Compressed text reveal.
    Shape(&'a ShapeParams),
}

impl Settings {
    /// Borrow the parameter block selected by [`Settings::mode`].
    pub fn active_mode(&self) -> ActiveMode<'_> {
        match self.mode {
            Mode::Svg => ActiveMode::Svg(&self.svg),
            Mode::Geometric => ActiveMode::Geometric(&self.geometric),
            Mode::Text => ActiveMode::Text(&self.text),
            Mode::Line => ActiveMode::Line(&self.line),
            Mode::Shape => ActiveMode::Shape(&self.shape),
        }
    }

    /// Parse a settings document. Missing keys take their defaults.
    pub fn from_json_str(s: &str) -> MoireResult<Self> {
        serde_json::from_str(s).map_err(|e| MoireError::serde(format!("parse settings: {e}")))
    }

    /// Read and parse a settings document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> MoireResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> MoireResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MoireError::serde(format!("serialize settings: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
