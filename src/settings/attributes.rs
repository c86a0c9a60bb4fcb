//! Flat key/value attribute schema used by block-style hosts.
//!
//! Hosts persist settings as primitive string pairs (`svgPattern1 = "spiral"`, `geoCount = "40"`).
//! Loading applies the documented default for every missing, empty or unparsable value.

use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;
use crate::settings::model::{
    Axis, BlendMode, GeoShape, Mode, MovementKind, OverlayKind, Pattern, Settings,
};

/// Flat attribute map, ordered for stable output.
pub type Attributes = BTreeMap<String, String>;

fn number_fields(s: &mut Settings, mut f: impl FnMut(&'static str, &mut f64)) {
    f("svgScale1", &mut s.svg.scale1);
    f("svgRotation1", &mut s.svg.rotation1);
    f("svgOpacity1", &mut s.svg.opacity1);
    f("svgStrokeWidth1", &mut s.svg.stroke_width1);
    f("svgScale2", &mut s.svg.scale2);
    f("svgRotation2", &mut s.svg.rotation2);
    f("svgSpeed2", &mut s.svg.speed2);
    f("svgOpacity2", &mut s.svg.opacity2);
    f("svgStrokeWidth2", &mut s.svg.stroke_width2);
    f("svgOffsetX2", &mut s.svg.offset_x2);
    f("svgOffsetY2", &mut s.svg.offset_y2);

    f("geoThickness", &mut s.geometric.thickness);
    f("geoSpacing", &mut s.geometric.spacing);
    f("geoScaleDiff", &mut s.geometric.scale_diff);
    f("geoOffsetX", &mut s.geometric.offset_x);
    f("geoOffsetY", &mut s.geometric.offset_y);
    f("geoRotationSpeed", &mut s.geometric.rotation_speed);

    f("textSize", &mut s.text.size);
    f("textSpacing", &mut s.text.spacing);
    f("textOverlaySpacing", &mut s.text.overlay_spacing);
    f("textOffsetX", &mut s.text.offset_x);
    f("textOffsetY", &mut s.text.offset_y);
    f("textRotationSpeed", &mut s.text.rotation_speed);

    f("linePeriodBase", &mut s.line.period_base);
    f("lineThicknessBase", &mut s.line.thickness_base);
    f("lineAngleBase", &mut s.line.angle_base);
    f("lineOpacityBase", &mut s.line.opacity_base);
    f("linePeriodReveal", &mut s.line.period_reveal);
    f("lineThicknessReveal", &mut s.line.thickness_reveal);
    f("lineAngleReveal", &mut s.line.angle_reveal);
    f("lineOpacityReveal", &mut s.line.opacity_reveal);
    f("lineCurveAmplitude", &mut s.line.curve_amplitude);
    f("lineCurveFrequency", &mut s.line.curve_frequency);
    f("lineCurveSpeed", &mut s.line.curve_speed);
    f("lineRotationSpeed", &mut s.line.rotation_speed);

    f("shapeFontSize", &mut s.shape.font_size);
    f("shapePeriodBase", &mut s.shape.period_base);
    f("shapeCompression", &mut s.shape.compression);
    f("shapePeriodReveal", &mut s.shape.period_reveal);
    f("shapeSlitWidth", &mut s.shape.slit_width);
    f("shapeRevealOpacity", &mut s.shape.reveal_opacity);
    f("shapeRotationSpeed", &mut s.shape.rotation_speed);

    f("swingX", &mut s.movement.swing_x);
    f("swingY", &mut s.movement.swing_y);
    f("moveSpeed", &mut s.movement.speed);
    f("xyRatio", &mut s.movement.xy_ratio);

    f("scaleMin", &mut s.scale.min);
    f("scaleMax", &mut s.scale.max);
    f("scaleSpeed", &mut s.scale.speed);

    f("cutoffBase", &mut s.global.cutoff_base);
    f("cutoffReveal", &mut s.global.cutoff_reveal);
    f("canvasRotation", &mut s.global.canvas_rotation);
}

fn count_fields(s: &mut Settings, mut f: impl FnMut(&'static str, &mut u32)) {
    f("geoCount", &mut s.geometric.count);
    f("textRepeatX", &mut s.text.repeat_x);
    f("textRepeatY", &mut s.text.repeat_y);
    f("shapeRepeatX", &mut s.shape.repeat_x);
}

fn flag_fields(s: &mut Settings, mut f: impl FnMut(&'static str, &mut bool)) {
    f("lineCurveEnabled", &mut s.line.curve_enabled);
    f("scaleAnimEnabled", &mut s.scale.enabled);
    f("animationEnabled", &mut s.global.animation_enabled);
    f("reverseDirection", &mut s.global.reverse);
}

fn text_fields(s: &mut Settings, mut f: impl FnMut(&'static str, &mut String)) {
    f("svgCustom1", &mut s.svg.custom1);
    f("svgCustom2", &mut s.svg.custom2);
    f("textContent", &mut s.text.text);
    f("textFont", &mut s.text.font);
    f("shapeText", &mut s.shape.text);
    f("shapeFont", &mut s.shape.font);
}

/// Rebuild settings from a flat attribute map.
///
/// Catalog identifiers outside the catalog are kept as unknown identifiers (their layer draws
/// nothing); unparsable numbers, flags, colors and enum selectors fall back to defaults.
pub fn from_attributes(attrs: &Attributes) -> Settings {
    let mut s = Settings::default();
    let get = |key: &str| attrs.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    number_fields(&mut s, |key, slot| {
        if let Some(v) = get(key).and_then(|v| v.parse::<f64>().ok())
            && v.is_finite()
        {
            *slot = v;
        }
    });
    count_fields(&mut s, |key, slot| {
        if let Some(v) = get(key).and_then(|v| v.parse::<f64>().ok())
            && v.is_finite()
            && v >= 0.0
        {
            *slot = v.round() as u32;
        }
    });
    flag_fields(&mut s, |key, slot| match get(key) {
        Some("true") => *slot = true,
        Some("false") => *slot = false,
        _ => {}
    });
    text_fields(&mut s, |key, slot| {
        if let Some(v) = attrs.get(key)
            && !v.is_empty()
        {
            v.clone_into(slot);
        }
    });

    if let Some(m) = get("mode").and_then(Mode::parse) {
        s.mode = m;
    }
    if let Some(v) = get("svgPattern1") {
        s.svg.pattern1 = Pattern::from(v);
    }
    if let Some(v) = get("svgPattern2") {
        s.svg.pattern2 = Pattern::from(v);
    }
    if let Some(v) = get("geoShape1") {
        s.geometric.shape1 = GeoShape::from(v);
    }
    if let Some(v) = get("geoShape2") {
        s.geometric.shape2 = GeoShape::from(v);
    }
    if let Some(v) = get("textOverlay") {
        s.text.overlay = OverlayKind::from(v);
    }
    if let Some(k) = get("movementType").and_then(MovementKind::parse) {
        s.movement.kind = k;
    }
    if let Some(a) = get("moveAxis").and_then(Axis::parse) {
        s.movement.axis = a;
    }
    if let Some(c) = get("foregroundColor").and_then(|v| Rgba8::from_hex(v).ok()) {
        s.global.foreground = c;
    }
    if let Some(c) = get("backgroundColor").and_then(|v| Rgba8::from_hex(v).ok()) {
        s.global.background = c;
    }
    if let Some(v) = get("blendMode") {
        s.global.blend_mode = BlendMode::from(v);
    }
    s
}

/// Flatten settings into the attribute schema. Every key is written.
pub fn to_attributes(settings: &Settings) -> Attributes {
    let mut s = settings.clone();
    let mut out = Attributes::new();

    number_fields(&mut s, |key, v| {
        out.insert(key.to_owned(), v.to_string());
    });
    count_fields(&mut s, |key, v| {
        out.insert(key.to_owned(), v.to_string());
    });
    flag_fields(&mut s, |key, v| {
        out.insert(key.to_owned(), v.to_string());
    });
    text_fields(&mut s, |key, v| {
        out.insert(key.to_owned(), v.clone());
    });

    let pairs = [
        ("mode", s.mode.as_str().to_owned()),
        ("svgPattern1", s.svg.pattern1.as_str().to_owned()),
        ("svgPattern2", s.svg.pattern2.as_str().to_owned()),
        ("geoShape1", s.geometric.shape1.as_str().to_owned()),
        ("geoShape2", s.geometric.shape2.as_str().to_owned()),
        ("textOverlay", s.text.overlay.as_str().to_owned()),
        ("movementType", s.movement.kind.as_str().to_owned()),
        ("moveAxis", s.movement.axis.as_str().to_owned()),
        ("foregroundColor", s.global.foreground.to_hex()),
        ("backgroundColor", s.global.background.to_hex()),
        ("blendMode", s.global.blend_mode.as_str().to_owned()),
    ];
    for (k, v) in pairs {
        out.insert(k.to_owned(), v);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/settings/attributes.rs"]
mod tests;
