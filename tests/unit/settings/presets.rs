use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn hypnotic_sets_exact_fields() {
    let s = Settings::default().with_preset(Preset::Hypnotic);
    assert_eq!(s.mode, Mode::Svg);
    assert_eq!(s.global.blend_mode, BlendMode::Difference);
    assert_eq!(s.svg.pattern1, Pattern::Circles);
    assert_eq!(s.svg.pattern2, Pattern::Circles);
    assert_eq!(s.svg.scale2, 102.0);
    assert_eq!(s.svg.speed2, 5.0);
}

#[test]
fn presets_merge_instead_of_replacing() {
    let mut base = Settings::default();
    base.global.foreground = Rgba8::rgb(255, 0, 0);
    base.svg.stroke_width2 = 7.0;
    base.line.curve_amplitude = 42.0;

    let s = base.with_preset(Preset::Chaos);
    assert_eq!(s.global.foreground, Rgba8::rgb(255, 0, 0));
    assert_eq!(s.svg.stroke_width2, 7.0);
    assert_eq!(s.svg.pattern1, Pattern::Hexagon);
    assert_eq!(s.global.blend_mode, BlendMode::Exclusion);

    let s = base.with_preset(Preset::LineTilt);
    assert_eq!(s.line.curve_amplitude, 42.0);
    assert_eq!(s.line.angle_reveal, 10.0);
    assert_eq!(s.movement.kind, MovementKind::Swing);
}

#[test]
fn with_preset_leaves_source_untouched() {
    let base = Settings::default();
    let _ = base.with_preset(Preset::ShapeMagnify);
    assert_eq!(base, Settings::default());
}

#[test]
fn line_wave_enables_curve() {
    let s = Settings::default().with_preset(Preset::LineWave);
    assert_eq!(s.mode, Mode::Line);
    assert!(s.line.curve_enabled);
    assert_eq!(s.line.curve_amplitude, 20.0);
    assert_eq!(s.line.curve_frequency, 3.0);
    assert_eq!(s.movement.axis, Axis::Y);
    assert_eq!(s.movement.swing_y, 100.0);
}

#[test]
fn names_parse_back() {
    for p in Preset::ALL {
        assert_eq!(p.name().parse::<Preset>().unwrap(), p);
    }
    assert_eq!("LINESPEEDUP".parse::<Preset>().unwrap(), Preset::LineSpeedup);
    assert!("disco".parse::<Preset>().is_err());
}
