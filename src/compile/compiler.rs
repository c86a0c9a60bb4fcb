use std::sync::Arc;

use kurbo::Shape as _;

use crate::anim::oscillator::{animated_scale, movement_offset};
use crate::assets::custom::{CustomAssets, SlotId};
use crate::compile::fingerprint::fingerprint_base;
use crate::compile::plan::{ClipSpan, FramePlan, LayerPass, LayerRole};
use crate::draw::geometric::{GeoSpec, draw_geometric};
use crate::draw::grating::{GratingCurve, LineGrating, draw_grating};
use crate::draw::list::{DrawList, TOLERANCE, TextRun};
use crate::draw::overlay::draw_overlay;
use crate::draw::patterns::draw_pattern;
use crate::draw::text::{TextGrid, TextMeasure, draw_text_grid};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
use crate::foundation::math::{usable_step, wrap};
use crate::settings::model::{
    ActiveMode, BlendMode, GeometricParams, GlobalParams, LineParams, Settings, ShapeParams,
    SvgParams, TextParams,
};

/// Per-frame values shared by the mode planners.
struct FrameCtx<'a> {
    canvas: Canvas,
    center: Point,
    time: f64,
    osc: Vec2,
    anim_scale: f64,
    global: &'a GlobalParams,
}

/// A layer before clip and canvas rotation are applied.
struct Layer {
    transform: Affine,
    opacity: f64,
    blend: BlendMode,
    color: Rgba8,
    draw: DrawList,
}

impl Layer {
    fn new(transform: Affine, opacity: f64, blend: BlendMode, color: Rgba8) -> Self {
        Self {
            transform,
            opacity,
            blend,
            color,
            draw: DrawList::new(),
        }
    }
}

/// Build the plan of one frame.
///
/// Pure in `(settings, time, canvas)` given the same text measurement and asset readiness.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(mode = settings.mode.as_str(), time = time, w = canvas.width, h = canvas.height)
)]
pub fn compile_frame(
    settings: &Settings,
    time: f64,
    canvas: Canvas,
    text: &mut dyn TextMeasure,
    assets: &CustomAssets,
) -> FramePlan {
    let g = &settings.global;
    let center = canvas.center();
    let ctx = FrameCtx {
        canvas,
        center,
        time,
        osc: movement_offset(time, &settings.movement),
        anim_scale: animated_scale(time, &settings.scale),
        global: g,
    };

    let (base, reveal) = match settings.active_mode() {
        ActiveMode::Svg(p) => plan_svg(&ctx, p, assets),
        ActiveMode::Geometric(p) => plan_geometric(&ctx, p),
        ActiveMode::Text(p) => plan_text(&ctx, p, text),
        ActiveMode::Line(p) => plan_line(&ctx, p),
        ActiveMode::Shape(p) => plan_shape(&ctx, p, text),
    };

    let global = if g.canvas_rotation != 0.0 && g.canvas_rotation.is_finite() {
        Affine::rotate_about(g.canvas_rotation.to_radians(), center)
    } else {
        Affine::IDENTITY
    };
    let width = canvas.width_f64();
    let finish = |role: LayerRole, clip: ClipSpan, layer: Layer| LayerPass {
        role,
        clip,
        transform: global * layer.transform,
        opacity: unit_opacity(layer.opacity),
        blend: layer.blend,
        color: layer.color,
        draw: layer.draw,
    };

    FramePlan {
        canvas,
        background: g.background,
        global,
        base: finish(LayerRole::Base, ClipSpan::base(g.cutoff_base, width), base),
        reveal: finish(
            LayerRole::Reveal,
            ClipSpan::reveal(g.cutoff_reveal, width),
            reveal,
        ),
        base_key: fingerprint_base(settings, canvas, assets.generation(SlotId::Base)),
    }
}

fn unit_opacity(v: f64) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}

fn plan_svg(ctx: &FrameCtx<'_>, p: &SvgParams, assets: &CustomAssets) -> (Layer, Layer) {
    let size = ctx.canvas.max_side();
    let fg = ctx.global.foreground;

    let mut base = Layer::new(
        Affine::translate(ctx.center.to_vec2())
            * Affine::rotate(p.rotation1.to_radians())
            * Affine::scale(p.scale1 / 100.0),
        p.opacity1 / 100.0,
        BlendMode::Normal,
        fg,
    );
    draw_pattern(
        &mut base.draw,
        &p.pattern1,
        size,
        p.stroke_width1,
        assets.custom_image(SlotId::Base),
    );

    let spin = p.rotation2 + ctx.time * p.speed2 * 10.0;
    let at = ctx.center.to_vec2() + Vec2::new(p.offset_x2, p.offset_y2) + ctx.osc;
    let mut reveal = Layer::new(
        Affine::translate(at)
            * Affine::rotate(spin.to_radians())
            * Affine::scale(p.scale2 / 100.0 * ctx.anim_scale),
        p.opacity2 / 100.0,
        ctx.global.blend_mode,
        fg,
    );
    draw_pattern(
        &mut reveal.draw,
        &p.pattern2,
        size,
        p.stroke_width2,
        assets.custom_image(SlotId::Reveal),
    );

    (base, reveal)
}

fn plan_geometric(ctx: &FrameCtx<'_>, p: &GeometricParams) -> (Layer, Layer) {
    let fg = ctx.global.foreground;
    let spec = GeoSpec {
        count: p.count,
        spacing: p.spacing,
        thickness: p.thickness,
        size: ctx.canvas.max_side(),
    };

    let mut base = Layer::new(
        Affine::translate(ctx.center.to_vec2()),
        1.0,
        BlendMode::Normal,
        fg,
    );
    draw_geometric(&mut base.draw, &p.shape1, spec);

    let at = ctx.center.to_vec2() + Vec2::new(p.offset_x, p.offset_y) + ctx.osc;
    let mut reveal = Layer::new(
        Affine::translate(at)
            * Affine::rotate(ctx.time * p.rotation_speed * 0.1)
            * Affine::scale((1.0 + p.scale_diff / 100.0) * ctx.anim_scale),
        1.0,
        ctx.global.blend_mode,
        fg,
    );
    draw_geometric(&mut reveal.draw, &p.shape2, spec);

    (base, reveal)
}

fn plan_text(ctx: &FrameCtx<'_>, p: &TextParams, text: &mut dyn TextMeasure) -> (Layer, Layer) {
    let fg = ctx.global.foreground;
    let run = Arc::new(TextRun {
        text: p.text.clone(),
        family: p.font.clone(),
        size: p.size,
        letter_spacing: p.spacing,
    });
    let measured = text.measure(&run);
    let grid = TextGrid::for_run(&run, measured, p.repeat_x, p.repeat_y);

    let mut base = Layer::new(Affine::IDENTITY, 1.0, BlendMode::Normal, fg);
    draw_text_grid(&mut base.draw, &run, &grid, ctx.center);

    let at = ctx.center.to_vec2() + Vec2::new(p.offset_x, p.offset_y) + ctx.osc;
    let mut reveal = Layer::new(
        Affine::translate(at)
            * Affine::rotate(ctx.time * p.rotation_speed * 0.1)
            * Affine::scale(ctx.anim_scale),
        1.0,
        ctx.global.blend_mode,
        fg,
    );
    draw_overlay(
        &mut reveal.draw,
        &p.overlay,
        p.overlay_spacing,
        ctx.canvas.max_side(),
        (&run, &grid),
    );

    (base, reveal)
}

fn plan_line(ctx: &FrameCtx<'_>, p: &LineParams) -> (Layer, Layer) {
    let fg = ctx.global.foreground;
    let size = ctx.canvas.diagonal();

    let mut base = Layer::new(
        Affine::translate(ctx.center.to_vec2()),
        p.opacity_base / 100.0,
        BlendMode::Normal,
        fg,
    );
    draw_grating(
        &mut base.draw,
        &LineGrating {
            period: p.period_base,
            thickness: p.thickness_base,
            angle: p.angle_base,
            size,
            offset_y: 0.0,
            curve: None,
        },
    );

    let mut reveal = Layer::new(
        Affine::translate(ctx.center.to_vec2() + ctx.osc)
            * Affine::rotate(ctx.time * p.rotation_speed * 0.1)
            * Affine::scale(ctx.anim_scale),
        p.opacity_reveal / 100.0,
        ctx.global.blend_mode,
        fg,
    );
    let curve = p.curve_enabled.then(|| GratingCurve {
        amplitude: p.curve_amplitude,
        frequency: p.curve_frequency,
        time: ctx.time * p.curve_speed * 0.1,
    });
    draw_grating(
        &mut reveal.draw,
        &LineGrating {
            period: p.period_reveal,
            thickness: p.thickness_reveal,
            angle: p.angle_reveal,
            size,
            offset_y: 0.0,
            curve,
        },
    );

    (base, reveal)
}

fn plan_shape(
    ctx: &FrameCtx<'_>,
    p: &ShapeParams,
    text: &mut dyn TextMeasure,
) -> (Layer, Layer) {
    let (w, h) = (ctx.canvas.width_f64(), ctx.canvas.height_f64());

    let mut base = Layer::new(
        Affine::IDENTITY,
        1.0,
        BlendMode::Normal,
        ctx.global.foreground,
    );
    let block = p.period_base * p.compression;
    if usable_step(block) && p.compression > 0.0 {
        let run = Arc::new(TextRun {
            text: p.text.clone(),
            family: p.font.clone(),
            size: p.font_size,
            letter_spacing: 0.0,
        });
        let repeat_width = text.measure(&run) * 1.3;
        let blocks = (h / block).ceil() as i64 + 2;
        let squash = Affine::scale_non_uniform(1.0, 1.0 / p.compression);
        for rep in 0..p.repeat_x {
            let x = (f64::from(rep) - f64::from(p.repeat_x) / 2.0 + 0.5) * repeat_width + w / 2.0;
            for b in -1..blocks {
                let y = b as f64 * block + block / 2.0;
                base.draw.text(&run, Affine::translate((x, y)) * squash);
            }
        }
    }

    // Bars are painted in the background color; the gaps between them are the slits.
    let mut reveal = Layer::new(
        Affine::rotate_about(ctx.time * p.rotation_speed * 0.1, ctx.center),
        p.reveal_opacity / 100.0,
        BlendMode::Normal,
        ctx.global.background,
    );
    let period = p.period_reveal;
    if usable_step(period) {
        let bar = period - p.slit_width;
        let shift = wrap(ctx.osc.y * 10.0, period) + p.slit_width;
        let bars = (h / period).ceil() as i64 + 2;
        let mut path = BezPath::new();
        if bar > 0.0 {
            for i in -1..bars {
                let y = i as f64 * period + shift;
                path.extend(Rect::new(0.0, y, w, y + bar).path_elements(TOLERANCE));
            }
        }
        reveal.draw.fill_each(&path);
    }

    (base, reveal)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
