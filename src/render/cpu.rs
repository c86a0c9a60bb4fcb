use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::custom::{CustomAssets, LoadedAsset, SlotId};
use crate::assets::text::TextLayoutEngine;
use crate::compile::fingerprint::FrameFingerprint;
use crate::compile::plan::{FramePlan, LayerPass};
use crate::draw::list::DrawOp;
use crate::foundation::core::{Affine, BezPath, Canvas, Rect, Rgba8};
use crate::foundation::error::{MoireError, MoireResult};
use crate::render::backend::FrameRGBA;
use crate::render::composite::{Placement, composite_layer, composite_region};
use crate::settings::model::BlendMode;

const MITER_LIMIT: f64 = 10.0;
/// Scratch surfaces kept alive between ops.
const SCRATCH_SLOTS: usize = 4;
const SCRATCH_QUANTUM: usize = 64;

/// Options for [`CpuBackend`].
#[derive(Debug, Clone, Copy)]
pub struct CpuBackendOpts {
    pub(crate) base_cache: bool,
}

impl Default for CpuBackendOpts {
    fn default() -> Self {
        Self { base_cache: true }
    }
}

impl CpuBackendOpts {
    /// Enable or disable reuse of the rendered background and base layer across frames.
    pub fn with_base_cache(mut self, enabled: bool) -> Self {
        self.base_cache = enabled;
        self
    }
}

#[derive(Clone)]
struct ImagePaint {
    generation: u64,
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// Render context and target pixmap of one size.
struct Scratch {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl Scratch {
    fn new(w: u16, h: u16) -> Self {
        Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        }
    }

    fn dims(&self) -> (u16, u16) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn render(&mut self) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
    }
}

/// Device-space pixel box `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelBox {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl PixelBox {
    /// Scratch size covering the box, rounded up so similar ops share a surface.
    fn scratch_dims(&self) -> (u16, u16) {
        let round = |n: usize| {
            let q = n.div_ceil(SCRATCH_QUANTUM) * SCRATCH_QUANTUM;
            q.clamp(n, usize::from(u16::MAX)) as u16
        };
        (round(self.x1 - self.x0), round(self.y1 - self.y0))
    }
}

/// Background plus base layer of the last frame, keyed by its fingerprint.
#[derive(Debug, Default)]
struct BaseCache {
    key: Option<(FrameFingerprint, Canvas)>,
    data: Vec<u8>,
}

/// CPU backend: `vello_cpu` rasterizes draw commands, compositing happens in 8-bit kernels.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    scratch: Vec<Scratch>,
    base: BaseCache,
    images: [Option<ImagePaint>; 2],
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("opts", &self.opts)
            .field("base_cached", &self.base.key.is_some())
            .finish()
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendOpts::default())
    }
}

impl CpuBackend {
    /// New backend with empty caches.
    pub fn new(opts: CpuBackendOpts) -> Self {
        Self {
            opts,
            scratch: Vec::new(),
            base: BaseCache::default(),
            images: [None, None],
        }
    }

    /// Drop the cached base layer so the next frame redraws it.
    pub fn invalidate_base(&mut self) {
        self.base.key = None;
    }

    /// Render `plan` into a freshly allocated frame.
    pub fn render_plan(
        &mut self,
        plan: &FramePlan,
        text: &mut TextLayoutEngine,
        assets: &CustomAssets,
    ) -> MoireResult<FrameRGBA> {
        let mut frame = FrameRGBA::default();
        self.render_into(plan, text, assets, &mut frame)?;
        Ok(frame)
    }

    /// Render `plan` into `frame`, reusing its allocation.
    ///
    /// Order: background, base layer, reveal layer. Each draw command of a layer is
    /// composited with the layer's opacity and blend inside its clip band, in paint order.
    #[tracing::instrument(level = "debug", skip_all, fields(w = plan.canvas.width, h = plan.canvas.height))]
    pub fn render_into(
        &mut self,
        plan: &FramePlan,
        text: &mut TextLayoutEngine,
        assets: &CustomAssets,
        frame: &mut FrameRGBA,
    ) -> MoireResult<()> {
        let canvas = plan.canvas;
        let (w, h) = surface_dims(canvas)?;
        frame.resize(canvas.width, canvas.height);

        let cache_key = (plan.base_key, canvas);
        if self.opts.base_cache && self.base.key == Some(cache_key) {
            tracing::debug!("base layer cache hit");
            frame.data.copy_from_slice(&self.base.data);
        } else {
            tracing::debug!(cached = self.opts.base_cache, "base layer render");
            fill(&mut frame.data, plan.background.to_premul_array());
            self.draw_layer(&plan.base, w, h, text, assets, &mut frame.data)?;
            if self.opts.base_cache {
                self.base.data.clear();
                self.base.data.extend_from_slice(&frame.data);
                self.base.key = Some(cache_key);
            }
        }

        self.draw_layer(&plan.reveal, w, h, text, assets, &mut frame.data)?;
        Ok(())
    }

    fn draw_layer(
        &mut self,
        pass: &LayerPass,
        w: u16,
        h: u16,
        text: &mut TextLayoutEngine,
        assets: &CustomAssets,
        dst: &mut [u8],
    ) -> MoireResult<()> {
        let cols = pass.clip.columns(u32::from(w));
        if pass.draw.is_empty() || cols.0 >= cols.1 || pass.opacity <= 0.0 {
            return Ok(());
        }
        if batches(pass) {
            self.draw_batched(pass, (w, h), cols, text, assets, dst)
        } else {
            self.draw_each(pass, (w, h), cols, text, assets, dst)
        }
    }

    /// Source-over is associative: with the opacity folded into the paint, drawing every
    /// op into one surface and compositing it once equals compositing op by op.
    fn draw_batched(
        &mut self,
        pass: &LayerPass,
        (w, h): (u16, u16),
        cols: (usize, usize),
        text: &mut TextLayoutEngine,
        assets: &CustomAssets,
        dst: &mut [u8],
    ) -> MoireResult<()> {
        let mut scratch = self.take_scratch(w, h);
        let color = paint_color(pass.color, pass.opacity);
        let mut res = Ok(());
        for op in pass.draw.ops() {
            res = self
                .paint_op(&mut scratch.ctx, op, pass.transform, color, text, assets)
                .map(|_| ());
            if res.is_err() {
                break;
            }
        }
        let res = res.and_then(|()| {
            scratch.render();
            composite_layer(
                dst,
                scratch.pixmap.data_as_u8_slice(),
                u32::from(w),
                cols,
                1.0,
                BlendMode::Normal,
            )
        });
        self.put_scratch(scratch);
        res
    }

    /// Rasterize each op on a scratch surface around its device bounds and composite it
    /// with the layer's opacity and blend before the next op is drawn.
    fn draw_each(
        &mut self,
        pass: &LayerPass,
        (w, h): (u16, u16),
        cols: (usize, usize),
        text: &mut TextLayoutEngine,
        assets: &CustomAssets,
        dst: &mut [u8],
    ) -> MoireResult<()> {
        let color = paint_color(pass.color, 1.0);
        for op in pass.draw.ops() {
            let Some(bounds) = op_bounds(op, pass.transform, (w, h), cols) else {
                continue;
            };
            let (sw, sh) = bounds.scratch_dims();
            let mut scratch = self.take_scratch(sw, sh);
            let origin = Affine::translate((-(bounds.x0 as f64), -(bounds.y0 as f64)));
            let res = self
                .paint_op(&mut scratch.ctx, op, origin * pass.transform, color, text, assets)
                .and_then(|painted| {
                    if !painted {
                        return Ok(());
                    }
                    scratch.render();
                    let at = Placement {
                        origin: (bounds.x0, bounds.y0),
                        cols: (0, bounds.x1 - bounds.x0),
                        rows: (0, bounds.y1 - bounds.y0),
                    };
                    composite_region(
                        dst,
                        u32::from(w),
                        scratch.pixmap.data_as_u8_slice(),
                        u32::from(scratch.pixmap.width()),
                        at,
                        pass.opacity,
                        pass.blend,
                    )
                });
            self.put_scratch(scratch);
            res?;
        }
        Ok(())
    }

    /// Scratch surface of exactly `w × h`, reused when one is cached.
    fn take_scratch(&mut self, w: u16, h: u16) -> Scratch {
        let mut scratch = match self.scratch.iter().position(|s| s.dims() == (w, h)) {
            Some(i) => self.scratch.swap_remove(i),
            None => Scratch::new(w, h),
        };
        scratch.ctx.reset();
        scratch.pixmap.data_as_u8_slice_mut().fill(0);
        scratch
    }

    fn put_scratch(&mut self, scratch: Scratch) {
        if self.scratch.len() >= SCRATCH_SLOTS {
            self.scratch.remove(0);
        }
        self.scratch.push(scratch);
    }

    /// Record one op; `false` when it has nothing to draw.
    fn paint_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        transform: Affine,
        color: vello_cpu::peniko::Color,
        text: &mut TextLayoutEngine,
        assets: &CustomAssets,
    ) -> MoireResult<bool> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Stroke { path, width } => {
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(color);
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(*width)
                        .with_caps(vello_cpu::kurbo::Cap::Butt)
                        .with_join(vello_cpu::kurbo::Join::Miter)
                        .with_miter_limit(MITER_LIMIT),
                );
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawOp::Fill { path } => {
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(color);
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::Text { run, transform: at } => {
                let Some(shaped) = text.shape(run) else {
                    return Ok(false);
                };
                let placed = transform * *at * Affine::translate(shaped.anchor);
                ctx.set_transform(affine_to_cpu(placed));
                ctx.set_paint(color);
                ctx.glyph_run(&shaped.font)
                    .font_size(shaped.font_size)
                    .fill_glyphs(shaped.glyphs.iter().copied());
            }
            DrawOp::Image { slot, rect } => {
                let Some(img) = self.image_paint(*slot, assets)? else {
                    return Ok(false);
                };
                let fit = image_transform(*rect, img.w, img.h);
                ctx.set_transform(affine_to_cpu(transform * fit));
                ctx.set_paint(img.paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(img.w),
                    f64::from(img.h),
                ));
            }
        }
        Ok(true)
    }

    fn image_paint(
        &mut self,
        slot: SlotId,
        assets: &CustomAssets,
    ) -> MoireResult<Option<ImagePaint>> {
        let Some(asset) = assets.ready(slot) else {
            return Ok(None);
        };
        let generation = assets.generation(slot);
        let i = slot.index();
        if let Some(p) = self.images[i].as_ref().filter(|p| p.generation == generation) {
            return Ok(Some(p.clone()));
        }
        let paint = image_paint_from_asset(asset, generation)?;
        self.images[i] = Some(paint.clone());
        Ok(Some(paint))
    }
}

fn image_paint_from_asset(asset: &Arc<LoadedAsset>, generation: u64) -> MoireResult<ImagePaint> {
    let px = &asset.pixels;
    let pixmap = pixmap_from_premul_bytes(&px.rgba8_premul, px.width, px.height)?;
    Ok(ImagePaint {
        generation,
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: px.width,
        h: px.height,
    })
}

/// Map image pixel space `[0, w) × [0, h)` onto `rect`.
fn image_transform(rect: Rect, w: u32, h: u32) -> Affine {
    Affine::translate((rect.x0, rect.y0))
        * Affine::scale_non_uniform(rect.width() / f64::from(w), rect.height() / f64::from(h))
}

fn surface_dims(canvas: Canvas) -> MoireResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| MoireError::validation("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| MoireError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(MoireError::validation("surface must be non-empty"));
    }
    Ok((w, h))
}

fn fill(data: &mut [u8], rgba: [u8; 4]) {
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// `true` when the layer can be drawn in one pass: plain source-over with solid paints.
fn batches(pass: &LayerPass) -> bool {
    pass.blend == BlendMode::Normal
        && !pass
            .draw
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Image { .. }))
}

fn paint_color(c: Rgba8, opacity: f32) -> vello_cpu::peniko::Color {
    let a = (f32::from(c.a) * opacity.clamp(0.0, 1.0)).round() as u8;
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, a)
}

/// Pixels `op` can touch under `transform`, clipped to the surface and `cols`.
///
/// Text has no cheap bound and covers the whole band.
fn op_bounds(
    op: &DrawOp,
    transform: Affine,
    (w, h): (u16, u16),
    (c0, c1): (usize, usize),
) -> Option<PixelBox> {
    let local = match op {
        DrawOp::Stroke { path, width } => {
            let reach = width * 0.5 * MITER_LIMIT;
            Some(path.bounding_box().inflate(reach, reach))
        }
        DrawOp::Fill { path } => Some(path.bounding_box()),
        DrawOp::Image { rect, .. } => Some(*rect),
        DrawOp::Text { .. } => None,
    };

    let mut b = PixelBox {
        x0: c0,
        y0: 0,
        x1: c1.min(usize::from(w)),
        y1: usize::from(h),
    };
    if let Some(r) = local.map(|r| transform.transform_rect_bbox(r)) {
        if r.is_finite() {
            // One pixel of antialiasing on every side.
            let lo = |v: f64, max: usize| (v - 1.0).floor().clamp(0.0, max as f64) as usize;
            let hi = |v: f64, max: usize| (v + 1.0).ceil().clamp(0.0, max as f64) as usize;
            b.x0 = b.x0.max(lo(r.x0, usize::from(w)));
            b.x1 = b.x1.min(hi(r.x1, usize::from(w)));
            b.y0 = lo(r.y0, usize::from(h));
            b.y1 = hi(r.y1, usize::from(h));
        }
    }
    (b.x0 < b.x1 && b.y0 < b.y1).then_some(b)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> MoireResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MoireError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MoireError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(MoireError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
