use crate::foundation::error::{MoireError, MoireResult};

const MAX_DIM: u32 = 8_192;

/// Raster size for an SVG drawn at `scale` times its intrinsic size.
///
/// Scales above what fits [`MAX_DIM`] are clamped so a tiny viewBox never explodes into a huge
/// allocation.
pub fn svg_raster_params(tree: &usvg::Tree, scale: f64) -> MoireResult<(u32, u32)> {
    fn to_px(v: f32) -> MoireResult<f64> {
        if !v.is_finite() || v <= 0.0 {
            return Err(MoireError::asset("svg has invalid width/height"));
        }
        Ok(f64::from(v))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let fit = f64::from(MAX_DIM) / base_w.max(base_h);
    let s = if scale.is_finite() && scale > 0.0 {
        scale.min(fit)
    } else {
        1.0f64.min(fit)
    };

    let w = (base_w * s).ceil().clamp(1.0, f64::from(MAX_DIM)) as u32;
    let h = (base_h * s).ceil().clamp(1.0, f64::from(MAX_DIM)) as u32;
    Ok((w, h))
}

/// Render `tree` stretched over a `width × height` premultiplied RGBA8 buffer.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> MoireResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MoireError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
