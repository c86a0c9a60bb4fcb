use crate::foundation::error::{MoireError, MoireResult};
use crate::foundation::math::mul_div255_u8;
use crate::settings::model::BlendMode;

/// Where a source block lands in the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Destination pixel of source pixel `(0, 0)`.
    pub origin: (usize, usize),
    /// Source columns `[c0, c1)`.
    pub cols: (usize, usize),
    /// Source rows `[r0, r1)`.
    pub rows: (usize, usize),
}

/// Composite a premultiplied layer onto `dst`, touching only pixel columns `[c0, c1)`.
///
/// `opacity` scales the whole layer; `blend` picks the operator. Both buffers are RGBA8
/// premultiplied and `width` pixels wide.
pub(crate) fn composite_layer(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    cols: (usize, usize),
    opacity: f32,
    blend: BlendMode,
) -> MoireResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MoireError::render(
            "composite_layer expects equal-length rgba8 buffers",
        ));
    }
    let w = width as usize;
    let rows = if w == 0 { 0 } else { dst.len() / (w * 4) };
    let at = Placement {
        origin: (0, 0),
        cols,
        rows: (0, rows),
    };
    composite_region(dst, width, src, width, at, opacity, blend)
}

/// Composite a block of `src` onto `dst` at `at`.
///
/// The block is clamped to both buffers. Widths are in pixels; both buffers are RGBA8
/// premultiplied.
pub(crate) fn composite_region(
    dst: &mut [u8],
    dst_width: u32,
    src: &[u8],
    src_width: u32,
    at: Placement,
    opacity: f32,
    blend: BlendMode,
) -> MoireResult<()> {
    if !dst.len().is_multiple_of(4) || !src.len().is_multiple_of(4) {
        return Err(MoireError::render("composite expects rgba8 buffers"));
    }
    let (dw, sw) = (dst_width as usize, src_width as usize);
    if dw == 0 || sw == 0 || opacity <= 0.0 {
        return Ok(());
    }
    let (dh, sh) = (dst.len() / (dw * 4), src.len() / (sw * 4));
    let (ox, oy) = at.origin;
    let (c0, r0) = (at.cols.0, at.rows.0);
    let c1 = at.cols.1.min(sw).min(dw.saturating_sub(ox));
    let r1 = at.rows.1.min(sh).min(dh.saturating_sub(oy));
    if c0 >= c1 || r0 >= r1 {
        return Ok(());
    }

    let rows = dst
        .chunks_exact_mut(dw * 4)
        .skip(oy + r0)
        .zip(src.chunks_exact(sw * 4).skip(r0))
        .take(r1 - r0)
        .map(|(d, s)| (&mut d[(ox + c0) * 4..(ox + c1) * 4], &s[c0 * 4..c1 * 4]));

    // Dispatch once per block; each branch monomorphizes its own kernel.
    match blend {
        BlendMode::Normal => rows.for_each(|(d, s)| premul_over_opacity(d, s, opacity)),
        BlendMode::Multiply => rows.for_each(|(d, s)| blend_over(d, s, opacity, |s, d| s * d)),
        BlendMode::Screen => {
            rows.for_each(|(d, s)| blend_over(d, s, opacity, |s, d| s + d - s * d))
        }
        BlendMode::Overlay => rows.for_each(|(d, s)| {
            blend_over(d, s, opacity, |s, d| {
                if d <= 0.5 {
                    2.0 * s * d
                } else {
                    1.0 - 2.0 * (1.0 - s) * (1.0 - d)
                }
            })
        }),
        BlendMode::Difference => {
            rows.for_each(|(d, s)| blend_over(d, s, opacity, |s, d| (d - s).abs()))
        }
        BlendMode::Exclusion => {
            rows.for_each(|(d, s)| blend_over(d, s, opacity, |s, d| d + s - 2.0 * d * s))
        }
        BlendMode::Xor => rows.for_each(|(d, s)| xor(d, s, opacity)),
    }
    Ok(())
}

/// Source-over with a layer opacity, in 8-bit fixed point.
fn premul_over_opacity(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = sa.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = sc.saturating_add(dc);
        }
    }
}

/// Separable blend over the backdrop:
///
/// ```text
/// out_a = sa + da·(1 − sa)
/// out_p = sp·(1 − da) + dp·(1 − sa) + B(sc, dc)·sa·da
/// ```
#[inline(always)]
fn blend_over<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = (f32::from(s[3]) / 255.0) * opacity;
        if sa <= 0.0 {
            continue;
        }
        let da = f32::from(d[3]) / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = (f32::from(s[c]) / 255.0) * opacity;
            let dp = f32::from(d[c]) / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out_p * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }
}

/// Porter-Duff xor: each side survives only where the other is absent.
fn xor(dst: &mut [u8], src: &[u8], opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = (f32::from(s[3]) / 255.0) * opacity;
        if sa <= 0.0 {
            continue;
        }
        let da = f32::from(d[3]) / 255.0;
        for c in 0..4 {
            let sp = (f32::from(s[c]) / 255.0) * opacity;
            let dp = f32::from(d[c]) / 255.0;
            let out = (sp * (1.0 - da) + dp * (1.0 - sa)).clamp(0.0, 1.0);
            d[c] = (out * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
