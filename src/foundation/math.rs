pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Modulo that is always in `[0, m)` for positive `m`, including for negative `v`.
///
/// Returns `0.0` for a zero, negative or non-finite modulus.
pub(crate) fn wrap(v: f64, m: f64) -> f64 {
    if !(m.is_finite() && m > 0.0) || !v.is_finite() {
        return 0.0;
    }
    v.rem_euclid(m)
}

/// A loop step usable in `while x < end { x += step }` loops.
pub(crate) fn usable_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
