//! Common types, constants and small numeric helpers.

/// Floating point type used throughout the renderer.
pub type Float = f32;

/// Infinity.
pub const INFINITY: Float = Float::INFINITY;

/// π
pub const PI: Float = std::f32::consts::PI;

/// 2π
pub const TWO_PI: Float = 2.0 * PI;

/// 4π
pub const FOUR_PI: Float = 4.0 * PI;

/// π/2
pub const PI_OVER_TWO: Float = PI / 2.0;

/// π/4
pub const PI_OVER_FOUR: Float = PI / 4.0;

/// 1/π
pub const INV_PI: Float = 1.0 / PI;

/// 1/(2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 1/(4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// 1 - epsilon in the precision selected for `Float`.
pub const ONE_MINUS_EPSILON: Float = hexf::hexf32!("0x1.fffffep-1");

/// Linearly interpolate between two values.
///
/// * `t`  - Interpolation parameter.
/// * `v0` - Value at `t == 0`.
/// * `v1` - Value at `t == 1`.
#[inline]
pub fn lerp(t: Float, v0: Float, v1: Float) -> Float {
    (1.0 - t) * v0 + t * v1
}

/// Clamp a value into `[low, high]`.
///
/// * `v`    - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline]
pub fn clamp(v: Float, low: Float, high: Float) -> Float {
    v.max(low).min(high)
}

/// Binary search over a virtual array of `size` entries. Returns the largest
/// index `i` in `[0, size - 2]` such that `pred(i)` is `true`, assuming `pred`
/// is monotonically `true` then `false`. The clamping makes out-of-range
/// samples land on a valid CDF segment.
///
/// * `size` - Number of entries.
/// * `pred` - The monotonic predicate.
pub fn find_interval<P>(size: usize, pred: P) -> usize
where
    P: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }
    (first.max(1) - 1).min(size.max(2) - 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_interval_brackets_cdf_segments() {
        let cdf = [0.0, 0.25, 0.5, 0.75, 1.0];
        let locate = |u: Float| find_interval(cdf.len(), |i| cdf[i] <= u);
        assert_eq!(locate(0.0), 0);
        assert_eq!(locate(0.3), 1);
        assert_eq!(locate(0.74), 2);
        assert_eq!(locate(0.99), 3);
        // Out of range samples clamp to valid segments.
        assert_eq!(locate(-1.0), 0);
        assert_eq!(locate(2.0), 3);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0, 2.0, 8.0), 2.0);
        assert_eq!(lerp(1.0, 2.0, 8.0), 8.0);
        assert_eq!(lerp(0.5, 2.0, 8.0), 5.0);
    }
}
