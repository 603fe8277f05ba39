/// Linear interpolation between `a` (at `t = 0`) and `b` (at `t = 1`).
#[inline(always)]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    (1.0 - t) * a + t * b
}
