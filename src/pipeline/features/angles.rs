//! Joint angle calculation using the dot product
//!
//! The angle at joint `b` is measured between the vectors b→a and b→c.

/// Returns the angle at `b` in degrees, in `[0, 180]`.
///
/// Degenerate input (a or c on top of b) gives 0.
pub fn joint_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 < 1e-9 || mag2 < 1e-9 {
        return 0.0;
    }

    let cos_angle = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}
