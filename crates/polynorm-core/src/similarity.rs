//! Angular comparison of normalized coordinate buffers
//!
//! Two buffers are treated as vectors of complex numbers `x + iy`. The
//! distance is the argument of their Hermitian inner product: 0 for
//! identical shapes, `|θ|` for a copy rotated by `θ`, and growing as the
//! shapes diverge. Both buffers are expected to be centered, which the
//! normalizer guarantees.

use std::f64::consts::FRAC_PI_2;

use crate::{Error, Result};

/// Angular distance in `[0, π]` between two `x, y` buffers.
///
/// With `a = Σ (x1·x2 + y1·y2)` and `b = Σ (x1·y2 − y1·x2)` this is
/// `acos(a / √(a² + b²))`; a zero dot product gives `π / 2`.
///
/// # Errors
/// `InvalidInput` when the buffers differ in length or have odd length.
pub fn cos_distance(lhs: &[f64], rhs: &[f64]) -> Result<f64> {
    if lhs.len() != rhs.len() || lhs.len() % 2 != 0 {
        return Err(Error::InvalidInput(format!(
            "coordinate buffers must have equal even length, got {} and {}",
            lhs.len(),
            rhs.len()
        )));
    }

    let (mut dot, mut cross) = (0.0, 0.0);
    for (p, q) in lhs.chunks_exact(2).zip(rhs.chunks_exact(2)) {
        dot += p[0] * q[0] + p[1] * q[1];
        cross += p[0] * q[1] - p[1] * q[0];
    }

    if dot == 0.0 {
        return Ok(FRAC_PI_2);
    }

    let cosine = dot / (dot * dot + cross * cross).sqrt();
    Ok(cosine.clamp(-1.0, 1.0).acos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::normalizer::{normalize, NormalizeConfig};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn rotate(buffer: &[f64], angle: f64) -> Vec<f64> {
        let (s, c) = angle.sin_cos();
        buffer
            .chunks_exact(2)
            .flat_map(|p| [p[0] * c - p[1] * s, p[0] * s + p[1] * c])
            .collect()
    }

    #[test]
    fn test_identical_is_zero() {
        let a = [3.0, -250.0, 1.0, -245.0, 0.0, -241.0];
        assert_abs_diff_eq!(cos_distance(&a, &a).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotated_copy_measures_angle() {
        let a = [10.0, 0.0, 0.0, 5.0, -3.0, -3.0, 7.0, 1.0];
        assert_abs_diff_eq!(cos_distance(&a, &rotate(&a, 1.1)).unwrap(), 1.1, epsilon = 1e-9);
        assert_abs_diff_eq!(cos_distance(&a, &rotate(&a, -0.4)).unwrap(), 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_symmetric() {
        let a = [4.0, 1.0, -2.0, 3.0, 0.0, -5.0];
        let b = [3.0, 3.0, -1.0, 2.0, 1.0, -4.0];
        assert_abs_diff_eq!(
            cos_distance(&a, &b).unwrap(),
            cos_distance(&b, &a).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_negated_is_pi() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [-1.0, -2.0, -3.0, -4.0];
        assert_abs_diff_eq!(cos_distance(&a, &b).unwrap(), PI, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_dot_is_right_angle() {
        assert_eq!(cos_distance(&[0.0, 0.0], &[5.0, 5.0]).unwrap(), FRAC_PI_2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(matches!(
            cos_distance(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]),
            Err(Error::InvalidInput(_))
        ));
        assert!(cos_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_normalized_shapes_compare() {
        let config = NormalizeConfig {
            points: 20,
            ..NormalizeConfig::default()
        }
        .with_seed(1);
        let line = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 6.0),
            Point::new(9.0, 7.0),
            Point::new(12.0, 1.0),
        ];
        let scaled: Vec<Point> = line.iter().map(|p| Point::new(p.x * 2.0 + 3.0, p.y * 2.0)).collect();
        let a = normalize(&line, &config).unwrap();
        let b = normalize(&scaled, &config).unwrap();
        let as_f64 = |coords: &[i64]| coords.iter().map(|&c| c as f64).collect::<Vec<f64>>();
        assert!(cos_distance(&as_f64(a.coords()), &as_f64(b.coords())).unwrap() < 0.01);
    }
}
