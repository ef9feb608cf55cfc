use nalgebra::Vector2;

/// Double dog-leg hypotenuse approximation.
///
/// Piecewise linear in `|a|` and `|b|`, so it never takes a square root. Off
/// the axes it is within about one percent of the true norm; on them it is exact.
/// The whole kernel uses this instead of [`f64::hypot`], trajectories depend
/// on it.
pub fn hypot(a: f64, b: f64) -> f64 {
    let a = a.abs();
    let b = b.abs();
    let lo = a.min(b);
    let hi = a.max(b);
    hi + ((3.0 * lo) / 32.0)
        + (0.0f64.max((2.0 * lo) - hi) / 8.0)
        + (0.0f64.max((4.0 * lo) - hi) / 16.0)
}

pub fn length(v: &Vector2<f64>) -> f64 {
    hypot(v.x, v.y)
}

pub fn length_squared(v: &Vector2<f64>) -> f64 {
    (v.x * v.x) + (v.y * v.y)
}

/// Zero for NaN and infinities, so a zero-length normalisation adds nothing.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_four() {
        assert_eq!(hypot(3.0, 4.0), 5.03125);
    }

    #[test]
    fn test_sign_and_order_symmetry() {
        for &(a, b) in &[(3.0, 4.0), (0.5, 12.25), (7.0, 7.0), (1e-3, 9.0)] {
            let expected = hypot(a, b);
            assert_eq!(hypot(-a, b), expected);
            assert_eq!(hypot(a, -b), expected);
            assert_eq!(hypot(-a, -b), expected);
            assert_eq!(hypot(b, a), expected);
        }
    }

    #[test]
    fn test_exact_on_axes() {
        assert_eq!(hypot(0.0, 17.5), 17.5);
        assert_eq!(hypot(-4.0, 0.0), 4.0);
        assert_eq!(hypot(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_close_to_true_norm() {
        // dog-leg stays within a few percent of the real thing
        for &(a, b) in &[(1.0, 1.0), (1.0, 2.0), (5.0, 1.0), (3.0, 4.0)] {
            let exact = f64::hypot(a, b);
            let approx = hypot(a, b);
            assert!(((approx - exact) / exact).abs() < 0.03, "{a} {b}: {approx} vs {exact}");
        }
    }

    #[test]
    fn test_homogeneous() {
        let base = hypot(3.0, 4.0);
        assert_eq!(hypot(6.0, 8.0), base * 2.0);
        assert_eq!(hypot(0.75, 1.0), base / 4.0);
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
        assert_eq!(finite_or_zero(-1.5), -1.5);
    }

    #[test]
    fn test_length_helpers() {
        let v = Vector2::new(-3.0, 4.0);
        assert_eq!(length(&v), 5.03125);
        assert_eq!(length_squared(&v), 25.0);
    }
}
