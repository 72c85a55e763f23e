//! Pearson correlation and its significance test.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Check whether every value equals the first one.
///
/// Constant columns are detected by value, not by a variance threshold, so a
/// column of identical floats is always caught even when its computed mean
/// carries rounding error.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&v| v == first),
        None => true,
    }
}

/// Pearson correlation coefficient.
///
/// Returns `None` if the inputs differ in length or either input is
/// constant. The result is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || is_constant(x) || is_constant(y) {
        return None;
    }
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        num += dx * dy;
        sx += dx * dx;
        sy += dy * dy;
    }
    let den = (sx * sy).sqrt();
    if den == 0.0 {
        return None;
    }
    Some((num / den).clamp(-1.0, 1.0))
}

/// Two-sided p-value for a correlation coefficient over `n` observations.
///
/// Uses `t = r * sqrt((n - 2) / (1 - r^2))` against a Student t distribution
/// with `n - 2` degrees of freedom. A perfect correlation has p = 0; fewer
/// than three observations carry no evidence and give p = 1.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let r_abs = r.abs();
    if r_abs >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r_abs * (df / (1.0 - r_abs * r_abs)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t)).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);

        let neg = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson(&x, &neg).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_known_value() {
        // r = 0.8 for this pair (hand-computed)
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_is_undefined() {
        let x = [1.0, 2.0, 3.0];
        let c = [0.1, 0.1, 0.1];
        assert!(pearson(&x, &c).is_none());
        assert!(pearson(&c, &x).is_none());
        assert!(pearson(&x, &[1.0, 2.0]).is_none());
        assert!(is_constant(&[]));
    }

    #[test]
    fn test_p_value() {
        assert_eq!(correlation_p_value(1.0, 10), 0.0);
        assert_eq!(correlation_p_value(0.5, 2), 1.0);
        assert_relative_eq!(correlation_p_value(0.0, 10), 1.0, epsilon = 1e-12);

        // r = 0.8, n = 5: t = 0.8 * sqrt(3 / 0.36) = 2.3094, two-sided p ~ 0.1041
        let p = correlation_p_value(0.8, 5);
        assert!((p - 0.1041).abs() < 1e-3, "p = {}", p);

        // symmetric in sign
        assert_relative_eq!(
            correlation_p_value(-0.8, 5),
            correlation_p_value(0.8, 5),
            epsilon = 1e-15
        );
    }
}
