//! Angle helpers

/// Map a sensor angle in `[0, 360)` to the signed range `(-180, 180]`.
///
/// This is a single wrap, not a modulo reduction: the sensor only emits
/// values in `[0, 360)`, so anything at or above 180 has 360 subtracted once
/// and everything else is passed through unchanged. An input of 540 gives
/// 180, an input of -10 stays -10.
pub fn normalize(angle: f64) -> f64 {
    if angle >= 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_low_half_unchanged() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(10.0), 10.0);
        assert_eq!(normalize(179.99), 179.99);
    }

    #[test]
    fn test_normalize_high_half_wraps() {
        assert_eq!(normalize(180.0), -180.0);
        assert_eq!(normalize(350.0), -10.0);
        assert_eq!(normalize(270.0), -90.0);
    }

    #[test]
    fn test_normalize_stays_in_signed_range() {
        // Sweep [0, 360) in quarter degrees
        for i in 0..1440 {
            let angle = i as f64 * 0.25;
            let n = normalize(angle);
            assert!(n >= -180.0 && n < 180.0, "{} -> {}", angle, n);
            assert_eq!((n + 360.0) % 360.0, angle);
        }
    }

    #[test]
    fn test_normalize_single_wrap_only() {
        assert_eq!(normalize(540.0), 180.0);
        assert_eq!(normalize(-10.0), -10.0);
        assert_eq!(normalize(-400.0), -400.0);
    }
}
