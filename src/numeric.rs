//! Small numeric helpers shared by `engine::render` and `annotate`. Both
//! must round letterbox/crop offsets identically or boxes drift by
//! +-1px — this module is the single place that rounding rule lives.

/// Round-half-to-even (banker's rounding), the rounding rule used
/// consistently for letterbox and center-crop offsets.
pub fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

/// True when every coordinate is finite; non-finite arithmetic anywhere
/// in a geometric step fails the variant with `geometry_numerical`.
pub fn finite2(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(-0.5), 0.0);
        assert_eq!(round_half_even(-1.5), -2.0);
    }

    #[test]
    fn non_ties_round_normally() {
        assert_eq!(round_half_even(0.3), 0.0);
        assert_eq!(round_half_even(0.7), 1.0);
        assert_eq!(round_half_even(-0.3), -0.0);
    }
}
