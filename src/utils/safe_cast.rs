//! Safe float-to-integer conversions for score arithmetic

use crate::{Error, Result};

/// Floor an f64 into an i64 with range checking
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i64 range
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f64_floor_to_i64(value: f64) -> Result<i64> {
    let floored = value.floor();
    if floored.is_finite() && floored >= i64::MIN as f64 && floored < i64::MAX as f64 {
        Ok(floored as i64)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i64"
        )))
    }
}

/// Floor an f64 into an i64, saturating at the bounds and mapping NaN to zero
#[must_use]
pub fn f64_floor_to_i64_saturating(value: f64) -> i64 {
    f64_floor_to_i64(value).unwrap_or(if value.is_nan() {
        0
    } else if value > 0.0 {
        i64::MAX
    } else {
        i64::MIN
    })
}

/// Convert a u64 tick count into f64 seconds at a given rate
#[must_use]
#[allow(clippy::cast_precision_loss)] // tick counts stay far below 2^53
pub fn ticks_to_seconds(ticks: u64, tick_rate: u32) -> f64 {
    ticks as f64 / f64::from(tick_rate.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_f64_floor_to_i64() {
        assert_eq!(f64_floor_to_i64(0.099).unwrap(), 0);
        assert_eq!(f64_floor_to_i64(1.0).unwrap(), 1);
        assert_eq!(f64_floor_to_i64(-0.5).unwrap(), -1);

        assert!(f64_floor_to_i64(f64::INFINITY).is_err());
        assert!(f64_floor_to_i64(f64::NEG_INFINITY).is_err());
        assert!(f64_floor_to_i64(f64::NAN).is_err());
        assert!(f64_floor_to_i64(1e30).is_err());
    }

    #[test]
    fn test_saturating() {
        assert_eq!(f64_floor_to_i64_saturating(f64::NAN), 0);
        assert_eq!(f64_floor_to_i64_saturating(f64::INFINITY), i64::MAX);
        assert_eq!(f64_floor_to_i64_saturating(f64::NEG_INFINITY), i64::MIN);
        assert_eq!(f64_floor_to_i64_saturating(0.1), 0);
    }

    #[test]
    fn test_ticks_to_seconds() {
        assert_eq!(ticks_to_seconds(120, 60), 2.0);
        assert_eq!(ticks_to_seconds(5, 0), 5.0);
    }

    proptest! {
        #[test]
        fn prop_saturating_matches_checked(value in -1e12f64..1e12f64) {
            prop_assert_eq!(f64_floor_to_i64(value).unwrap(), f64_floor_to_i64_saturating(value));
        }

        #[test]
        fn prop_floor_never_exceeds_value(value in -1e9f64..1e9f64) {
            let floored = f64_floor_to_i64_saturating(value);
            prop_assert!(floored as f64 <= value);
            prop_assert!(value - (floored as f64) < 1.0);
        }
    }
}
