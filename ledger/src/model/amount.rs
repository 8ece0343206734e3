//! Major-unit to minor-unit amount conversion.
//!
//! Callers speak in major units (`50.00` naira) because that's what humans
//! and payment gateways send. The ledger stores minor units (`5000` kobo)
//! because integer arithmetic doesn't lie. The conversion rounds to the
//! nearest minor unit so that a binary-float `49.999999999999` meant to be
//! exactly `50.00` lands on `5000`, not `4999`.

use crate::config::{MAX_AMOUNT_MINOR, MINOR_UNITS_PER_MAJOR};

/// Reasons an amount fails conversion to minor units.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmountError {
    /// NaN or infinity. Nothing meaningful can be done with it.
    #[error("amount is not a finite number")]
    NotFinite,

    /// Zero or negative input, or an input so small it rounds to zero
    /// minor units (e.g. 0.004).
    #[error("amount must be positive, got {amount}")]
    NotPositive {
        /// The rejected major-unit input.
        amount: f64,
    },

    /// Larger than [`MAX_AMOUNT_MINOR`] after conversion. Beyond that cap
    /// an `f64` can no longer represent every minor unit exactly, so we
    /// refuse rather than silently round to the nearest representable value.
    #[error("amount {amount} exceeds the maximum transactable value")]
    TooLarge {
        /// The rejected major-unit input.
        amount: f64,
    },
}

/// Converts a major-unit amount to minor units, rounding to the nearest
/// integer.
///
/// # Errors
///
/// Returns [`AmountError::NotFinite`] for NaN/infinity,
/// [`AmountError::NotPositive`] for inputs ≤ 0 or inputs that round to
/// zero, and [`AmountError::TooLarge`] past the transactable cap.
pub fn to_minor_units(major: f64) -> Result<i64, AmountError> {
    if !major.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if major <= 0.0 {
        return Err(AmountError::NotPositive { amount: major });
    }

    let minor = (major * MINOR_UNITS_PER_MAJOR as f64).round();
    if minor > MAX_AMOUNT_MINOR as f64 {
        return Err(AmountError::TooLarge { amount: major });
    }
    if minor < 1.0 {
        // Positive input that rounds to zero kobo is still a zero-value
        // operation, and zero-value operations are rejected.
        return Err(AmountError::NotPositive { amount: major });
    }

    Ok(minor as i64)
}

/// Converts minor units back to major units for display.
///
/// Display only — the result never flows back into arithmetic.
pub fn to_major_units(minor: i64) -> f64 {
    minor as f64 / MINOR_UNITS_PER_MAJOR as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_amount_converts() {
        assert_eq!(to_minor_units(50.0).unwrap(), 5000);
        assert_eq!(to_minor_units(0.01).unwrap(), 1);
        assert_eq!(to_minor_units(1234.56).unwrap(), 123_456);
    }

    #[test]
    fn float_noise_rounds_away() {
        // The classic: a gateway sends 49.999999999999 meaning 50.00.
        assert_eq!(to_minor_units(49.999_999_999_999).unwrap(), 5000);
        assert_eq!(to_minor_units(50.000_000_1).unwrap(), 5000);
    }

    #[test]
    fn half_kobo_rounds_to_nearest() {
        assert_eq!(to_minor_units(0.015).unwrap(), 2);
        assert_eq!(to_minor_units(10.004).unwrap(), 1000);
        assert_eq!(to_minor_units(10.006).unwrap(), 1001);
    }

    #[test]
    fn zero_and_negative_rejected() {
        assert!(matches!(
            to_minor_units(0.0),
            Err(AmountError::NotPositive { .. })
        ));
        assert!(matches!(
            to_minor_units(-50.0),
            Err(AmountError::NotPositive { .. })
        ));
    }

    #[test]
    fn sub_minor_unit_rejected() {
        // 0.004 naira is 0.4 kobo, which rounds to zero — a no-op deposit.
        assert!(matches!(
            to_minor_units(0.004),
            Err(AmountError::NotPositive { .. })
        ));
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(to_minor_units(f64::NAN), Err(AmountError::NotFinite));
        assert_eq!(to_minor_units(f64::INFINITY), Err(AmountError::NotFinite));
        assert_eq!(
            to_minor_units(f64::NEG_INFINITY),
            Err(AmountError::NotFinite)
        );
    }

    #[test]
    fn oversized_rejected() {
        assert!(matches!(
            to_minor_units(1e18),
            Err(AmountError::TooLarge { .. })
        ));
    }

    #[test]
    fn cap_itself_is_accepted() {
        let major = MAX_AMOUNT_MINOR as f64 / MINOR_UNITS_PER_MAJOR as f64;
        assert_eq!(to_minor_units(major).unwrap(), MAX_AMOUNT_MINOR);
    }

    #[test]
    fn display_conversion() {
        assert_eq!(to_major_units(5000), 50.0);
        assert_eq!(to_major_units(1), 0.01);
        assert_eq!(to_major_units(0), 0.0);
        assert_eq!(to_major_units(-3000), -30.0);
    }
}
