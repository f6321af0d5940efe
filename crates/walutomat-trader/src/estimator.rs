//! Volume-weighted price estimation over an order book side

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;
use walutomat_types::Offer;

/// Volume a book side could not supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingVolume(pub Decimal);

impl MissingVolume {
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Lossy view for logs and metrics
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for MissingVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estimation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// Target volume is zero or negative
    #[error("Target volume must be positive, got {0}")]
    InvalidVolume(Decimal),

    /// The offers do not add up to the target volume
    #[error("Insufficient volume: missing {0}")]
    InsufficientVolume(MissingVolume),

    /// Notional of the walked levels exceeds the decimal range
    #[error("Notional overflow while averaging offers")]
    Overflow,
}

/// Average price paid to fill `target` by walking `offers` in order
///
/// Offers are consumed exactly as given, so callers pass a side that is
/// already sorted best first. Each offer contributes `min(volume, remaining)`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use walutomat_trader::price_by_volume;
/// use walutomat_types::Offer;
///
/// let asks = [Offer::new(dec!(10), dec!(100)), Offer::new(dec!(20), dec!(150))];
/// assert_eq!(price_by_volume(&asks, dec!(200)).unwrap(), dec!(15));
/// ```
pub fn price_by_volume(offers: &[Offer], target: Decimal) -> Result<Decimal, EstimateError> {
    if target <= Decimal::ZERO {
        return Err(EstimateError::InvalidVolume(target));
    }

    let mut filled = Decimal::ZERO;
    let mut notional = Decimal::ZERO;

    for offer in offers {
        let remaining = target - filled;
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = offer.volume.min(remaining);
        if take <= Decimal::ZERO {
            continue;
        }
        filled += take;
        notional = take
            .checked_mul(offer.price)
            .and_then(|level| notional.checked_add(level))
            .ok_or(EstimateError::Overflow)?;
    }

    let missing = target - filled;
    if missing > Decimal::ZERO {
        return Err(EstimateError::InsufficientVolume(MissingVolume(missing)));
    }

    notional.checked_div(filled).ok_or(EstimateError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ladder() -> Vec<Offer> {
        vec![
            Offer::new(dec!(10), dec!(100)),
            Offer::new(dec!(20), dec!(150)),
            Offer::new(dec!(10), dec!(200)),
        ]
    }

    #[test]
    fn test_weighted_average() {
        assert_eq!(price_by_volume(&ladder(), dec!(200)).unwrap(), dec!(15));
    }

    #[test]
    fn test_single_offer_partial() {
        assert_eq!(price_by_volume(&ladder(), dec!(40)).unwrap(), dec!(10));
    }

    #[test]
    fn test_exact_depth() {
        // 100*10 + 150*20 + 200*10 = 6000 over 450
        let price = price_by_volume(&ladder(), dec!(450)).unwrap();
        assert_eq!(price, dec!(6000) / dec!(450));
    }

    #[test]
    fn test_insufficient_volume() {
        let err = price_by_volume(&ladder(), dec!(500)).unwrap_err();
        assert_eq!(err, EstimateError::InsufficientVolume(MissingVolume(dec!(50))));
        if let EstimateError::InsufficientVolume(missing) = err {
            assert_eq!(missing.as_f64(), 50.0);
        }
    }

    #[test]
    fn test_offers_are_not_resorted() {
        let offers = vec![Offer::new(dec!(20), dec!(100)), Offer::new(dec!(10), dec!(100))];
        assert_eq!(price_by_volume(&offers, dec!(100)).unwrap(), dec!(20));
    }

    #[test]
    fn test_zero_volume_offers_ignored() {
        let offers = vec![
            Offer::new(dec!(99), dec!(0)),
            Offer::new(dec!(10), dec!(100)),
        ];
        assert_eq!(price_by_volume(&offers, dec!(50)).unwrap(), dec!(10));
    }

    #[test]
    fn test_non_positive_target_rejected() {
        assert_eq!(
            price_by_volume(&ladder(), Decimal::ZERO),
            Err(EstimateError::InvalidVolume(Decimal::ZERO))
        );
        assert!(matches!(
            price_by_volume(&ladder(), dec!(-1)),
            Err(EstimateError::InvalidVolume(_))
        ));
    }

    #[test]
    fn test_notional_overflow_is_an_error() {
        let offers = [Offer::new(dec!(1e10), dec!(1e20))];
        assert_eq!(
            price_by_volume(&offers, dec!(1e20)),
            Err(EstimateError::Overflow)
        );
    }

    #[test]
    fn test_empty_side() {
        let err = price_by_volume(&[], dec!(5)).unwrap_err();
        assert_eq!(err, EstimateError::InsufficientVolume(MissingVolume(dec!(5))));
    }
}
