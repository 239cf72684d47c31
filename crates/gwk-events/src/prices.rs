//! Integer-micros price representation at the ingestion boundary.
//!
//! # Design invariant
//!
//! Every price held in internal state (book levels, fill accumulation,
//! position averages) is an `i64` in integer micros (1 unit = 1_000_000
//! micros). Two depth levels that compare equal as `f64` but differ at the
//! 7th decimal place stay distinguishable as `i64`.
//!
//! `f64` appears only on the wire structs in this crate; conversion happens
//! exactly once, when the dispatcher ingests a callback:
//!
//! | Direction              | Function            |
//! |------------------------|---------------------|
//! | gateway → internal     | [`price_to_micros`] |
//! | internal → reporting   | [`micros_to_price`] |

/// Scale factor: 1 price unit = 1_000_000 micros (6 decimal places).
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Errors returned by [`price_to_micros`] when a wire price is not
/// representable. Both variants fire in all build profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// `NaN` or infinite — a broken upstream value that must not reach
    /// internal state.
    NotFinite,
    /// Would overflow `i64` after scaling by [`MICROS_PER_UNIT`].
    OutOfRange,
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::NotFinite => {
                write!(f, "price_to_micros: non-finite input (NaN or Inf)")
            }
            PricingError::OutOfRange => {
                write!(f, "price_to_micros: price out of i64 range after scaling")
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Convert integer micros back to `f64` for report formatting only.
pub fn micros_to_price(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_UNIT as f64
}

/// Convert an `f64` price received from the gateway into integer micros,
/// rounding to the nearest micro.
///
/// # Errors
/// [`PricingError::NotFinite`] for `NaN`/`Inf`; [`PricingError::OutOfRange`]
/// when the scaled value would overflow `i64`.
pub fn price_to_micros(price: f64) -> Result<i64, PricingError> {
    if !price.is_finite() {
        return Err(PricingError::NotFinite);
    }
    let scaled = price * MICROS_PER_UNIT as f64;
    // Rust f64→i64 casts saturate; reject explicitly instead.
    if scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
        return Err(PricingError::OutOfRange);
    }
    Ok(scaled.round() as i64)
}
