//! Signed fixed-point numbers for the escape-time inner loop.
//!
//! A [`Fixed`] is an `i32` scaled by `2^FRAC_BITS`. The number of fractional
//! bits is chosen at build time (features `fixed-26` / `fixed-27`, default 28),
//! trading range for precision: the representable range is
//! `[-2^(31 - FRAC_BITS), 2^(31 - FRAC_BITS))`.
//!
//! Arithmetic saturates at the ends of the range instead of wrapping. Anything
//! that saturates is far outside the escape radius, so the escape test still
//! classifies it correctly.

use std::fmt;
use std::ops::{Add, Neg, Sub};

#[cfg(feature = "fixed-26")]
pub const FRAC_BITS: u32 = 26;

#[cfg(all(feature = "fixed-27", not(feature = "fixed-26")))]
pub const FRAC_BITS: u32 = 27;

#[cfg(not(any(feature = "fixed-26", feature = "fixed-27")))]
pub const FRAC_BITS: u32 = 28;

const ONE_RAW: i32 = 1 << FRAC_BITS;
const SCALE: f64 = ONE_RAW as f64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW);
    pub const MIN: Self = Self(i32::MIN);
    pub const MAX: Self = Self(i32::MAX);

    /// Value of one unit in the last place.
    pub const ULP: f64 = 1.0 / SCALE;

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[must_use]
    pub fn from_int(n: i32) -> Self {
        match n.checked_mul(ONE_RAW) {
            Some(raw) => Self(raw),
            None if n < 0 => Self::MIN,
            None => Self::MAX,
        }
    }

    /// Truncates toward zero; values outside the range saturate and NaN maps to zero.
    #[must_use]
    pub fn from_f64(x: f64) -> Self {
        Self((x * SCALE) as i32)
    }

    #[must_use]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / SCALE
    }

    /// Largest magnitude representable, as a float.
    #[must_use]
    pub fn range_limit() -> f64 {
        f64::from(1u32 << (31 - FRAC_BITS))
    }

    #[must_use]
    #[inline]
    pub fn mul(self, other: Self) -> Self {
        let product = i64::from(self.0) * i64::from(other.0);
        Self(saturate(product >> FRAC_BITS))
    }

    #[must_use]
    #[inline]
    pub fn square(self) -> Self {
        let value = i64::from(self.0);
        Self(saturate((value * value) >> FRAC_BITS))
    }

    #[must_use]
    #[inline]
    pub fn mul_int(self, n: i32) -> Self {
        Self(self.0.saturating_mul(n))
    }

    #[must_use]
    #[inline]
    pub fn div_int(self, n: i32) -> Self {
        Self(self.0 / n)
    }

    #[must_use]
    #[inline]
    pub fn double(self) -> Self {
        Self(self.0.saturating_mul(2))
    }

    #[must_use]
    #[inline]
    pub fn abs_diff(self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }
}

#[inline]
fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Add for Fixed {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sub for Fixed {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Neg for Fixed {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
