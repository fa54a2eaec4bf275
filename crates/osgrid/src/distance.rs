//! Whole-metre distances.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Sub, SubAssign};

/// A signed distance in whole metres.
///
/// All grid arithmetic is exact; there is no sub-metre precision anywhere in
/// the grid system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distance(i64);

impl Distance {
    /// Zero metres.
    pub const ZERO: Distance = Distance(0);
    /// One metre.
    pub const METRE: Distance = Distance(1);
    /// One kilometre.
    pub const KILOMETRE: Distance = Distance(1000);

    /// A distance of `m` metres.
    pub const fn metres(m: i64) -> Self {
        Distance(m)
    }

    /// A distance of `km` kilometres.
    pub const fn kilometres(km: i64) -> Self {
        Distance(km * 1000)
    }

    /// The distance in metres.
    pub const fn as_metres(self) -> i64 {
        self.0
    }

    /// Absolute value.
    pub const fn abs(self) -> Self {
        Distance(self.0.abs())
    }

    /// `self * rhs`, or `None` on overflow.
    pub const fn checked_mul(self, rhs: i64) -> Option<Self> {
        match self.0.checked_mul(rhs) {
            Some(m) => Some(Distance(m)),
            None => None,
        }
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether this distance is a whole multiple of `unit`.
    ///
    /// Nothing is a multiple of zero, except zero itself.
    pub const fn is_multiple_of(self, unit: Distance) -> bool {
        if unit.0 == 0 {
            self.0 == 0
        } else {
            self.0 % unit.0 == 0
        }
    }

    /// Round down to the nearest multiple of `unit` (towards negative infinity).
    ///
    /// A zero `unit` is treated as one metre.
    pub fn floor_to(self, unit: Distance) -> Self {
        let unit = unit.0.abs().max(1);
        Distance(self.0.div_euclid(unit) * unit)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        Distance(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Distance) {
        self.0 += rhs.0;
    }
}

impl Sub for Distance {
    type Output = Distance;

    fn sub(self, rhs: Distance) -> Distance {
        Distance(self.0 - rhs.0)
    }
}

impl SubAssign for Distance {
    fn sub_assign(&mut self, rhs: Distance) {
        self.0 -= rhs.0;
    }
}

impl Neg for Distance {
    type Output = Distance;

    fn neg(self) -> Distance {
        Distance(-self.0)
    }
}

impl Mul<i64> for Distance {
    type Output = Distance;

    fn mul(self, rhs: i64) -> Distance {
        Distance(self.0 * rhs)
    }
}

impl Mul<Distance> for i64 {
    type Output = Distance;

    fn mul(self, rhs: Distance) -> Distance {
        Distance(self * rhs.0)
    }
}

impl Div<i64> for Distance {
    type Output = Distance;

    fn div(self, rhs: i64) -> Distance {
        Distance(self.0 / rhs)
    }
}

/// How many whole `rhs` fit in `self` (truncating).
impl Div<Distance> for Distance {
    type Output = i64;

    fn div(self, rhs: Distance) -> i64 {
        self.0 / rhs.0
    }
}

impl Rem<Distance> for Distance {
    type Output = Distance;

    fn rem(self, rhs: Distance) -> Distance {
        Distance(self.0 % rhs.0)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Distance>>(iter: I) -> Distance {
        iter.fold(Distance::ZERO, |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(Distance::KILOMETRE, 1000 * Distance::METRE);
        assert_eq!(Distance::kilometres(100).as_metres(), 100_000);
        assert_eq!(Distance::metres(5) * 3, Distance::metres(15));
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(Distance::metres(5).checked_mul(3), Some(Distance::metres(15)));
        assert_eq!(Distance::metres(i64::MAX / 2 + 1).checked_mul(2), None);
    }

    #[test]
    fn test_division() {
        assert_eq!(Distance::metres(250) / Distance::metres(50), 5);
        assert_eq!(Distance::metres(260) % Distance::metres(50), Distance::metres(10));
        assert_eq!(Distance::metres(250) / 2, Distance::metres(125));
    }

    #[test]
    fn test_multiple_of() {
        assert!(Distance::metres(20).is_multiple_of(Distance::metres(5)));
        assert!(!Distance::metres(20).is_multiple_of(Distance::metres(3)));
        assert!(!Distance::metres(20).is_multiple_of(Distance::ZERO));
        assert!(Distance::ZERO.is_multiple_of(Distance::ZERO));
    }

    #[test]
    fn test_floor_to() {
        assert_eq!(Distance::metres(54321).floor_to(Distance::metres(10)), Distance::metres(54320));
        assert_eq!(Distance::metres(-1).floor_to(Distance::metres(10)), Distance::metres(-10));
        assert_eq!(Distance::metres(7).floor_to(Distance::ZERO), Distance::metres(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(Distance::kilometres(10).to_string(), "10000m");
        assert_eq!((-Distance::METRE).to_string(), "-1m");
    }
}
