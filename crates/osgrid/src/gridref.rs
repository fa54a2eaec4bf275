//! Grid references: a square plus an offset within it.

use crate::square::euclid_mod;
use crate::{Distance, GridError, Result, Square};
use std::fmt;
use std::str::FromStr;

/// Side length of a lettered grid square.
pub const TILE_SIZE: Distance = Distance::kilometres(100);

/// Most digits allowed in one half of the numeric part (metre precision).
const MAX_DIGITS: usize = 5;

/// A position on the National Grid.
///
/// Both offsets are always in `[0, TILE_SIZE)`; anything that would push
/// them outside that range carries into a neighbouring square instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRef {
    square: Square,
    easting: Distance,
    northing: Distance,
}

impl GridRef {
    /// Create a grid reference from a square name and offsets within it.
    pub fn new(square: &str, easting: Distance, northing: Distance) -> Result<Self> {
        let square = Square::parse(square)?;
        let range = Distance::ZERO..TILE_SIZE;
        if !range.contains(&easting) || !range.contains(&northing) {
            return Err(GridError::InvalidGridRef(format!(
                "Offset ({}, {}) outside square {}",
                easting, northing, square
            )));
        }

        Ok(Self {
            square,
            easting,
            northing,
        })
    }

    /// The false origin of the grid: the south west corner of `SV`.
    pub fn origin() -> Self {
        Self {
            square: Square::ORIGIN,
            easting: Distance::ZERO,
            northing: Distance::ZERO,
        }
    }

    /// The grid reference at an absolute easting/northing from the false origin.
    pub fn from_absolute(east: Distance, north: Distance) -> Result<Self> {
        Self::origin().add(east, north)
    }

    /// Parse a grid reference like `"SH 60986 54375"`, `"sh6054"` or `"TQ 28"`.
    ///
    /// Case and spaces are ignored. The digits split evenly into an easting
    /// and a northing half, and the length of each half sets the precision:
    /// five digits per half is one metre, four is ten metres, down to one
    /// digit for ten kilometres.
    pub fn parse(s: &str) -> Result<Self> {
        let s: String = s
            .chars()
            .filter(|c| *c != ' ')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if s.len() < 2 || !s.is_char_boundary(2) {
            return Err(GridError::InvalidGridRef(format!("Invalid square '{}'", s)));
        }
        let (letters, numeric) = s.split_at(2);
        let square = Square::parse(letters)?;

        if !numeric.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GridError::InvalidGridRef(format!("Invalid digits '{}'", numeric)));
        }
        if numeric.len() % 2 != 0 {
            return Err(GridError::InvalidGridRef(format!(
                "Need an even number of digits '{}'",
                numeric
            )));
        }

        let half = numeric.len() / 2;
        if half == 0 || half > MAX_DIGITS {
            return Err(GridError::InvalidGridRef(format!(
                "Need between 1 and {} digits each for easting and northing, got '{}'",
                MAX_DIGITS, numeric
            )));
        }

        let scale = 10_i64.pow((MAX_DIGITS - half) as u32);
        let (easting, northing) = numeric.split_at(half);
        let easting = parse_digits(easting)? * scale;
        let northing = parse_digits(northing)? * scale;

        Ok(Self {
            square,
            easting: Distance::metres(easting),
            northing: Distance::metres(northing),
        })
    }

    /// The 100 km square this reference lies in.
    pub fn square(&self) -> Square {
        self.square
    }

    /// Easting offset within the square.
    pub fn easting(&self) -> Distance {
        self.easting
    }

    /// Northing offset within the square.
    pub fn northing(&self) -> Distance {
        self.northing
    }

    /// Number of digits per half needed to write this reference exactly.
    ///
    /// Trailing zeros are dropped from both halves together, never going
    /// below one digit each.
    fn precision_digits(&self) -> (usize, i64, i64) {
        let mut digits = MAX_DIGITS;
        let (mut easting, mut northing) = (self.easting.as_metres(), self.northing.as_metres());
        while digits > 1 && easting % 10 == 0 && northing % 10 == 0 {
            easting /= 10;
            northing /= 10;
            digits -= 1;
        }
        (digits, easting, northing)
    }

    /// The numeric part of the reference with no separator, e.g. `"6054"`
    /// for `SH 60000 54000`. Dataset files are named by square and these digits.
    pub fn digits(&self) -> String {
        let (digits, easting, northing) = self.precision_digits();
        format!("{:0w$}{:0w$}", easting, northing, w = digits)
    }

    /// Floor both offsets to a multiple of `to`. A zero distance is treated
    /// as one metre.
    pub fn align(&self, to: Distance) -> Self {
        Self {
            square: self.square,
            easting: self.easting.floor_to(to),
            northing: self.northing.floor_to(to),
        }
    }

    /// Move by the given distances, carrying into neighbouring squares.
    ///
    /// Fails with [`GridError::OutOfBounds`] if the result would lie outside
    /// the lettered grid.
    pub fn add(&self, east: Distance, north: Distance) -> Result<Self> {
        let tile = TILE_SIZE.as_metres();
        let easting = self.easting.as_metres() + east.as_metres();
        let northing = self.northing.as_metres() + north.as_metres();

        // Whole squares crossed; floor division so negative offsets carry west/south.
        let carry_east = (easting - euclid_mod(easting, tile)) / tile;
        let carry_north = (northing - euclid_mod(northing, tile)) / tile;

        let square = self
            .square
            .step(carry_east, carry_north)
            .ok_or_else(|| GridError::OutOfBounds {
                square: self.square.to_string(),
                east: east.as_metres(),
                north: north.as_metres(),
            })?;

        Ok(Self {
            square,
            easting: Distance::metres(euclid_mod(easting, tile)),
            northing: Distance::metres(euclid_mod(northing, tile)),
        })
    }

    /// Easting and northing relative to the south west corner of square `AA`.
    fn grid_position(&self) -> (Distance, Distance) {
        (
            self.square.grid_easting() + self.easting,
            self.square.grid_northing() + self.northing,
        )
    }

    /// Displacement `(east, north)` from `other` to `self`.
    pub fn sub(&self, other: &GridRef) -> (Distance, Distance) {
        let (ae, an) = self.grid_position();
        let (be, bn) = other.grid_position();
        (ae - be, an - bn)
    }

    /// Easting from the false origin.
    pub fn abs_easting(&self) -> Distance {
        self.sub(&Self::origin()).0
    }

    /// Northing from the false origin.
    pub fn abs_northing(&self) -> Distance {
        self.sub(&Self::origin()).1
    }
}

fn parse_digits(digits: &str) -> Result<i64> {
    digits
        .parse::<i64>()
        .map_err(|_| GridError::InvalidGridRef(format!("Couldn't parse digits '{}'", digits)))
}

impl fmt::Display for GridRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, easting, northing) = self.precision_digits();
        write!(
            f,
            "{} {:0w$} {:0w$}",
            self.square,
            easting,
            northing,
            w = digits
        )
    }
}

impl FromStr for GridRef {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GridRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GridRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
