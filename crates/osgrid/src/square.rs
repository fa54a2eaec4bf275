//! Two-letter 100 km grid squares.

use crate::{Distance, GridError, Result};
use std::fmt;

/// Grid letters, row by row from the north west. There is no `I`.
pub(crate) const GRID_CHARS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Letters per row/column at either level of the grid.
const SIDE: i64 = 5;

/// Index of a grid letter, if it is one.
fn letter_index(c: u8) -> Option<u8> {
    GRID_CHARS.iter().position(|&g| g == c).map(|i| i as u8)
}

/// A 100 km square named by its two grid letters.
///
/// The first letter selects a 500 km square within the 5 x 5 macro grid, the
/// second selects a 100 km cell within that. Both are stored as indices into
/// the grid alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    major: u8,
    minor: u8,
}

impl Square {
    /// `SV`, the square holding the false origin of the grid.
    pub(crate) const ORIGIN: Square = Square { major: 17, minor: 20 };

    /// Parse two grid letters (case-insensitive).
    pub fn parse(letters: &str) -> Result<Self> {
        let bytes = letters.as_bytes();
        if bytes.len() != 2 {
            return Err(GridError::InvalidGridRef(format!("Invalid square '{}'", letters)));
        }

        match (
            letter_index(bytes[0].to_ascii_uppercase()),
            letter_index(bytes[1].to_ascii_uppercase()),
        ) {
            (Some(major), Some(minor)) => Ok(Square { major, minor }),
            _ => Err(GridError::InvalidGridRef(format!("Invalid square '{}'", letters))),
        }
    }

    /// Column of this square counted from the west edge of the grid (0-24).
    pub(crate) fn column(self) -> i64 {
        (self.major as i64 % SIDE) * SIDE + self.minor as i64 % SIDE
    }

    /// Row of this square counted from the north edge of the grid (0-24).
    pub(crate) fn row(self) -> i64 {
        (self.major as i64 / SIDE) * SIDE + self.minor as i64 / SIDE
    }

    /// Rebuild a square from its absolute column and row, if both lie on the grid.
    pub(crate) fn from_column_row(column: i64, row: i64) -> Option<Self> {
        let extent = SIDE * SIDE;
        if !(0..extent).contains(&column) || !(0..extent).contains(&row) {
            return None;
        }

        let major = (row / SIDE) * SIDE + column / SIDE;
        let minor = euclid_mod(row, SIDE) * SIDE + euclid_mod(column, SIDE);
        Some(Square {
            major: major as u8,
            minor: minor as u8,
        })
    }

    /// Step this square by whole squares, east and north.
    pub(crate) fn step(self, east: i64, north: i64) -> Option<Self> {
        // Rows count southwards, so moving north reduces the row.
        Self::from_column_row(self.column() + east, self.row() - north)
    }

    /// Easting of this square's south west corner relative to that of `AA`.
    pub(crate) fn grid_easting(self) -> Distance {
        crate::TILE_SIZE * self.column()
    }

    /// Northing of this square's south west corner relative to that of `AA`,
    /// so always zero or negative.
    pub(crate) fn grid_northing(self) -> Distance {
        -(crate::TILE_SIZE * self.row())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            GRID_CHARS[self.major as usize] as char,
            GRID_CHARS[self.minor as usize] as char
        )
    }
}

/// Non-negative remainder, whatever the sign of `x`.
pub(crate) fn euclid_mod(x: i64, m: i64) -> i64 {
    ((x % m) + m) % m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_square() {
        let sv = Square::parse("SV").unwrap();
        assert_eq!(sv.to_string(), "SV");
        assert_eq!(Square::parse("tq").unwrap().to_string(), "TQ");
        assert!(Square::parse("SI").is_err());
        assert!(Square::parse("S").is_err());
        assert!(Square::parse("SVX").is_err());
    }

    #[test]
    fn test_column_row() {
        // S is row 3, column 2 of the macro grid; V is row 4, column 0.
        let sv = Square::parse("SV").unwrap();
        assert_eq!(sv, Square::ORIGIN);
        assert_eq!(sv.column(), 10);
        assert_eq!(sv.row(), 19);
        assert_eq!(Square::from_column_row(10, 19), Some(sv));

        let aa = Square::parse("AA").unwrap();
        assert_eq!((aa.column(), aa.row()), (0, 0));
        let zz = Square::parse("ZZ").unwrap();
        assert_eq!((zz.column(), zz.row()), (24, 24));
    }

    #[test]
    fn test_step_within_macro_square() {
        let sv = Square::parse("SV").unwrap();
        assert_eq!(sv.step(1, 0).unwrap().to_string(), "SW");
        assert_eq!(sv.step(0, 1).unwrap().to_string(), "SQ");
    }

    #[test]
    fn test_step_carries_into_macro_square() {
        // East off the edge of S lands in T.
        let sz = Square::parse("SZ").unwrap();
        assert_eq!(sz.step(1, 0).unwrap().to_string(), "TV");
        // North off the top of S lands in N.
        let sd = Square::parse("SD").unwrap();
        assert_eq!(sd.step(0, 1).unwrap().to_string(), "NY");
    }

    #[test]
    fn test_step_negative_carries() {
        // West off the edge of T lands in S.
        let tv = Square::parse("TV").unwrap();
        assert_eq!(tv.step(-1, 0).unwrap().to_string(), "SZ");
        // South off the bottom of N lands in S.
        let ny = Square::parse("NY").unwrap();
        assert_eq!(ny.step(0, -1).unwrap().to_string(), "SD");
        // Several squares at once, crossing two macro boundaries.
        let tq = Square::parse("TQ").unwrap();
        assert_eq!(tq.step(-7, 0).unwrap().to_string(), "RT");
    }

    #[test]
    fn test_step_off_grid() {
        let aa = Square::parse("AA").unwrap();
        assert!(aa.step(-1, 0).is_none());
        assert!(aa.step(0, 1).is_none());
        let zz = Square::parse("ZZ").unwrap();
        assert!(zz.step(1, 0).is_none());
        assert!(zz.step(0, -1).is_none());
    }

    #[test]
    fn test_euclid_mod() {
        assert_eq!(euclid_mod(7, 5), 2);
        assert_eq!(euclid_mod(-1, 5), 4);
        assert_eq!(euclid_mod(-5, 5), 0);
        assert_eq!(euclid_mod(-6, 5), 4);
    }
}
