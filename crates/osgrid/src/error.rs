//! Error types for grid reference handling.

use thiserror::Error;

/// Errors that can occur when parsing or moving grid references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The string is not a grid reference: bad square letters, non-numeric
    /// digits, or an odd number of digits.
    #[error("Invalid grid reference: {0}")]
    InvalidGridRef(String),

    /// Arithmetic carried past the edge of the lettered grid.
    #[error("Grid reference {square} moved {east}m east, {north}m north falls off the grid")]
    OutOfBounds {
        /// Square the movement started from.
        square: String,
        /// Requested easting change in metres.
        east: i64,
        /// Requested northing change in metres.
        north: i64,
    },
}
