//! # osgrid
//!
//! Grid references on the Ordnance Survey National Grid.
//!
//! The grid is a 25 x 25 arrangement of 100 km squares, each named by two
//! letters. The first letter picks a 500 km square from a 5 x 5 block and the
//! second picks a 100 km square within it. The letter `I` is never used, so
//! both levels share the alphabet `ABCDEFGHJKLMNOPQRSTUVWXYZ`, laid out row
//! by row from the north west.
//!
//! A [`GridRef`] is one of those squares plus an easting and northing offset
//! within it, always held in whole metres and always in `[0, 100 km)`.
//! Arithmetic on references carries across square boundaries, and fails with
//! [`GridError::OutOfBounds`] rather than wrapping when it falls off the edge
//! of the lettered grid.
//!
//! ## Example
//!
//! ```
//! use osgrid::{Distance, GridRef};
//!
//! let summit: GridRef = "SH 60986 54375".parse()?;
//! assert_eq!(summit.square().to_string(), "SH");
//! assert_eq!(summit.easting(), Distance::metres(60986));
//!
//! // One square east of the false origin.
//! let next = GridRef::origin().add(Distance::kilometres(100), Distance::ZERO)?;
//! assert_eq!(next.to_string(), "SW 0 0");
//! # Ok::<(), osgrid::GridError>(())
//! ```

mod distance;
mod error;
mod gridref;
mod square;

pub use distance::Distance;
pub use error::GridError;
pub use gridref::{GridRef, TILE_SIZE};
pub use square::Square;

/// Result type for grid reference operations.
pub type Result<T> = std::result::Result<T, GridError>;
