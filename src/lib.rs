//! Mesh geometry for 2D electrical resistivity surveys.
//!
//! Electrodes and auxiliary geometry are described as a gmsh geometry (`.geo`) with a fine mesh
//! region around the survey and a coarse background region; the triangulation gmsh produces is
//! read back with its electrode nodes recovered in survey order.
#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

mod auxiliary;
mod builder;
mod electrode;
mod error;
mod extents;
#[cfg(feature = "io")]
pub mod io;
pub mod numeric;
mod options;
#[cfg(feature = "io")]
pub mod pipeline;
mod point;
mod polygon;
mod polyline;
pub mod triangle;
mod warning;

pub use auxiliary::*;
pub use builder::*;
pub use electrode::*;
pub use error::*;
pub use extents::*;
pub use options::*;
pub use point::*;
pub use polygon::*;
pub use polyline::*;
pub use triangle::*;
pub use warning::*;

/// The gmsh mesh format version the descriptions are meshed to and the parser reads.
pub const MSH_VERSION: &str = "2.2 0 8";
