//! Interop with the external mesher.
//! Reading gmsh triangulations and invoking gmsh on a geometry description.
use crate::*;

pub mod mesher;
pub mod msh;

pub use mesher::{Gmsh, Mesher};
pub use msh::{parse_msh, read_msh, ElectrodeLookup, MshHeader, Node, ParsedMesh, RegionRange, Triangle};
