//! Error taxonomy for building descriptions and parsing triangulations.
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Paired input arrays do not have matching lengths.
    #[error("shape mismatch in {what}: expected {expected} entries, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The topography does not strictly contain the electrode x-extent.
    #[error(
        "electrode x-extent [{electrode_min}, {electrode_max}] is not inside the surface x-extent [{surface_min}, {surface_max}]"
    )]
    GeometryOutOfBounds {
        electrode_min: f64,
        electrode_max: f64,
        surface_min: f64,
        surface_max: f64,
    },

    /// The smoothed base of the fine mesh region rises above an electrode.
    #[error("base of fine mesh region reaches {base_max} which is above the lowest electrode at {electrode_min}")]
    InvalidDepth { base_max: f64, electrode_min: f64 },

    /// Auxiliary geometry that cannot form the requested entity.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),

    /// The mesh file does not start with the expected header.
    #[error("unrecognised mesh file format, expecting a '$MeshFormat' header")]
    UnrecognizedFormat,

    /// The mesh file ended early, or a record could not be read.
    #[error("truncated or malformed {section} block at record {record}")]
    TruncatedInput {
        section: &'static str,
        record: usize,
    },

    /// An element references a node id absent from the node block.
    #[error("element {element} references unknown node {node}")]
    UnknownNode { element: u64, node: u64 },

    /// No triangle elements were found.
    #[error("mesh contains no triangle elements, the mesher likely failed to produce a mesh")]
    EmptyMesh,

    /// A triangle has zero area.
    #[error("triangle {triangle} (element {element}) has zero area")]
    DegenerateMesh { triangle: usize, element: u64 },

    /// The number of electrode nodes differs from the number of electrodes.
    #[error("expected {expected} electrode nodes, found {found}")]
    CorrespondenceMismatch { expected: usize, found: usize },

    /// The external mesher exited unsuccessfully.
    #[error("mesher exited with {status}: {stderr}")]
    MesherFailed { status: String, stderr: String },

    /// The external mesher succeeded but did not write its output.
    #[error("mesher did not write the expected output {0}")]
    MesherOutputMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn shape(what: &'static str, expected: usize, found: usize) -> Self {
        Error::ShapeMismatch {
            what,
            expected,
            found,
        }
    }
}
