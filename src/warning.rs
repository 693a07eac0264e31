use std::fmt;

/// A non-fatal condition surfaced alongside a successful result.
///
/// Warnings are also logged at the `warn` level as they are raised, but callers should inspect
/// the returned list to escalate them.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Warning {
    /// No surface electrodes or topography were given, so a flat surface was generated at this
    /// elevation.
    SynthesizedTopography { elevation: f64 },
    /// Coincident surface points, given as the sorted `(x, z)` pairs that repeat.
    DuplicatePoints { points: Vec<[f64; 2]> },
    /// Numbered entities that were skipped since the numbering has a gap before them.
    SkippedGeometry { kind: &'static str, index: u32 },
    /// The mesh file version differs from the one targeted.
    VersionMismatch { found: String },
    /// The recovered electrode nodes differ in number from the electrodes.
    CorrespondenceMismatch { expected: usize, found: usize },
    /// A region's triangles are interleaved with other regions, so its range is a superset.
    NonContiguousRegion { region: u32 },
    /// The builder and parser electrode lists disagree at this electrode.
    ListDisagreement { electrode: usize },
}

impl Warning {
    /// Log the warning and push it onto `warnings`.
    pub(crate) fn raise(self, warnings: &mut Vec<Warning>) {
        log::warn!("{}", self);
        warnings.push(self);
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Warning::*;
        match self {
            SynthesizedTopography { elevation } => write!(
                f,
                "no surface electrodes or topography given, generated a flat surface at {}",
                elevation
            ),
            DuplicatePoints { points } => write!(
                f,
                "{} duplicated surface point(s) detected, elements with zero area are likely",
                points.len()
            ),
            SkippedGeometry { kind, index } => write!(
                f,
                "{}{} skipped since the numbering is not contiguous",
                kind, index
            ),
            VersionMismatch { found } => write!(
                f,
                "mesh format version '{}' differs from '{}', parsing may fail",
                found,
                crate::MSH_VERSION
            ),
            CorrespondenceMismatch { expected, found } => write!(
                f,
                "expected {} electrode nodes, recovered {}",
                expected, found
            ),
            NonContiguousRegion { region } => write!(
                f,
                "triangles of region {} are not contiguous, its range includes other regions",
                region
            ),
            ListDisagreement { electrode } => write!(
                f,
                "description and mesh disagree on the node of electrode {}",
                electrode
            ),
        }
    }
}
