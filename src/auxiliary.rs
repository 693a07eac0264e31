//! Auxiliary geometry placed alongside the electrodes.
use crate::*;
use std::collections::BTreeMap;

/// One piece of auxiliary geometry, keyed by what it is.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Feature {
    /// Surface topography, `(x, z)` points in any order.
    Surface(Vec<Point2>),
    /// A numbered closed ring embedded in the fine mesh region.
    Polygon(u32, Polygon3),
    /// A numbered open chain embedded in the fine mesh region.
    Boundary(u32, Polyline3),
}

impl Feature {
    /// Topography from paired X and Z coordinates.
    pub fn surface(x: &[f64], z: &[f64]) -> Result<Self> {
        if x.len() != z.len() {
            return Err(Error::shape("surface coordinates", x.len(), z.len()));
        }
        Ok(Feature::Surface(
            x.iter().zip(z).map(|(&x, &z)| [x, z]).collect(),
        ))
    }

    /// A polygon from paired X and Z coordinates, with an optional out of plane Y.
    pub fn polygon(index: u32, x: &[f64], z: &[f64], y: Option<&[f64]>) -> Result<Self> {
        vertices("polygon coordinates", x, z, y)
            .and_then(Polygon3::new)
            .map(|p| Feature::Polygon(index, p))
    }

    /// A boundary line from paired X and Z coordinates, with an optional out of plane Y.
    pub fn boundary(index: u32, x: &[f64], z: &[f64], y: Option<&[f64]>) -> Result<Self> {
        vertices("boundary coordinates", x, z, y)
            .and_then(Polyline3::new)
            .map(|p| Feature::Boundary(index, p))
    }
}

fn vertices(what: &'static str, x: &[f64], z: &[f64], y: Option<&[f64]>) -> Result<Vec<Point3>> {
    if x.len() != z.len() {
        return Err(Error::shape(what, x.len(), z.len()));
    }
    match y {
        Some(y) if y.len() != x.len() => Err(Error::shape(what, x.len(), y.len())),
        Some(y) => Ok(x
            .iter()
            .zip(z)
            .zip(y)
            .map(|((&x, &z), &y)| [x, z, y])
            .collect()),
        None => Ok(x.iter().zip(z).map(|(&x, &z)| [x, z].with_y(0.0)).collect()),
    }
}

/// The set of auxiliary geometry for a survey.
///
/// Inserting a feature replaces any feature with the same key.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct AuxGeometry {
    surface: Option<Vec<Point2>>,
    polygons: BTreeMap<u32, Polygon3>,
    boundaries: BTreeMap<u32, Polyline3>,
}

impl AuxGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: Feature) {
        match feature {
            Feature::Surface(s) => self.surface = Some(s),
            Feature::Polygon(i, p) => {
                self.polygons.insert(i, p);
            }
            Feature::Boundary(i, b) => {
                self.boundaries.insert(i, b);
            }
        }
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.insert(feature);
        self
    }

    pub fn surface(&self) -> Option<&[Point2]> {
        self.surface.as_deref()
    }

    /// Polygons numbered contiguously from 1, in order, and the numbers skipped after a gap.
    pub fn polygons(&self) -> (Vec<(u32, &Polygon3)>, Vec<u32>) {
        numbered(&self.polygons)
    }

    /// Boundaries numbered contiguously from 1, in order, and the numbers skipped after a gap.
    pub fn boundaries(&self) -> (Vec<(u32, &Polyline3)>, Vec<u32>) {
        numbered(&self.boundaries)
    }
}

impl FromIterator<Feature> for AuxGeometry {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), AuxGeometry::with)
    }
}

fn numbered<T>(map: &BTreeMap<u32, T>) -> (Vec<(u32, &T)>, Vec<u32>) {
    let (run, skipped) = crate::electrode::contiguous_from_one(map.keys().copied());
    let run = run
        .into_iter()
        .filter_map(|i| map.get(&i).map(|x| (i, x)))
        .collect();
    (run, skipped)
}
