use super::*;

/// An open chain of vertices in the section plane, with an out of plane offset per vertex.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline3(Vec<Point3>);

impl Polyline3 {
    pub fn new<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.len() < 2 {
            Err(Error::InvalidGeometry(
                "polyline requires 2 or more points to be valid",
            ))
        } else {
            Ok(Polyline3(points))
        }
    }

    pub fn pts(&self) -> &[Point3] {
        &self.0
    }
}

