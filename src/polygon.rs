use crate::*;

/// A closed ring of vertices in the section plane, with an out of plane offset per vertex.
///
/// The ring is implicitly closed, the last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polygon3(Vec<Point3>);

impl Polygon3 {
    pub fn new<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.len() < 3 {
            Err(Error::InvalidGeometry(
                "polygon requires 3 or more points to be valid",
            ))
        } else {
            Ok(Polygon3(points))
        }
    }

    pub fn pts(&self) -> &[Point3] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points() {
        assert!(Polygon3::new([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]).is_err());
    }

    #[test]
    fn keeps_vertex_order() {
        let pts = [[0.0, 0.0, 5.0], [4.0, 0.0, -2.0], [0.0, -2.0, 1.0]];
        let p = Polygon3::new(pts).unwrap();
        assert_eq!(p.pts(), &pts[..]);
    }
}
