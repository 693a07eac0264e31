use crate::*;

/// Axis aligned extents of a set of section points.
///
/// The minimum and maximum corners are stored as given so comparisons against input
/// coordinates stay exact.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extents2 {
    pub min: Point2,
    pub max: Point2,
}

impl Extents2 {
    pub fn zero() -> Self {
        Self {
            min: Point2::zero(),
            max: Point2::zero(),
        }
    }

    pub fn from_min_max(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// The extent along X.
    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    /// The extent along Z.
    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min_all(other.min),
            max: self.max.max_all(other.max),
        }
    }

    /// Expand the extents by a value along each axis.
    ///
    /// A negative value can be used to _shrink_ the extents.
    /// `by` values that are non-finite are ignored and the original self is returned.
    ///
    /// # Example
    /// ```rust
    /// # use ertmesh::*;
    /// let e = Extents2::from_min_max([0.0, 0.0], [1.0, 2.0]);
    ///
    /// assert_eq!(e.expand([0.5, 1.0]), Extents2 {
    ///     min: [-0.5, -1.0],
    ///     max: [1.5, 3.0],
    /// });
    /// ```
    pub fn expand(self, by: Point2) -> Self {
        if by.into_iter().any(|x| !x.is_finite()) {
            return self;
        }

        Self {
            min: self.min.sub(by),
            max: self.max.add(by),
        }
    }

    /// Test that `other` lies within these extents along X, not touching either side.
    pub fn strictly_contains_x(&self, other: &Self) -> bool {
        self.min[0] < other.min[0] && other.max[0] < self.max[0]
    }
}

impl FromIterator<Point2> for Extents2 {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Point2>,
    {
        let mut iter = iter.into_iter();
        let Some(init) = iter.next() else { return Self::zero(); };

        let (min, max) = iter.fold((init, init), |(min, max), p| {
            (min.min_all(p), max.max_all(p))
        });

        Self::from_min_max(min, max)
    }
}
