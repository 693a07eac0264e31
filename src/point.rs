use std::ops;

pub trait Point: Copy + Sized + IntoIterator<Item = f64> {
    /// Set all the values to this value.
    fn all(v: f64) -> Self;

    /// Set all values to zero.
    fn zero() -> Self {
        Self::all(0.)
    }

    /// Scale point by multiplying all dimensions by `scalar`.
    fn scale(self, scalar: f64) -> Self;

    /// Calculate the magnitude of the vector.
    fn mag(self) -> f64 {
        self.into_iter()
            .zip(self)
            .map(|(a, b)| a * b)
            .sum::<f64>()
            .sqrt()
    }

    /// Return the minimum of each dimension.
    fn min_all(self, b: Self) -> Self {
        xfm(self, b, f64::min)
    }

    /// Return the maximum of each dimension.
    fn max_all(self, b: Self) -> Self {
        xfm(self, b, f64::max)
    }

    /// Perform a transformation on each pair of dimensions.
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self;
}

pub trait Add<Rhs = Self> {
    fn add(self, rhs: Rhs) -> Self;
    fn sub(self, rhs: Rhs) -> Self
    where
        Self: Sized + Copy,
        Rhs: Point,
    {
        self.add(rhs.scale(-1.0))
    }
}

/// 2D Point in the survey section plane (X, Z), where Z is elevation.
pub type Point2 = [f64; 2];

/// 3D Point (X, Z, Y), the section plane coordinates with an out of plane offset.
pub type Point3 = [f64; 3];

impl Add for Point2 {
    fn add(self, rhs: Self) -> Self {
        xfm(self, rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        xfm(self, rhs, ops::Sub::sub)
    }
}
impl Point for Point2 {
    fn all(v: f64) -> Self {
        [v; 2]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self {
        let [a0, a1] = self;
        let [b0, b1] = b;
        [f(a0, b0), f(a1, b1)]
    }
}

impl Point for Point3 {
    fn all(v: f64) -> Self {
        [v; 3]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self {
        let [a0, a1, a2] = self;
        let [b0, b1, b2] = b;
        [f(a0, b0), f(a1, b1), f(a2, b2)]
    }
}

pub trait ToPoint2 {
    fn to_p2(self) -> Point2;
}

impl ToPoint2 for Point2 {
    fn to_p2(self) -> Point2 {
        self
    }
}
impl ToPoint2 for &Point2 {
    fn to_p2(self) -> Point2 {
        *self
    }
}
impl ToPoint2 for Point3 {
    fn to_p2(self) -> Point2 {
        let [x, z, _] = self;
        [x, z]
    }
}
impl ToPoint2 for &Point3 {
    fn to_p2(self) -> Point2 {
        (*self).to_p2()
    }
}

pub trait WithY: ToPoint2 + Sized {
    /// Lift a section point into 3D with an out of plane offset.
    fn with_y(self, y: f64) -> Point3 {
        let [x, z] = self.to_p2();
        [x, z, y]
    }
}

impl WithY for Point2 {}

/// The 2D cross product (perp-dot) of `a` and `b`.
pub fn xprod2(a: Point2, b: Point2) -> f64 {
    let [ax, az] = a;
    let [bx, bz] = b;
    ax * bz - az * bx
}

/// The point halfway between `a` and `b`.
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    a.add(b).scale(0.5)
}

/// Euclidean distance between two section points.
pub fn dist(a: Point2, b: Point2) -> f64 {
    b.sub(a).mag()
}

/// Helper function which effectively transforms to [`Point::xfm`].
#[inline(always)]
pub fn xfm<P: Point, F: Fn(f64, f64) -> f64>(a: P, b: P, f: F) -> P {
    P::xfm(a, b, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_adding() {
        let p = [0.0, 1.0].add([3.0, 1.0]);
        assert_eq!(p, [3.0, 2.0]);

        let p = [0.0, 1.0].sub([3.0, 1.0]);
        assert_eq!(p, [-3.0, 0.0]);
    }

    #[test]
    fn point_scaling() {
        let p = [0.0, 1.0].scale(2.0);
        assert_eq!(p, [0.0, 2.0]);

        let p = [-2.0, 0.5, 3.0].scale(-0.5);
        assert_eq!(p, [1.0, -0.25, -1.5]);
    }

    #[test]
    fn to_point_testing() {
        assert_eq!([0.0, 1.0].to_p2(), [0.0, 1.0]);
        assert_eq!([0.0, 1.0, 2.0].to_p2(), [0.0, 1.0]);
        assert_eq!([4.0, -1.0].with_y(2.0), [4.0, -1.0, 2.0]);
    }

    #[test]
    fn xproduct_test() {
        assert_eq!(xprod2([1.0, 0.0], [0.0, 1.0]), 1.0);
        assert_eq!(xprod2([0.0, 1.0], [1.0, 0.0]), -1.0);
        assert_eq!(xprod2([2.0, 2.0], [1.0, 1.0]), 0.0);
    }

    #[test]
    fn midpoint_and_dist() {
        assert_eq!(midpoint([0.0, 0.0], [2.0, -4.0]), [1.0, -2.0]);

        let d = dist([0.0, 0.0], [3.0, 4.0]) - 5.0;
        assert!(d.abs() < 1e-11);
    }

    #[test]
    fn mag_testing() {
        let m = [3.0, -4.0].mag() - 5.0;
        assert!(m.abs() < 1e-11);

        let m = [-2.0, -3.0, 6.0].mag() - 7.0;
        assert!(m.abs() < 1e-11);
    }

    #[test]
    fn min_max_all() {
        assert_eq!([0.0, 5.0].min_all([1.0, -1.0]), [0.0, -1.0]);
        assert_eq!([0.0, 5.0].max_all([1.0, -1.0]), [1.0, 5.0]);
    }
}
