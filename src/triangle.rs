use crate::*;

/// Triangle represented by 3 section points (A, B, C).
pub type Tri = [Point2; 3];

/// The turning direction of three points.
///
/// The discriminants follow the classic `ccw` test convention: `0` colinear, `1`
/// counter-clockwise, `2` clockwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Orientation {
    Colinear = 0,
    CounterClockwise = 1,
    Clockwise = 2,
}

/// Orientation of the triangle `p -> q -> r` with X to the right and Z up.
///
/// # Example
/// ```rust
/// # use ertmesh::*;
/// assert_eq!(orientation([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]), Orientation::CounterClockwise);
/// assert_eq!(orientation([0.0, 1.0], [1.0, 0.0], [0.0, 0.0]), Orientation::Clockwise);
/// assert_eq!(orientation([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]), Orientation::Colinear);
/// ```
pub fn orientation(p: Point2, q: Point2, r: Point2) -> Orientation {
    // turn of (q - p) into (r - q)
    let val = xprod2(q.sub(p), r.sub(q));
    if val > 0.0 {
        Orientation::CounterClockwise
    } else if val < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Colinear
    }
}

/// Centroid of a triangle, taken 2/3 of the way from the apex `r` to the midpoint of the
/// opposite edge `pq`.
pub fn centroid([p, q, r]: Tri) -> Point2 {
    let m = midpoint(p, q);
    r.add(m.sub(r).scale(2.0 / 3.0))
}

/// Triangle area as `base * height / 2`, using `pq` as the base and the perpendicular distance
/// of `r` from it as the height.
///
/// Colinear points return exactly zero.
pub fn area([p, q, r]: Tri) -> f64 {
    let base = dist(p, q);
    if base == 0.0 {
        return 0.0;
    }
    let height = xprod2(q.sub(p), r.sub(p)).abs() / base;
    0.5 * base * height
}

/// Reorder the triangle vertices counter-clockwise.
///
/// Clockwise triangles have their first two vertices swapped, other triangles are left as is.
/// Returns if the triangle was swapped.
pub fn correct_winding<I: Copy>(tri: &mut [I; 3], pts: Tri) -> bool {
    let [p, q, r] = pts;
    if orientation(p, q, r) == Orientation::Clockwise {
        tri.swap(0, 1);
        true
    } else {
        false
    }
}
