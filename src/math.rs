use std::collections::HashSet;

use approx::AbsDiffEq;
use geo_types::{CoordFloat, Point, Rect};
use num_traits::NumCast;

/// Tolerance shared by every degenerate-geometry test in the crate.
pub const EPSILON: f64 = 1e-10;

/// Number of decimal digits kept when comparing coordinates for duplicates.
pub const DECIMAL_PRECISION: i32 = 10;

pub trait CoordType: CoordFloat + AbsDiffEq<Epsilon = Self> {}

impl CoordType for f64 {}
impl CoordType for f32 {}

#[inline]
pub(crate) fn lit<T: CoordType>(v: f64) -> T {
    <T as NumCast>::from(v).unwrap()
}

/// The circle passing through the three vertices of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle<T>
where
    T: CoordType,
{
    pub center: Point<T>,
    pub radius: T,
}

impl<T> Circumcircle<T>
where
    T: CoordType,
{
    /// Whether `p` lies strictly inside the circle. Points on the circle are outside.
    #[inline]
    pub fn contains(&self, p: Point<T>) -> bool {
        distance(p, self.center) < self.radius
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance<T: CoordType>(p1: Point<T>, p2: Point<T>) -> T {
    let d = p1 - p2;
    d.dot(d).sqrt()
}

/// Circumcircle of the triangle `(a, b, c)`.
///
/// Returns `None` when the triangle is (nearly) flat, i.e. when twice its
/// signed area is below [`EPSILON`] in absolute value.
pub fn circumcircle<T: CoordType>(a: Point<T>, b: Point<T>, c: Point<T>) -> Option<Circumcircle<T>> {
    let (ax, ay) = a.x_y();
    let (bx, by) = b.x_y();
    let (cx, cy) = c.x_y();

    let d = lit::<T>(2.0) * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < lit(EPSILON) {
        return None;
    }

    let al = ax * ax + ay * ay;
    let bl = bx * bx + by * by;
    let cl = cx * cx + cy * cy;

    let ux = (al * (by - cy) + bl * (cy - ay) + cl * (ay - by)) / d;
    let uy = (al * (cx - bx) + bl * (ax - cx) + cl * (bx - ax)) / d;

    let center = Point::new(ux, uy);
    Some(Circumcircle {
        center,
        radius: distance(center, a),
    })
}

/// Whether `p` lies strictly inside the circumcircle of `(a, b, c)`.
///
/// Always `false` for flat triangles, which have no circumcircle.
#[inline]
pub fn point_in_circumcircle<T: CoordType>(p: Point<T>, a: Point<T>, b: Point<T>, c: Point<T>) -> bool {
    circumcircle(a, b, c).map_or(false, |circle| circle.contains(p))
}

/// Whether every point lies on the line through the first two.
///
/// Sequences of fewer than three points are trivially collinear.
pub fn are_collinear<T: CoordType>(points: &[Point<T>]) -> bool {
    if points.len() < 3 {
        return true;
    }

    let (p0, p1) = (points[0], points[1]);
    let eps = lit::<T>(EPSILON);

    points[2..].iter().all(|&p| p0.cross_prod(p1, p).abs() <= eps)
}

/// Whether two points coincide once their coordinates are rounded to
/// [`DECIMAL_PRECISION`] decimal digits.
pub fn has_duplicates<T: CoordType>(points: &[Point<T>]) -> bool {
    let mut seen = HashSet::with_capacity(points.len());
    !points
        .iter()
        .all(|p| seen.insert((rounded_key(p.x()), rounded_key(p.y()))))
}

// Values too large to scale keep their own bits; the flag keeps both key spaces apart.
fn rounded_key<T: CoordType>(v: T) -> (bool, u64) {
    let v = v.to_f64().unwrap_or(f64::NAN);
    let scaled = (v * 10f64.powi(DECIMAL_PRECISION)).round();
    if scaled.is_finite() {
        // -0.0 and 0.0 must hash alike
        (true, (scaled + 0.0).to_bits())
    } else {
        (false, v.to_bits())
    }
}

/// Axis-aligned bounding box of the points, `None` when there are none.
pub fn bounding_box<T: CoordType>(points: &[Point<T>]) -> Option<Rect<T>> {
    if points.is_empty() {
        return None;
    }

    let mut min_x = T::infinity();
    let mut min_y = T::infinity();
    let mut max_x = T::neg_infinity();
    let mut max_y = T::neg_infinity();

    for p in points.iter() {
        min_x = min_x.min(p.x());
        min_y = min_y.min(p.y());
        max_x = max_x.max(p.x());
        max_y = max_y.max(p.y());
    }

    Some(Rect::new(Point::new(min_x, min_y), Point::new(max_x, max_y)))
}
