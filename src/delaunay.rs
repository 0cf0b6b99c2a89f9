/*!
Incremental [Bowyer-Watson](https://en.wikipedia.org/wiki/Bowyer%E2%80%93Watson_algorithm)
construction of a 2D Delaunay triangulation.

Points are inserted one at a time, in input order, into a working set of
triangles seeded with a super-triangle that encloses every input point.
Each insertion removes the triangles whose circumcircle strictly contains
the new point and fans the exposed cavity boundary out to it. Triangles
still touching a super-triangle vertex are dropped at the end.

The working set is a plain `Vec<Triangle>`; no adjacency is maintained, so
construction is quadratic in the number of points.
*/

use std::collections::HashMap;
use std::marker::PhantomData;
use std::slice;

use geo_types::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::TriangulationError;
use crate::math::{are_collinear, bounding_box, has_duplicates, lit, point_in_circumcircle, CoordType};

/// Distance of the super-triangle vertices from the centre of the input,
/// in multiples of the larger side of its bounding box.
pub const SUPER_TRIANGLE_MARGIN: f64 = 20.0;

/// A triangle given by three indices into the point sequence it was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle(pub usize, pub usize, pub usize);

impl Triangle {
    #[inline]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Triangle(a, b, c)
    }

    /// Vertex indices in stored order.
    #[inline]
    pub fn vertices(&self) -> [usize; 3] {
        [self.0, self.1, self.2]
    }

    /// The three directed edges `(0, 1)`, `(1, 2)`, `(2, 0)`.
    #[inline]
    pub fn edges(&self) -> [(usize, usize); 3] {
        [(self.0, self.1), (self.1, self.2), (self.2, self.0)]
    }

    #[inline]
    pub fn contains_vertex(&self, v: usize) -> bool {
        self.0 == v || self.1 == v || self.2 == v
    }

    /// Vertex indices in ascending order, for comparing triangles as sets.
    #[inline]
    pub fn sorted(&self) -> [usize; 3] {
        let mut v = self.vertices();
        v.sort_unstable();
        v
    }
}

// undirected edge, smaller index first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Edge(usize, usize);

impl Edge {
    #[inline]
    fn new(a: usize, b: usize) -> Self {
        if a < b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }
}

/// Result of the Delaunay triangulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangulation<T>
where
    T: CoordType,
{
    /// Triangles referencing only indices of the input points, in construction order.
    pub triangles: Vec<Triangle>,

    #[cfg_attr(feature = "serde", serde(skip))]
    _phantom: PhantomData<T>,
}

// scratch buffers reused across insertions
struct Cavity {
    bad: Vec<bool>,
    edge_count: HashMap<Edge, u32>,
    boundary: Vec<(usize, usize)>,
}

impl Cavity {
    fn new() -> Self {
        Self {
            bad: Vec::new(),
            edge_count: HashMap::new(),
            boundary: Vec::new(),
        }
    }
}

impl<T> Triangulation<T>
where
    T: CoordType,
{
    fn new(n: usize) -> Self {
        let max_triangles = if n > 2 { 2 * n - 5 } else { 0 };

        Self {
            triangles: Vec::with_capacity(max_triangles),
            _phantom: PhantomData,
        }
    }

    /// The number of triangles in the triangulation.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Triangulate a set of 2D points.
    ///
    /// Fewer than three points, collinear points and points that coincide
    /// after rounding to ten decimals yield an empty triangulation. The only
    /// error is a NaN or infinite coordinate.
    pub fn triangulate(points: &[Point<T>]) -> Result<Triangulation<T>, TriangulationError> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p.x().is_finite() && p.y().is_finite()))
        {
            debug!(index, "rejecting non-finite coordinate");
            return Err(TriangulationError::NonFiniteCoordinate { index });
        }

        let n = points.len();
        if n < 3 {
            debug!(points = n, "too few points to triangulate");
            return Ok(Triangulation::new(0));
        }
        if are_collinear(points) {
            debug!(points = n, "collinear input, nothing to triangulate");
            return Ok(Triangulation::new(0));
        }
        if has_duplicates(points) {
            debug!(points = n, "duplicate points, nothing to triangulate");
            return Ok(Triangulation::new(0));
        }

        let vertices = match Self::with_super_triangle(points) {
            Some(vertices) => vertices,
            None => return Ok(Triangulation::new(0)),
        };

        let mut triangulation = Triangulation::new(n);
        let triangles = &mut triangulation.triangles;
        triangles.push(Triangle(n, n + 1, n + 2));

        let mut cavity = Cavity::new();
        for i in 0..n {
            Self::insert(triangles, &vertices, i, &mut cavity);
        }

        // strip everything still attached to the super-triangle
        triangles.retain(|t| t.0 < n && t.1 < n && t.2 < n);
        triangles.shrink_to_fit();

        debug!(points = n, triangles = triangles.len(), "triangulation complete");
        Ok(triangulation)
    }

    /// Input points followed by the three super-triangle vertices.
    fn with_super_triangle(points: &[Point<T>]) -> Option<Vec<Point<T>>> {
        let bbox = bounding_box(points)?;
        let delta = bbox.width().max(bbox.height());
        let mid = bbox.center();
        let margin = lit::<T>(SUPER_TRIANGLE_MARGIN) * delta;

        let mut vertices = Vec::with_capacity(points.len() + 3);
        vertices.extend_from_slice(points);
        vertices.push(Point::new(mid.x - margin, mid.y - delta));
        vertices.push(Point::new(mid.x, mid.y + margin));
        vertices.push(Point::new(mid.x + margin, mid.y - delta));
        Some(vertices)
    }

    fn insert(triangles: &mut Vec<Triangle>, vertices: &[Point<T>], i: usize, cavity: &mut Cavity) {
        let p = vertices[i];

        cavity.bad.clear();
        cavity.bad.extend(
            triangles
                .iter()
                .map(|t| point_in_circumcircle(p, vertices[t.0], vertices[t.1], vertices[t.2])),
        );

        cavity.edge_count.clear();
        for (t, _) in triangles.iter().zip(&cavity.bad).filter(|(_, bad)| **bad) {
            for (a, b) in t.edges().iter() {
                *cavity.edge_count.entry(Edge::new(*a, *b)).or_insert(0) += 1;
            }
        }

        // edges owned by a single bad triangle, in triangle order so the output is deterministic
        cavity.boundary.clear();
        for (t, _) in triangles.iter().zip(&cavity.bad).filter(|(_, bad)| **bad) {
            for &(a, b) in t.edges().iter() {
                if cavity.edge_count.get(&Edge::new(a, b)) == Some(&1) {
                    cavity.boundary.push((a, b));
                }
            }
        }

        trace!(
            point = i,
            bad = cavity.bad.iter().filter(|bad| **bad).count(),
            boundary = cavity.boundary.len(),
            "inserting point"
        );

        let mut keep = cavity.bad.iter().map(|&bad| !bad);
        triangles.retain(|_| keep.next().unwrap_or(true));

        triangles.extend(cavity.boundary.drain(..).map(|(a, b)| Triangle(a, b, i)));
    }
}

impl<'a, T> IntoIterator for &'a Triangulation<T>
where
    T: CoordType,
{
    type Item = &'a Triangle;
    type IntoIter = slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
