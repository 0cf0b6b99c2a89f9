/*!
Incremental 2D [Delaunay triangulation](https://en.wikipedia.org/wiki/Delaunay_triangulation)
with a compact binary exchange format for point sets and triangle meshes.

# Example

```rust
use geo_types::{point, Point};
use triangulator::{encode_triangle_mesh, triangulate};

let points: Vec<Point<f64>> = vec![
    point!(x: 0., y: 0.),
    point!(x: 1., y: 0.),
    point!(x: 1., y: 1.),
    point!(x: 0., y: 1.),
];

let result = triangulate(&points).unwrap();
assert_eq!(result.len(), 2);

let bytes = encode_triangle_mesh(&points, &result.triangles).unwrap();
assert_eq!(bytes.len(), 4 + 8 * 4 + 4 + 12 * 2);
```
*/

pub use codec::{
    decode_point_sequence, decode_triangle_mesh, encode_point_sequence, encode_triangle_mesh,
    TriangleMesh,
};
pub use delaunay::{Triangle, Triangulation, SUPER_TRIANGLE_MARGIN};
pub use error::{CodecError, Error, TriangulationError};
pub use math::{
    are_collinear, bounding_box, circumcircle, distance, has_duplicates, point_in_circumcircle,
    Circumcircle, CoordType, DECIMAL_PRECISION, EPSILON,
};

use geo_types::Point;
use tracing::debug;

mod codec;
mod delaunay;
mod error;
mod math;

/// Triangulate `points`, see [`Triangulation::triangulate`].
///
/// Degenerate input (fewer than three points, collinear or coincident
/// points) gives an empty triangulation; only a NaN or infinite coordinate
/// is an error.
pub fn triangulate<T>(points: &[Point<T>]) -> Result<Triangulation<T>, TriangulationError>
where
    T: CoordType,
{
    Triangulation::triangulate(points)
}

/// Decode a point set, triangulate it and encode the resulting mesh.
///
/// The points are echoed back as decoded, so the output starts with the
/// point set section of the input.
pub fn triangulate_point_set_bytes(data: &[u8]) -> Result<Vec<u8>, Error> {
    let points: Vec<Point<f64>> = decode_point_sequence(data)?;
    let triangulation = triangulate(&points)?;
    debug!(
        points = points.len(),
        triangles = triangulation.len(),
        "encoding triangle mesh"
    );
    Ok(encode_triangle_mesh(&points, &triangulation.triangles)?)
}
