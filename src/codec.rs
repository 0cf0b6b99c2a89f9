/*!
Fixed little-endian wire format for point sets and triangle meshes.

```text
PointSet     := u32 count, count × (f32 x, f32 y)
TriangleMesh := PointSet, u32 count, count × (u32 i1, u32 i2, u32 i3)
```

Coordinates always travel as `f32`; decoding promotes them into the working
float type. Bytes past the end of a complete payload are ignored.
*/

use std::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian};
use geo_types::Point;
use num_traits::NumCast;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delaunay::Triangle;
use crate::error::CodecError;
use crate::math::CoordType;

const COUNT_SIZE: usize = 4;
const POINT_SIZE: usize = 8;
const TRIANGLE_SIZE: usize = 12;

/// Points together with the triangles indexing into them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMesh<T>
where
    T: CoordType,
{
    pub points: Vec<Point<T>>,
    pub triangles: Vec<Triangle>,
}

impl<T> TriangleMesh<T>
where
    T: CoordType,
{
    pub fn new(points: Vec<Point<T>>, triangles: Vec<Triangle>) -> Self {
        Self { points, triangles }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode_triangle_mesh(&self.points, &self.triangles)
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        decode_triangle_mesh(data)
    }
}

/// Encode points as `[u32 count][count × (f32 x, f32 y)]`.
pub fn encode_point_sequence<T: CoordType>(points: &[Point<T>]) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(COUNT_SIZE + POINT_SIZE * points.len());
    write_points(&mut buf, points)?;
    Ok(buf)
}

/// Decode a point set, failing with [`CodecError::TruncatedHeader`] when the
/// count is incomplete and [`CodecError::TruncatedBody`] when fewer points
/// follow than it declares.
pub fn decode_point_sequence<T: CoordType>(data: &[u8]) -> Result<Vec<Point<T>>, CodecError> {
    Reader::new(data).points().map_err(|err| {
        debug!(error = %err, bytes = data.len(), "rejecting point set");
        err
    })
}

/// Encode a point set followed by `[u32 count][count × (u32, u32, u32)]`.
pub fn encode_triangle_mesh<T: CoordType>(
    points: &[Point<T>],
    triangles: &[Triangle],
) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(
        2 * COUNT_SIZE + POINT_SIZE * points.len() + TRIANGLE_SIZE * triangles.len(),
    );
    write_points(&mut buf, points)?;
    write_count(&mut buf, triangles.len())?;
    for t in triangles {
        for &index in t.vertices().iter() {
            let index32 = u32::try_from(index).map_err(|_| CodecError::IndexOverflow { index })?;
            put_u32(&mut buf, index32);
        }
    }
    Ok(buf)
}

/// Decode a triangle mesh. Every triangle index must refer to a decoded point.
pub fn decode_triangle_mesh<T: CoordType>(data: &[u8]) -> Result<TriangleMesh<T>, CodecError> {
    let mut reader = Reader::new(data);
    reader
        .points()
        .and_then(|points| {
            let triangles = reader.triangles(points.len())?;
            Ok(TriangleMesh { points, triangles })
        })
        .map_err(|err| {
            debug!(error = %err, bytes = data.len(), "rejecting triangle mesh");
            err
        })
}

fn write_count(buf: &mut Vec<u8>, count: usize) -> Result<(), CodecError> {
    let count32 = u32::try_from(count).map_err(|_| CodecError::CountOverflow { count })?;
    put_u32(buf, count32);
    Ok(())
}

fn write_points<T: CoordType>(buf: &mut Vec<u8>, points: &[Point<T>]) -> Result<(), CodecError> {
    write_count(buf, points.len())?;
    for (index, p) in points.iter().enumerate() {
        let (x, y) = match (narrow(p.x()), narrow(p.y())) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(CodecError::UnrepresentableCoordinate { index }),
        };
        put_f32(buf, x);
        put_f32(buf, y);
    }
    Ok(())
}

#[inline]
fn put_u32(buf: &mut Vec<u8>, v: u32) {
    let mut bytes = [0; 4];
    LittleEndian::write_u32(&mut bytes, v);
    buf.extend_from_slice(&bytes);
}

#[inline]
fn put_f32(buf: &mut Vec<u8>, v: f32) {
    let mut bytes = [0; 4];
    LittleEndian::write_f32(&mut bytes, v);
    buf.extend_from_slice(&bytes);
}

// Finite values beyond the f32 range would otherwise go out as infinities.
#[inline]
fn narrow<T: CoordType>(v: T) -> Option<f32> {
    let narrowed = v.to_f32()?;
    if v.is_finite() && !narrowed.is_finite() {
        None
    } else {
        Some(narrowed)
    }
}

// Cursor over the whole payload; offsets in errors are relative to its start.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn count(&mut self) -> Result<usize, CodecError> {
        let expected = self.pos + COUNT_SIZE;
        if self.data.len() < expected {
            return Err(CodecError::TruncatedHeader {
                expected,
                actual: self.data.len(),
            });
        }
        let count = LittleEndian::read_u32(&self.data[self.pos..expected]);
        self.pos = expected;
        Ok(count as usize)
    }

    fn body(&mut self, count: usize, size: usize) -> Result<&'a [u8], CodecError> {
        let end = count
            .checked_mul(size)
            .and_then(|len| len.checked_add(self.pos));
        match end {
            Some(end) if end <= self.data.len() => {
                let body = &self.data[self.pos..end];
                self.pos = end;
                Ok(body)
            }
            _ => Err(CodecError::TruncatedBody {
                expected: end.unwrap_or(usize::MAX),
                actual: self.data.len(),
            }),
        }
    }

    fn points<T: CoordType>(&mut self) -> Result<Vec<Point<T>>, CodecError> {
        let count = self.count()?;
        let body = self.body(count, POINT_SIZE)?;

        Ok(body
            .chunks_exact(POINT_SIZE)
            .map(|chunk| {
                let x = LittleEndian::read_f32(&chunk[..4]);
                let y = LittleEndian::read_f32(&chunk[4..]);
                Point::new(promote(x), promote(y))
            })
            .collect())
    }

    fn triangles(&mut self, len: usize) -> Result<Vec<Triangle>, CodecError> {
        let count = self.count()?;
        let body = self.body(count, TRIANGLE_SIZE)?;

        let mut triangles = Vec::with_capacity(count);
        for chunk in body.chunks_exact(TRIANGLE_SIZE) {
            let mut v = [0usize; 3];
            for (slot, field) in v.iter_mut().zip(chunk.chunks_exact(4)) {
                let index = LittleEndian::read_u32(field) as usize;
                if index >= len {
                    return Err(CodecError::IndexOutOfRange { index, len });
                }
                *slot = index;
            }
            triangles.push(Triangle(v[0], v[1], v[2]));
        }
        Ok(triangles)
    }
}

#[inline]
fn promote<T: CoordType>(v: f32) -> T {
    <T as NumCast>::from(v).unwrap_or_else(T::nan)
}
