#![allow(dead_code)]

use std::collections::HashSet;
use std::fs::File;

use geo_types::{point, Point};
use num_traits::Float;
use triangulator::{
    circumcircle, distance, triangulate, CoordType, Triangle, Triangulation, TriangulationError,
};

/// Triangulates `points` and checks the result: valid distinct indices, no
/// repeated triangle, no overlap beyond the convex hull and an empty
/// circumcircle for every triangle.
pub fn validate<T>(points: &[Point<T>]) -> Triangulation<T>
where
    T: CoordType,
{
    let triangulation = triangulate(points).unwrap();
    let n = points.len();

    let mut seen = HashSet::new();
    for t in &triangulation {
        assert!(
            t.vertices().iter().all(|&v| v < n),
            "Index out of range in {:?}",
            t
        );
        let s = t.sorted();
        assert!(s[0] != s[1] && s[1] != s[2], "Repeated vertex in {:?}", t);
        assert!(seen.insert(s), "Duplicate triangle {:?}", t);
    }

    let points = to_f64(points);

    let hull_area = polygon_area(&convex_hull(&points));
    let triangles_area = sum(&triangulation
        .iter()
        .map(|t| triangle_area(&points, t))
        .collect::<Vec<_>>());
    if !triangulation.is_empty() {
        assert!(
            triangles_area <= hull_area * (1. + 1e-9),
            "Triangles overlap: area {} exceeds hull area {}",
            triangles_area,
            hull_area
        );
    }

    let tolerance = T::epsilon().sqrt().to_f64().unwrap();
    for t in &triangulation {
        let circle = match circumcircle(points[t.0], points[t.1], points[t.2]) {
            Some(circle) => circle,
            None => panic!("Flat triangle {:?}", t),
        };
        for (j, p) in points.iter().enumerate() {
            if t.contains_vertex(j) {
                continue;
            }
            assert!(
                distance(*p, circle.center) >= circle.radius * (1. - tolerance),
                "Point {} lies inside the circumcircle of {:?}",
                j,
                t
            );
        }
    }

    triangulation
}

pub fn scattered<T>()
where
    T: CoordType,
{
    let triangulation = validate::<T>(&load_fixture("tests/fixtures/scattered.json"));
    assert_eq!(triangulation.len(), 37);
}

pub fn wheel<T>()
where
    T: CoordType,
{
    let points = load_fixture::<T>("tests/fixtures/wheel.json");
    let triangulation = validate::<T>(&points);

    // every rim point is cocircular, so each triangle is a spoke pair plus the hub
    assert_eq!(triangulation.len(), 8);
    assert!(triangulation.iter().all(|t| t.contains_vertex(8)));
}

pub fn single_triangle<T>()
where
    T: CoordType,
{
    let points: Vec<Point<T>> = vec![
        point!(x: T::zero(), y: T::zero()),
        point!(x: T::one(), y: T::zero()),
        point!(x: T::zero(), y: T::one()),
    ];
    let triangulation = validate(&points);

    assert_eq!(triangulation.len(), 1);
    assert_eq!(triangulation.triangles[0].sorted(), [0, 1, 2]);
}

pub fn unit_square<T>()
where
    T: CoordType,
{
    let points: Vec<Point<T>> = [(0., 0.), (1., 0.), (1., 1.), (0., 1.)]
        .iter()
        .map(|&(x, y)| point!(x: T::from(x).unwrap(), y: T::from(y).unwrap()))
        .collect();
    let triangulation = validate(&points);

    assert_eq!(
        triangulation.triangles,
        vec![Triangle(1, 0, 2), Triangle(2, 0, 3)]
    );

    let points = to_f64(&points);
    let area: f64 = triangulation.iter().map(|t| triangle_area(&points, t)).sum();
    assert!((area - 1.).abs() < 1e-12, "Square area is {}", area);

    let edges = |t: &Triangle| -> HashSet<[usize; 2]> {
        t.edges()
            .iter()
            .map(|&(a, b)| if a < b { [a, b] } else { [b, a] })
            .collect()
    };
    let shared = edges(&triangulation.triangles[0])
        .intersection(&edges(&triangulation.triangles[1]))
        .count();
    assert_eq!(shared, 1, "Expected the two halves to share one diagonal");
}

pub fn bad_input<T>()
where
    T: CoordType,
{
    let mut points = vec![];
    assert!(
        triangulate::<T>(&points).unwrap().is_empty(),
        "Expected no triangles (0 point)"
    );

    points.push(point!(x: T::zero(), y: T::zero()));
    assert!(
        triangulate(&points).unwrap().is_empty(),
        "Expected no triangles (1 point)"
    );

    points.push(point!(x: T::one(), y: T::zero()));
    assert!(
        triangulate(&points).unwrap().is_empty(),
        "Expected no triangles (2 points)"
    );

    points.push(point!(x: T::from(2.).unwrap(), y: T::zero()));
    assert!(
        triangulate(&points).unwrap().is_empty(),
        "Expected no triangles (3 collinear points)"
    );

    points.push(point!(x: T::one(), y: T::one()));
    let triangulation = validate(&points);
    assert_eq!(
        triangulation.triangles,
        vec![Triangle(1, 0, 3), Triangle(2, 1, 3)]
    );
}

pub fn unordered_collinear_points_input<T>()
where
    T: CoordType,
{
    let points: Vec<Point<T>> = [10, 2, 4, 1, 0, 3, 6, 8, 5, 7, 9]
        .iter()
        .map(|i| T::from(*i).unwrap())
        .map(|y| point!(x: T::zero(), y: y))
        .collect();
    assert!(
        triangulate(&points).unwrap().is_empty(),
        "Expected no triangles (vertical collinear points)"
    );

    let points: Vec<Point<T>> = (0..10)
        .map(|i| T::from(i).unwrap())
        .map(|v| point!(x: v, y: v + v))
        .collect();
    assert!(
        triangulate(&points).unwrap().is_empty(),
        "Expected no triangles (diagonal collinear points)"
    );
}

pub fn coincident_points<T>()
where
    T: CoordType,
{
    let points: Vec<Point<T>> = vec![
        point!(x: T::zero(), y: T::zero()),
        point!(x: T::zero(), y: T::zero()),
        point!(x: T::one(), y: T::one()),
    ];
    assert!(triangulate(&points).unwrap().is_empty());

    let mut points = load_fixture::<T>("tests/fixtures/scattered.json");
    points.push(points[5]);
    assert!(
        triangulate(&points).unwrap().is_empty(),
        "Expected no triangles (repeated point)"
    );
}

pub fn non_finite<T>()
where
    T: CoordType,
{
    let mut points = load_fixture::<T>("tests/fixtures/scattered.json");
    points[2] = point!(x: T::nan(), y: T::one());
    assert_eq!(
        triangulate(&points).unwrap_err(),
        TriangulationError::NonFiniteCoordinate { index: 2 }
    );

    points[2] = point!(x: T::one(), y: T::zero());
    points[7] = point!(x: T::zero(), y: T::neg_infinity());
    assert_eq!(
        triangulate(&points).unwrap_err(),
        TriangulationError::NonFiniteCoordinate { index: 7 }
    );
}

pub fn deterministic<T>()
where
    T: CoordType,
{
    let points = load_fixture::<T>("tests/fixtures/scattered.json");
    let first = triangulate(&points).unwrap();
    let second = triangulate(&points).unwrap();
    assert_eq!(first, second);
}

pub fn input_untouched<T>()
where
    T: CoordType,
{
    let points = load_fixture::<T>("tests/fixtures/scattered.json");
    let copy = points.clone();
    triangulate(&points).unwrap();
    assert_eq!(points, copy);
}

pub fn robustness<T>()
where
    T: CoordType,
{
    let points = load_fixture::<T>("tests/fixtures/scattered.json");

    for &scale in [1e-2, 1e2, 1e6].iter() {
        let scaled = scale_points(&points, T::from(scale).unwrap());
        let triangulation = validate::<T>(&scaled);
        assert_eq!(triangulation.len(), 37, "Unexpected result at scale {}", scale);
    }
}

pub fn grid<T>(columns: usize, rows: usize) -> Vec<Point<T>>
where
    T: CoordType,
{
    (0..columns * rows)
        .map(|i| {
            point!(
                x: T::from(i % columns).unwrap(),
                y: T::from(i / columns).unwrap()
            )
        })
        .collect()
}

pub fn triangle_area(points: &[Point<f64>], t: &Triangle) -> f64 {
    points[t.0].cross_prod(points[t.1], points[t.2]).abs() / 2.
}

pub fn to_f64<T>(points: &[Point<T>]) -> Vec<Point<f64>>
where
    T: CoordType,
{
    points
        .iter()
        .map(|p| point!(x: p.x().to_f64().unwrap(), y: p.y().to_f64().unwrap()))
        .collect()
}

fn convex_hull(points: &[Point<f64>]) -> Vec<Point<f64>> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x()
            .partial_cmp(&b.x())
            .unwrap()
            .then(a.y().partial_cmp(&b.y()).unwrap())
    });

    let mut hull: Vec<Point<f64>> = Vec::new();
    for pass in 0..2 {
        let start = hull.len();
        for &p in sorted.iter() {
            while hull.len() >= start + 2
                && hull[hull.len() - 2].cross_prod(hull[hull.len() - 1], p) <= 0.
            {
                hull.pop();
            }
            hull.push(p);
        }
        hull.pop();
        if pass == 0 {
            sorted.reverse();
        }
    }
    hull
}

fn polygon_area(polygon: &[Point<f64>]) -> f64 {
    let mut areas = Vec::with_capacity(polygon.len());
    let mut j = polygon.len().wrapping_sub(1);
    for (i, p) in polygon.iter().enumerate() {
        let p0 = polygon[j];
        areas.push((p.x() - p0.x()) * (p.y() + p0.y()));
        j = i;
    }
    if areas.is_empty() {
        0.
    } else {
        sum(&areas).abs() / 2.
    }
}

fn scale_points<T>(points: &[Point<T>], scale: T) -> Vec<Point<T>>
where
    T: CoordType,
{
    points
        .iter()
        .map(|p| point!(x: p.x() * scale, y: p.y() * scale))
        .collect()
}

pub fn load_fixture<T>(path: &str) -> Vec<Point<T>>
where
    T: CoordType,
{
    let file = File::open(path).unwrap();
    let u: Vec<(f64, f64)> = serde_json::from_reader(file).unwrap();
    u.iter()
        .map(|p| {
            let x = T::from(p.0);
            assert!(
                x.is_some(),
                "Unable to parse {} into {}",
                p.0,
                std::any::type_name::<T>()
            );

            let y = T::from(p.1);
            assert!(
                y.is_some(),
                "Unable to parse {} into {}",
                p.1,
                std::any::type_name::<T>()
            );
            point!(x: x.unwrap(), y: y.unwrap())
        })
        .collect()
}

// Kahan and Babuska summation, Neumaier variant; accumulates less FP error
fn sum(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.;
    }
    let mut sum = x[0];
    let mut err = 0.;
    for &k in x[1..].iter() {
        let m = sum + k;
        err += if sum.abs() >= k.abs() {
            sum - m + k
        } else {
            k - m + sum
        };
        sum = m;
    }
    sum + err
}
