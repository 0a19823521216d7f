use spade::{DelaunayTriangulation, HasPosition, InsertionError, Point2 as SpadePoint2, Triangulation};

use super::polygon_2d::{max_span_2d, signed_area_2d};
use super::Point2;
use crate::error::GeometryError;

/// Hull vertices whose turn angle has a sine below this are dropped as
/// collinear.
const COLLINEAR_SINE: f64 = 1e-9;

/// Triangulation vertex remembering which input point it came from.
#[derive(Debug, Clone, Copy)]
struct HullVertex {
    position: SpadePoint2<f64>,
    index: usize,
}

impl HasPosition for HullVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint2<f64> {
        self.position
    }
}

/// Computes the convex hull of a 2D point set and returns the indices of the
/// hull vertices in counter-clockwise hull order.
///
/// Duplicate points collapse to one hull vertex and vertices lying on a hull
/// edge (collinear with their neighbours) are dropped, so consecutive returned
/// points always turn strictly left.
///
/// # Errors
///
/// - `GeometryError::HullFailed` if a point cannot be triangulated (non-finite
///   or out-of-range coordinates)
/// - `GeometryError::Degenerate` if the points are collinear or coincident
pub fn convex_hull_indices(points: &[Point2]) -> Result<Vec<usize>, GeometryError> {
    let mut triangulation = DelaunayTriangulation::<HullVertex>::new();
    for (index, p) in points.iter().enumerate() {
        triangulation
            .insert(HullVertex {
                position: SpadePoint2::new(p.x, p.y),
                index,
            })
            .map_err(|e: InsertionError| {
                GeometryError::HullFailed(format!("cannot insert ({}, {}): {e}", p.x, p.y))
            })?;
    }

    if triangulation.num_inner_faces() == 0 {
        return Err(GeometryError::Degenerate(format!(
            "{} points are collinear or coincident",
            points.len()
        )));
    }

    let mut hull: Vec<usize> = triangulation
        .convex_hull()
        .map(|edge| edge.from().data().index)
        .collect();
    drop_collinear(points, &mut hull);

    if hull.len() < 3 {
        return Err(GeometryError::Degenerate(
            "hull has fewer than 3 strictly convex vertices".to_owned(),
        ));
    }

    let ordered: Vec<Point2> = hull.iter().map(|&i| points[i]).collect();
    if signed_area_2d(&ordered) < 0.0 {
        hull.reverse();
    }
    Ok(hull)
}

/// Computes the convex hull of a 2D point set, returning the hull vertices in
/// counter-clockwise hull order.
///
/// # Errors
///
/// See [`convex_hull_indices`].
pub fn convex_hull_2d(points: &[Point2]) -> Result<Vec<Point2>, GeometryError> {
    Ok(convex_hull_indices(points)?
        .into_iter()
        .map(|i| points[i])
        .collect())
}

/// Removes hull vertices that sit on the segment between their neighbours.
fn drop_collinear(points: &[Point2], hull: &mut Vec<usize>) {
    let ordered: Vec<Point2> = hull.iter().map(|&i| points[i]).collect();
    if max_span_2d(&ordered) <= 0.0 {
        return;
    }
    loop {
        let n = hull.len();
        if n <= 3 {
            return;
        }
        let straight = (0..n).find(|&i| {
            let prev = points[hull[(i + n - 1) % n]];
            let here = points[hull[i]];
            let next = points[hull[(i + 1) % n]];
            let a = here - prev;
            let b = next - here;
            let lengths = a.norm() * b.norm();
            lengths <= 0.0 || (a.x * b.y - a.y * b.x).abs() <= COLLINEAR_SINE * lengths
        });
        match straight {
            Some(i) => {
                hull.remove(i);
            }
            None => return,
        }
    }
}
