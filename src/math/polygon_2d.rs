use super::Point2;

/// Computes the signed area of a closed 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area enclosed by an ordered point loop, independent of winding direction.
#[must_use]
pub fn polygon_area(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// Sum of the edge lengths of the closed loop through `points`.
#[must_use]
pub fn polygon_perimeter(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Extent of a point set along x and y: `(x_span, y_span)`.
#[must_use]
pub fn spans_2d(points: &[Point2]) -> (f64, f64) {
    let Some(first) = points.first() else {
        return (0.0, 0.0);
    };
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (first.x, first.x, first.y, first.y);
    for p in &points[1..] {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    (x_max - x_min, y_max - y_min)
}

/// Larger of the x and y spans of a point set.
#[must_use]
pub fn max_span_2d(points: &[Point2]) -> f64 {
    let (x_span, y_span) = spans_2d(points);
    x_span.max(y_span)
}

/// Squared Euclidean distance between two 2D points.
#[inline]
#[must_use]
pub fn dist_sq(a: &Point2, b: &Point2) -> f64 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::TOLERANCE;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert!((signed_area_2d(&square()) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert!((signed_area_2d(&pts) + 4.0).abs() < TOLERANCE);
        assert!((polygon_area(&pts) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(1.0, 1.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn perimeter_of_square() {
        assert!((polygon_perimeter(&square()) - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn measures_ignore_starting_index() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.5),
            Point2::new(5.0, 3.0),
            Point2::new(1.5, 4.0),
            Point2::new(-1.0, 2.0),
        ];
        let area = polygon_area(&pts);
        let perimeter = polygon_perimeter(&pts);
        for shift in 1..pts.len() {
            let mut rotated = pts.clone();
            rotated.rotate_left(shift);
            assert_relative_eq!(polygon_area(&rotated), area, epsilon = 1e-12);
            assert_relative_eq!(polygon_perimeter(&rotated), perimeter, epsilon = 1e-12);
        }
    }

    #[test]
    fn measures_ignore_rigid_motion() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 1.0),
            Point2::new(0.0, 2.0),
        ];
        let (s, c) = 0.7_f64.sin_cos();
        let moved: Vec<Point2> = pts
            .iter()
            .map(|p| Point2::new(c * p.x - s * p.y + 5.0, s * p.x + c * p.y - 3.0))
            .collect();
        assert_relative_eq!(polygon_area(&moved), polygon_area(&pts), epsilon = 1e-10);
        assert_relative_eq!(
            polygon_perimeter(&moved),
            polygon_perimeter(&pts),
            epsilon = 1e-10
        );
    }

    #[test]
    fn spans_pick_larger_axis() {
        let pts = vec![Point2::new(1.0, 5.0), Point2::new(4.0, 6.0), Point2::new(2.0, 5.5)];
        let (x_span, y_span) = spans_2d(&pts);
        assert!((x_span - 3.0).abs() < TOLERANCE);
        assert!((y_span - 1.0).abs() < TOLERANCE);
        assert!((max_span_2d(&pts) - 3.0).abs() < TOLERANCE);
        assert!(max_span_2d(&[]).abs() < TOLERANCE);
    }
}
