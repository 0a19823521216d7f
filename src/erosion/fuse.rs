use crate::math::polygon_2d::{dist_sq, max_span_2d};
use crate::math::Point2;

/// Merges points lying within `tolerance` of each other.
///
/// Single greedy pass in input order: each not-yet-taken point starts a
/// cluster and absorbs every later untaken point within `tolerance` of it.
/// Each cluster is replaced by its centroid, so the output keeps the order of
/// the cluster seeds.
#[must_use]
pub fn fuse(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    let tol_sq = tolerance * tolerance;
    let n = points.len();
    let mut taken = vec![false; n];
    let mut fused = Vec::with_capacity(n);

    for i in 0..n {
        if taken[i] {
            continue;
        }
        taken[i] = true;
        let mut sum = points[i].coords;
        let mut count = 1.0;
        for j in (i + 1)..n {
            if !taken[j] && dist_sq(&points[i], &points[j]) < tol_sq {
                sum += points[j].coords;
                count += 1.0;
                taken[j] = true;
            }
        }
        fused.push(Point2::from(sum / count));
    }
    fused
}

/// Fuses points lying within `fraction` of the larger span of the set.
#[must_use]
pub fn fuse_vertices(points: &[Point2], fraction: f64) -> Vec<Point2> {
    fuse(points, fraction * max_span_2d(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn close_pair_becomes_centroid() {
        let pts = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.2, 0.2), p(0.0, 10.0)];
        let fused = fuse(&pts, 0.5);
        assert_eq!(fused.len(), 3);
        assert!((fused[1] - p(10.1, 0.1)).norm() < TOLERANCE);
        assert_eq!(fused[2], p(0.0, 10.0));
    }

    #[test]
    fn first_seen_point_anchors_the_cluster() {
        // b is within reach of a, c only within reach of b: c stays separate.
        let pts = vec![p(0.0, 0.0), p(0.8, 0.0), p(1.6, 0.0)];
        let fused = fuse(&pts, 1.0);
        assert_eq!(fused.len(), 2);
        assert!((fused[0] - p(0.4, 0.0)).norm() < TOLERANCE);
        assert_eq!(fused[1], p(1.6, 0.0));
    }

    #[test]
    fn zero_tolerance_keeps_everything() {
        let pts = vec![p(0.0, 0.0), p(0.0, 0.0), p(1.0, 1.0)];
        assert_eq!(fuse(&pts, 0.0).len(), 3);
    }

    #[test]
    fn fraction_scales_with_larger_span() {
        // Span is 20 along x, so 5% gives a reach of 1.
        let pts = vec![p(0.0, 0.0), p(0.9, 0.0), p(20.0, 0.0), p(20.0, 2.0)];
        let fused = fuse_vertices(&pts, 0.05);
        assert_eq!(fused.len(), 3);
        let fused = fuse_vertices(&pts, 0.11);
        assert_eq!(fused.len(), 2);
    }
}
