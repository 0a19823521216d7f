use std::f64::consts::PI;

use crate::math::Point2;

/// Half-angles below this are treated as a hairpin (the two edges leave the
/// vertex in the same direction) and the vertex is not displaced.
const DEGENERATE_HALF_ANGLE: f64 = 1e-7;

/// Offsets a single hull vertex inward by `radius` along the bisector of its
/// two adjacent edges.
///
/// The returned point lies at distance `radius` from both edge lines, i.e.
/// `radius / sin(alpha)` from `vertex`, where `alpha` is half the angle
/// between the edges.
///
/// The bisector ray is found from the polar angles of the two edge vectors:
/// starting from the ray that is reached first when sweeping
/// counter-clockwise, the bisector is `alpha` further round. This is only
/// meaningful for locally convex (hull-ordered) input.
///
/// Degenerate input (a zero-length edge, or edges pointing the same way)
/// leaves the vertex where it is.
#[must_use]
pub fn offset_vertex(prev: &Point2, vertex: &Point2, next: &Point2, radius: f64) -> Point2 {
    let v1 = prev - vertex;
    let v2 = next - vertex;
    if v1.norm_squared() <= 0.0 || v2.norm_squared() <= 0.0 {
        return *vertex;
    }

    // Polar angles in (-pi, pi]: 0 along +x, positive above the x axis.
    let q1 = v1.y.atan2(v1.x);
    let q2 = v2.y.atan2(v2.x);
    let alpha = 0.5 * v1.angle(&v2);

    let theta = if q1 * q2 >= 0.0 {
        // Both rays on the same side of the x axis.
        q1.min(q2)
    } else if q1.abs() + q2.abs() > PI {
        // Opening towards -x: the upper ray comes first.
        if q1 >= 0.0 {
            q1
        } else {
            q2
        }
    } else if q1 <= 0.0 {
        // Opening towards +x: the lower ray comes first.
        q1
    } else {
        q2
    };

    if alpha < DEGENERATE_HALF_ANGLE {
        return *vertex;
    }

    let reach = radius / alpha.sin();
    let direction = alpha + theta;
    Point2::new(
        vertex.x + reach * direction.cos(),
        vertex.y + reach * direction.sin(),
    )
}

/// Offsets every vertex of a hull-ordered polygon, using its cyclic
/// neighbours. Returns one point per input vertex, in the same order.
#[must_use]
pub fn offset_facet(hull: &[Point2], radius: f64) -> Vec<Point2> {
    let n = hull.len();
    (0..n)
        .map(|i| offset_vertex(&hull[(i + n - 1) % n], &hull[i], &hull[(i + 1) % n], radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn assert_point_near(a: &Point2, b: &Point2, msg: &str) {
        assert!(
            (a - b).norm() < 1e-9,
            "{msg}: expected ({}, {}), got ({}, {})",
            b.x,
            b.y,
            a.x,
            a.y
        );
    }

    #[test]
    fn square_corners_move_diagonally() {
        let square = vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)];
        let offset = offset_facet(&square, 4.0);
        assert_point_near(&offset[0], &p(4.0, 4.0), "bottom left");
        assert_point_near(&offset[1], &p(6.0, 4.0), "bottom right");
        assert_point_near(&offset[2], &p(6.0, 6.0), "top right");
        assert_point_near(&offset[3], &p(4.0, 6.0), "top left");
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let ccw = vec![p(0.0, 0.0), p(7.0, 1.0), p(5.0, 6.0), p(-1.0, 4.0)];
        let mut cw = ccw.clone();
        cw.reverse();
        let a = offset_facet(&ccw, 0.5);
        let mut b = offset_facet(&cw, 0.5);
        b.reverse();
        for (x, y) in a.iter().zip(&b) {
            assert_point_near(x, y, "reversed hull");
        }
    }

    #[test]
    fn apex_pointing_up() {
        // Both edge rays point below the x axis.
        let out = offset_vertex(&p(-5.0, 0.0), &p(0.0, 10.0), &p(5.0, 0.0), 1.0);
        assert!(out.x.abs() < 1e-12);
        assert!(out.y < 10.0);
    }

    #[test]
    fn apex_pointing_right() {
        // Rays straddle the -x axis.
        let out = offset_vertex(&p(0.0, 5.0), &p(10.0, 0.0), &p(0.0, -5.0), 1.0);
        assert!(out.y.abs() < 1e-12);
        assert!(out.x < 10.0);
    }

    #[test]
    fn apex_pointing_left() {
        // Rays straddle the +x axis.
        let out = offset_vertex(&p(10.0, 5.0), &p(0.0, 0.0), &p(10.0, -5.0), 1.0);
        assert!(out.y.abs() < 1e-12);
        assert!(out.x > 0.0);
    }

    #[test]
    fn offset_is_radius_from_both_edges() {
        let (a, b, c) = (p(0.0, 0.0), p(6.0, 1.0), p(2.0, 5.0));
        let out = offset_vertex(&c, &a, &b, 0.7);
        let dist_to_line = |s: &Point2, e: &Point2| {
            let d = e - s;
            let w = out - s;
            (d.x * w.y - d.y * w.x).abs() / d.norm()
        };
        assert_relative_eq!(dist_to_line(&a, &b), 0.7, epsilon = 1e-12);
        assert_relative_eq!(dist_to_line(&a, &c), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn equilateral_offset_reaches_twice_the_radius() {
        let h = 3.0_f64.sqrt() * 5.0;
        let tri = vec![p(0.0, 0.0), p(10.0, 0.0), p(5.0, h)];
        let offset = offset_facet(&tri, 1.0);
        for (v, o) in tri.iter().zip(&offset) {
            assert_relative_eq!((o - v).norm(), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn degenerate_neighbours_leave_vertex_in_place() {
        let v = p(1.0, 1.0);
        assert_eq!(offset_vertex(&v, &v, &p(3.0, 1.0), 1.0), v);
        assert_eq!(offset_vertex(&p(2.0, 1.0), &v, &p(3.0, 1.0), 1.0), v);
    }
}
