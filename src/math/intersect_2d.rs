use super::{Point2, TOLERANCE};
use crate::error::GeometryError;

/// An infinite 2D line in slope-intercept form.
///
/// Lines with no x extent cannot be written as `y = m x + c` and are kept as
/// `x = c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line2 {
    /// `y = slope * x + intercept`.
    Sloped { slope: f64, intercept: f64 },
    /// `x = x`.
    Vertical { x: f64 },
}

impl Line2 {
    /// The line through `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the two points coincide.
    #[allow(clippy::float_cmp)]
    pub fn through(a: &Point2, b: &Point2) -> Result<Self, GeometryError> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx == 0.0 {
            if dy == 0.0 {
                return Err(GeometryError::Degenerate(format!(
                    "line through coincident points ({}, {})",
                    a.x, a.y
                )));
            }
            return Ok(Self::Vertical { x: b.x });
        }
        let slope = dy / dx;
        Ok(Self::Sloped {
            slope,
            intercept: b.y - slope * b.x,
        })
    }

    /// Intersection point of two lines.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParallelLines` if the lines are parallel (equal
    /// slopes or both vertical), or `GeometryError::Degenerate` if the result
    /// is not finite.
    pub fn intersect(&self, other: &Self) -> Result<Point2, GeometryError> {
        let point = match (*self, *other) {
            (Self::Vertical { .. }, Self::Vertical { .. }) => {
                return Err(GeometryError::ParallelLines)
            }
            (Self::Vertical { x }, Self::Sloped { slope, intercept })
            | (Self::Sloped { slope, intercept }, Self::Vertical { x }) => {
                Point2::new(x, slope * x + intercept)
            }
            (
                Self::Sloped {
                    slope: m1,
                    intercept: c1,
                },
                Self::Sloped {
                    slope: m2,
                    intercept: c2,
                },
            ) => {
                let denom = m1 - m2;
                if denom.abs() <= TOLERANCE * m1.abs().max(m2.abs()).max(1.0) {
                    return Err(GeometryError::ParallelLines);
                }
                Point2::new((c2 - c1) / denom, (m1 * c2 - m2 * c1) / denom)
            }
        };
        if point.x.is_finite() && point.y.is_finite() {
            Ok(point)
        } else {
            Err(GeometryError::Degenerate(
                "line intersection is not finite".to_owned(),
            ))
        }
    }
}

/// Intersects the line through `a0`-`a1` with the line through `b0`-`b1`.
///
/// # Errors
///
/// Propagates the errors of [`Line2::through`] and [`Line2::intersect`].
pub fn chord_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Result<Point2, GeometryError> {
    let first = Line2::through(a0, a1)?;
    let second = Line2::through(b0, b1)?;
    first.intersect(&second)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn sloped_line_coefficients() {
        let line = Line2::through(&p(0.0, 1.0), &p(2.0, 5.0)).unwrap();
        match line {
            Line2::Sloped { slope, intercept } => {
                assert!((slope - 2.0).abs() < TOLERANCE);
                assert!((intercept - 1.0).abs() < TOLERANCE);
            }
            Line2::Vertical { .. } => panic!("expected sloped line"),
        }
    }

    #[test]
    fn vertical_line_keeps_x() {
        let line = Line2::through(&p(3.0, 0.0), &p(3.0, 7.0)).unwrap();
        assert_eq!(line, Line2::Vertical { x: 3.0 });
    }

    #[test]
    fn coincident_points_rejected() {
        assert!(Line2::through(&p(1.0, 1.0), &p(1.0, 1.0)).is_err());
    }

    #[test]
    fn crossing_lines() {
        let pt = chord_intersection(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)).unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE);
        assert!((pt.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn vertical_meets_horizontal() {
        let pt = chord_intersection(&p(10.0, 0.0), &p(10.0, 9.5), &p(9.5, 10.0), &p(0.0, 10.0)).unwrap();
        assert!((pt.x - 10.0).abs() < TOLERANCE);
        assert!((pt.y - 10.0).abs() < TOLERANCE);

        let swapped =
            chord_intersection(&p(9.5, 10.0), &p(0.0, 10.0), &p(10.0, 0.0), &p(10.0, 9.5)).unwrap();
        assert!((swapped.x - 10.0).abs() < TOLERANCE);
        assert!((swapped.y - 10.0).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_lines_are_an_error() {
        let err = chord_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(0.0, 1.0), &p(1.0, 2.0));
        assert!(matches!(err, Err(GeometryError::ParallelLines)));

        let err = chord_intersection(&p(0.0, 0.0), &p(0.0, 1.0), &p(2.0, 0.0), &p(2.0, 1.0));
        assert!(matches!(err, Err(GeometryError::ParallelLines)));
    }
}
