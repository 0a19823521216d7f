use tracing::{debug, warn};

use super::polygon_2d::max_span_2d;
use super::{Matrix3, Point2, Point3, Vector3, TOLERANCE};
use crate::error::GeometryError;

/// Out-of-plane standard deviation, relative to the facet span, above which a
/// projected facet is reported as non-planar.
pub const PLANARITY_TOLERANCE: f64 = 1e-3;

/// Coordinate axis that facet normals are rotated onto before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceAxis {
    /// Flatten onto `(y, z)`.
    X,
    /// Flatten onto `(x, z)`.
    Y,
    /// Flatten onto `(x, y)`.
    #[default]
    Z,
}

impl ReferenceAxis {
    /// Unit vector along the axis.
    #[must_use]
    pub fn unit(self) -> Vector3 {
        match self {
            Self::X => Vector3::x(),
            Self::Y => Vector3::y(),
            Self::Z => Vector3::z(),
        }
    }

    /// Splits a point into its in-plane coordinates and its coordinate along
    /// the axis.
    fn chop(self, p: &Point3) -> (Point2, f64) {
        match self {
            Self::X => (Point2::new(p.y, p.z), p.x),
            Self::Y => (Point2::new(p.x, p.z), p.y),
            Self::Z => (Point2::new(p.x, p.y), p.z),
        }
    }

    /// Inverse of [`Self::chop`].
    fn restore(self, p: &Point2, depth: f64) -> Point3 {
        match self {
            Self::X => Point3::new(depth, p.x, p.y),
            Self::Y => Point3::new(p.x, depth, p.y),
            Self::Z => Point3::new(p.x, p.y, depth),
        }
    }
}

/// Rotation taking a facet's normal onto a reference axis, so that the facet
/// can be handled as a 2D polygon.
///
/// When the normal is already parallel or antiparallel to the axis no
/// rotation is applied and the axis coordinate is simply dropped.
#[derive(Debug, Clone)]
pub struct PlaneProjection {
    rotation: Option<Matrix3>,
    axis: ReferenceAxis,
}

/// A facet flattened by a [`PlaneProjection`].
#[derive(Debug, Clone)]
pub struct ProjectedFacet {
    /// In-plane coordinates, same order as the input points.
    pub points: Vec<Point2>,
    /// Coordinate along the reference axis for each input point.
    pub depths: Vec<f64>,
}

impl ProjectedFacet {
    /// Mean out-of-plane coordinate, the facet's constant depth.
    #[must_use]
    pub fn depth(&self) -> f64 {
        if self.depths.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.depths.len() as f64;
        self.depths.iter().sum::<f64>() / n
    }

    /// Standard deviation of the out-of-plane coordinates. Near zero for a
    /// planar facet.
    #[must_use]
    pub fn depth_deviation(&self) -> f64 {
        if self.depths.is_empty() {
            return 0.0;
        }
        let mean = self.depth();
        #[allow(clippy::cast_precision_loss)]
        let n = self.depths.len() as f64;
        (self.depths.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt()
    }

    /// Whether the out-of-plane spread is small compared to the in-plane span.
    #[must_use]
    pub fn is_planar(&self) -> bool {
        self.depth_deviation() <= PLANARITY_TOLERANCE * max_span_2d(&self.points).max(TOLERANCE)
    }
}

impl PlaneProjection {
    /// Builds the projection that aligns `normal` with `axis`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if `normal` has zero length.
    pub fn new(normal: &Vector3, axis: ReferenceAxis) -> Result<Self, GeometryError> {
        let len = normal.norm();
        if len < TOLERANCE || !len.is_finite() {
            return Err(GeometryError::ZeroVector);
        }
        let normal = normal / len;
        let target = axis.unit();

        let rot_axis = normal.cross(&target);
        let sin = rot_axis.norm();
        if sin < TOLERANCE {
            return Ok(Self {
                rotation: None,
                axis,
            });
        }
        let angle = normal.dot(&target).clamp(-1.0, 1.0).acos();
        Ok(Self {
            rotation: Some(rotation_matrix(&(rot_axis / sin), angle)),
            axis,
        })
    }

    /// Builds the projection for a facet, falling back to the plane fitted
    /// through `points` when `normal` has zero length.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if `normal` has zero length and
    /// the points are collinear or coincident.
    pub fn for_facet(
        points: &[Point3],
        normal: &Vector3,
        axis: ReferenceAxis,
    ) -> Result<Self, GeometryError> {
        match Self::new(normal, axis) {
            Err(GeometryError::ZeroVector) => {
                debug!("zero-length facet normal, fitting a plane to the vertices");
                let fitted = fitted_normal(points).ok_or(GeometryError::ZeroVector)?;
                Self::new(&fitted, axis)
            }
            other => other,
        }
    }

    /// The reference axis of this projection.
    #[must_use]
    pub fn axis(&self) -> ReferenceAxis {
        self.axis
    }

    /// Whether a rotation is applied (`false` for axis-aligned normals).
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.rotation.is_some()
    }

    /// Rotates `points` into the reference frame and flattens them.
    ///
    /// Logs a warning if the flattened depths spread too far for a planar
    /// facet.
    #[must_use]
    pub fn project(&self, points: &[Point3]) -> ProjectedFacet {
        let (points, depths) = points
            .iter()
            .map(|p| {
                let rotated = match &self.rotation {
                    Some(m) => Point3::from(m * p.coords),
                    None => *p,
                };
                self.axis.chop(&rotated)
            })
            .unzip();
        let facet = ProjectedFacet { points, depths };
        if !facet.is_planar() {
            warn!(
                deviation = facet.depth_deviation(),
                "projected facet is not planar"
            );
        }
        facet
    }

    /// Lifts 2D points at a constant `depth` back into the original 3D frame.
    #[must_use]
    pub fn unproject(&self, points: &[Point2], depth: f64) -> Vec<Point3> {
        points
            .iter()
            .map(|p| {
                let lifted = self.axis.restore(p, depth);
                match &self.rotation {
                    // Rotations are orthogonal: the inverse is the transpose.
                    Some(m) => Point3::from(m.transpose() * lifted.coords),
                    None => lifted,
                }
            })
            .collect()
    }
}

/// Unit normal of the plane through an unordered set of coplanar points, or
/// `None` when the points are collinear or coincident.
///
/// Uses the widest triangle anchored at the first point: the farthest point
/// from it, then the point farthest off that chord.
#[must_use]
pub fn fitted_normal(points: &[Point3]) -> Option<Vector3> {
    let (origin, rest) = points.split_first()?;
    let far = rest
        .iter()
        .map(|p| p - origin)
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let normal = rest
        .iter()
        .map(|p| far.cross(&(p - origin)))
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    let len = normal.norm();
    (len > TOLERANCE * far.norm().max(TOLERANCE) && len.is_finite()).then(|| normal / len)
}

/// Builds a 3x3 rotation matrix around a unit axis by an angle (Rodrigues).
#[allow(clippy::many_single_char_names)]
#[rustfmt::skip]
fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix3 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    Matrix3::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,
    )
}
