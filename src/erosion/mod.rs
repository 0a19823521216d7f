pub mod fuse;
pub mod offset;
pub mod overlap;
pub mod resolve;

use tracing::debug;

use crate::error::{ErosionError, OperationError, Result};
use crate::math::convex_hull_2d::convex_hull_2d;
use crate::math::polygon_2d::{max_span_2d, polygon_area, polygon_perimeter};
use crate::math::projection::{PlaneProjection, ReferenceAxis};
use crate::math::{Point2, Point3, Vector3};

use self::fuse::fuse_vertices;
use self::resolve::{ResolutionRound, RoundVerdict};

/// Relative growth of the hull area tolerated before an offset point counts
/// as escaping the original facet.
const CONTAINMENT_SLACK: f64 = 1e-9;

/// Parameters controlling facet erosion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErosionParams {
    /// Radius of the fibres eroding each facet.
    pub fibre_radius: f64,
    /// Maximum number of overlap-resolution rounds before giving up and
    /// using the last offsets.
    pub max_iterations: usize,
    /// Fusion tolerance added per unresolved round, as a fraction of the
    /// facet span. Round `k` fuses within `k * fusion_step`.
    pub fusion_step: f64,
    /// Axis facets are rotated onto before flattening.
    pub reference_axis: ReferenceAxis,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            fibre_radius: 3e-6,
            max_iterations: 10,
            fusion_step: 0.05,
            reference_axis: ReferenceAxis::Z,
        }
    }
}

impl ErosionParams {
    /// Default parameters with the given fibre radius.
    #[must_use]
    pub fn new(fibre_radius: f64) -> Self {
        Self {
            fibre_radius,
            ..Self::default()
        }
    }

    /// Sets the resolution round limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the per-round fusion tolerance step.
    #[must_use]
    pub fn with_fusion_step(mut self, fusion_step: f64) -> Self {
        self.fusion_step = fusion_step;
        self
    }

    /// Sets the projection reference axis.
    #[must_use]
    pub fn with_reference_axis(mut self, reference_axis: ReferenceAxis) -> Self {
        self.reference_axis = reference_axis;
        self
    }

    /// Checks that the parameters describe a usable erosion.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a negative or non-finite
    /// radius, a zero round limit, or a non-positive fusion step.
    pub fn validate(&self) -> Result<()> {
        if !self.fibre_radius.is_finite() || self.fibre_radius < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "fibre radius must be finite and non-negative, got {}",
                self.fibre_radius
            ))
            .into());
        }
        if self.max_iterations == 0 {
            return Err(OperationError::InvalidInput(
                "at least one resolution round is required".to_owned(),
            )
            .into());
        }
        if !self.fusion_step.is_finite() || self.fusion_step <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "fusion step must be positive, got {}",
                self.fusion_step
            ))
            .into());
        }
        Ok(())
    }
}

/// A facet successfully eroded by the fibre radius.
#[derive(Debug, Clone, PartialEq)]
pub struct ErodedFacet {
    /// Area of the eroded polygon.
    pub area: f64,
    /// Perimeter of the eroded polygon.
    pub perimeter: f64,
    /// Eroded polygon in hull order, in the facet's original 3D frame.
    pub vertices: Vec<Point3>,
}

/// Outcome of eroding one facet.
pub type FacetOutcome = std::result::Result<ErodedFacet, ErosionError>;

/// Erodes a planar facet inward by a fibre radius.
///
/// # Algorithm
///
/// 1. Rotate the facet so `normal` lies along the reference axis, flatten it
///    and take its 2D convex hull.
/// 2. Reject hulls with fewer than 3 vertices, and facets whose larger span
///    is under twice the radius.
/// 3. Offset every hull vertex along its bisector and test the offsets for
///    overlap. Overlapped runs are collapsed onto the meeting point of their
///    outer edges and the reduced set is offset again. Rounds that stay
///    unresolved fuse nearby vertices with a growing tolerance; after
///    `max_iterations` rounds the last offsets are used as they are.
/// 4. Reject offsets that reach outside the original hull, measure the
///    eroded polygon and lift it back into 3D.
///
/// The facet normal is normally the vector between the two pore centres. A
/// zero-length normal falls back to the plane fitted through the vertices.
#[derive(Debug)]
pub struct FacetErosion<'a> {
    vertices: &'a [Point3],
    normal: Vector3,
    params: ErosionParams,
}

impl<'a> FacetErosion<'a> {
    /// Creates a new facet erosion operation.
    #[must_use]
    pub fn new(vertices: &'a [Point3], normal: Vector3, params: ErosionParams) -> Self {
        Self {
            vertices,
            normal,
            params,
        }
    }

    /// Executes the erosion.
    ///
    /// # Errors
    ///
    /// Every failure is an [`ErosionError`] classifying why the facet has no
    /// eroded area.
    pub fn execute(&self) -> FacetOutcome {
        if self.vertices.len() < 3 {
            return Err(ErosionError::TooFewVertices);
        }
        let projection = self.projection()?;
        let flat = projection.project(self.vertices);

        let hull = convex_hull_2d(&flat.points).map_err(|e| {
            debug!(error = %e, "facet hull is degenerate");
            ErosionError::TooFewVertices
        })?;
        if hull.len() < 3 {
            return Err(ErosionError::TooFewVertices);
        }
        let radius = self.params.fibre_radius;
        if max_span_2d(&flat.points) < 2.0 * radius {
            return Err(ErosionError::FacetTooSmall);
        }

        let offsets = self.resolve(hull.clone())?;
        let eroded = contain(&hull, &offsets)?;

        Ok(ErodedFacet {
            area: polygon_area(&eroded),
            perimeter: polygon_perimeter(&eroded),
            vertices: projection.unproject(&eroded, flat.depth()),
        })
    }

    fn projection(&self) -> std::result::Result<PlaneProjection, ErosionError> {
        PlaneProjection::for_facet(self.vertices, &self.normal, self.params.reference_axis)
            .map_err(|e| {
                debug!(error = %e, "facet has no usable plane");
                ErosionError::TooFewVertices
            })
    }

    /// Offsets the hull, resolving overlaps, and returns the final offset
    /// points.
    fn resolve(&self, hull: Vec<Point2>) -> std::result::Result<Vec<Point2>, ErosionError> {
        let radius = self.params.fibre_radius;
        let mut round = ResolutionRound::evaluate(hull, radius);
        match round.verdict {
            RoundVerdict::Converged => return Ok(round.offsets),
            RoundVerdict::Occluded => return Err(ErosionError::FullyOccluded),
            RoundVerdict::Collapsed => return Err(ErosionError::TooFewVertices),
            RoundVerdict::Unresolved => {}
        }

        let mut count = 0;
        loop {
            let next = round.next(radius);
            match next.verdict {
                RoundVerdict::Converged => return Ok(next.offsets),
                RoundVerdict::Occluded => return Err(ErosionError::FullyOccluded),
                RoundVerdict::Collapsed => return Err(ErosionError::ResolutionFailed),
                RoundVerdict::Unresolved => {}
            }

            count += 1;
            #[allow(clippy::cast_precision_loss)]
            let fraction = self.params.fusion_step * count as f64;
            debug!(round = count, fraction, "overlaps remain, fusing vertices");
            round = ResolutionRound::evaluate(fuse_vertices(&next.vertices, fraction), radius);
            match round.verdict {
                RoundVerdict::Converged => return Ok(round.offsets),
                RoundVerdict::Collapsed => return Err(ErosionError::ResolutionFailed),
                RoundVerdict::Occluded | RoundVerdict::Unresolved => {}
            }

            if count >= self.params.max_iterations {
                debug!(rounds = count, "overlap resolution did not converge");
                return Ok(round.offsets);
            }
        }
    }
}

/// Checks the offsets stay inside the original hull and returns the eroded
/// polygon in hull order.
fn contain(hull: &[Point2], offsets: &[Point2]) -> std::result::Result<Vec<Point2>, ErosionError> {
    if offsets.len() < 3 {
        return Err(ErosionError::ResolutionFailed);
    }
    let original_area = polygon_area(hull);

    let mut all_points = hull.to_vec();
    all_points.extend_from_slice(offsets);
    let combined = convex_hull_2d(&all_points).map_err(|e| {
        debug!(error = %e, "combined hull failed");
        ErosionError::ContainmentExceeded
    })?;
    if polygon_area(&combined) > original_area * (1.0 + CONTAINMENT_SLACK) {
        return Err(ErosionError::OutsideHull);
    }

    convex_hull_2d(offsets).map_err(|e| {
        debug!(error = %e, "eroded polygon is degenerate");
        ErosionError::ContainmentExceeded
    })
}
