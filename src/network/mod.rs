pub mod pruning;
pub mod throats;

pub use pruning::OcclusionPruning;
pub use throats::{ErosionReport, ThroatErosion};

use crate::erosion::FacetOutcome;
use crate::error::{ErosionError, NetworkError, Result};
use crate::math::convex_hull_2d::convex_hull_indices;
use crate::math::projection::{PlaneProjection, ReferenceAxis};
use crate::math::{Point3, Vector3};

/// Per-throat erosion results, indexed like the network's throats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThroatGeometry {
    /// Eroded throat area (zero for occluded throats).
    pub area: Vec<f64>,
    /// Eroded throat perimeter (zero for occluded throats).
    pub perimeter: Vec<f64>,
    /// Throat length, the fibre radius the facets were eroded by.
    pub length: Vec<f64>,
    /// Vertices shared by the two pores of each throat.
    pub shared_vertices: Vec<Vec<Point3>>,
    /// Eroded facet vertices in hull order (empty for occluded throats).
    pub offset_vertices: Vec<Vec<Point3>>,
    /// Pore-to-pore vector of each throat.
    pub normals: Vec<Vector3>,
    /// Why each occluded throat failed to erode.
    pub errors: Vec<Option<ErosionError>>,
}

impl ThroatGeometry {
    /// Number of throats recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.area.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.area.is_empty()
    }

    /// Appends one throat's erosion outcome.
    pub fn push(&mut self, shared: Vec<Point3>, normal: Vector3, length: f64, outcome: FacetOutcome) {
        match outcome {
            Ok(facet) => {
                self.area.push(facet.area);
                self.perimeter.push(facet.perimeter);
                self.offset_vertices.push(facet.vertices);
                self.errors.push(None);
            }
            Err(e) => {
                self.area.push(0.0);
                self.perimeter.push(0.0);
                self.offset_vertices.push(Vec::new());
                self.errors.push(Some(e));
            }
        }
        self.length.push(length);
        self.shared_vertices.push(shared);
        self.normals.push(normal);
    }

    /// Error code of a throat: `0` when it eroded, otherwise
    /// [`ErosionError::code`].
    #[must_use]
    pub fn error_code(&self, throat: usize) -> u8 {
        self.errors
            .get(throat)
            .copied()
            .flatten()
            .map_or(0, ErosionError::code)
    }

    /// Keeps only the throats whose `keep` flag is set.
    fn retain(&mut self, keep: &[bool]) {
        fn retain_vec<T>(values: &mut Vec<T>, keep: &[bool]) {
            let mut flags = keep.iter();
            values.retain(|_| flags.next().copied().unwrap_or(true));
        }
        retain_vec(&mut self.area, keep);
        retain_vec(&mut self.perimeter, keep);
        retain_vec(&mut self.length, keep);
        retain_vec(&mut self.shared_vertices, keep);
        retain_vec(&mut self.offset_vertices, keep);
        retain_vec(&mut self.normals, keep);
        retain_vec(&mut self.errors, keep);
    }
}

impl FromIterator<(Vec<Point3>, Vector3, f64, FacetOutcome)> for ThroatGeometry {
    fn from_iter<I: IntoIterator<Item = (Vec<Point3>, Vector3, f64, FacetOutcome)>>(iter: I) -> Self {
        let mut geometry = Self::default();
        for (shared, normal, length, outcome) in iter {
            geometry.push(shared, normal, length, outcome);
        }
        geometry
    }
}

/// A pore network: pore centres, the Voronoi vertices bounding each pore, and
/// the throats connecting pairs of pores.
///
/// Throat data produced by [`ThroatErosion`] is stored alongside the
/// connectivity and trimmed with it.
#[derive(Debug, Clone)]
pub struct PoreNetwork {
    pore_coords: Vec<Point3>,
    pore_vertices: Vec<Vec<Point3>>,
    throat_conns: Vec<[usize; 2]>,
    throat_geometry: Option<ThroatGeometry>,
}

impl PoreNetwork {
    /// Creates a network from pore centres, per-pore vertex lists and throat
    /// connectivity.
    ///
    /// # Errors
    ///
    /// - `NetworkError::LengthMismatch` if there is not one vertex list per pore
    /// - `NetworkError::PoreOutOfRange` if a throat names a missing pore
    pub fn new(
        pore_coords: Vec<Point3>,
        pore_vertices: Vec<Vec<Point3>>,
        throat_conns: Vec<[usize; 2]>,
    ) -> Result<Self> {
        if pore_vertices.len() != pore_coords.len() {
            return Err(NetworkError::LengthMismatch {
                what: "pore vertex lists",
                expected: pore_coords.len(),
                found: pore_vertices.len(),
            }
            .into());
        }
        let count = pore_coords.len();
        for (throat, conn) in throat_conns.iter().enumerate() {
            if let Some(&pore) = conn.iter().find(|&&p| p >= count) {
                return Err(NetworkError::PoreOutOfRange {
                    throat,
                    pore,
                    count,
                }
                .into());
            }
        }
        Ok(Self {
            pore_coords,
            pore_vertices,
            throat_conns,
            throat_geometry: None,
        })
    }

    #[must_use]
    pub fn num_pores(&self) -> usize {
        self.pore_coords.len()
    }

    #[must_use]
    pub fn num_throats(&self) -> usize {
        self.throat_conns.len()
    }

    #[must_use]
    pub fn pore_coords(&self) -> &[Point3] {
        &self.pore_coords
    }

    #[must_use]
    pub fn pore_vertices(&self) -> &[Vec<Point3>] {
        &self.pore_vertices
    }

    #[must_use]
    pub fn throat_conns(&self) -> &[[usize; 2]] {
        &self.throat_conns
    }

    /// Erosion results, once [`ThroatErosion`] has run.
    #[must_use]
    pub fn throat_geometry(&self) -> Option<&ThroatGeometry> {
        self.throat_geometry.as_ref()
    }

    fn conn(&self, throat: usize) -> Result<[usize; 2]> {
        self.throat_conns.get(throat).copied().ok_or_else(|| {
            NetworkError::ThroatOutOfRange {
                index: throat,
                count: self.num_throats(),
            }
            .into()
        })
    }

    /// Vector from the second pore of a throat to the first.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::ThroatOutOfRange` for an unknown throat.
    pub fn throat_normal(&self, throat: usize) -> Result<Vector3> {
        let [a, b] = self.conn(throat)?;
        Ok(self.pore_coords[a] - self.pore_coords[b])
    }

    /// Vertices appearing (with identical coordinates) in both pores of a
    /// throat, in the order of the first pore's list.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::ThroatOutOfRange` for an unknown throat.
    pub fn shared_vertices(&self, throat: usize) -> Result<Vec<Point3>> {
        let [a, b] = self.conn(throat)?;
        let other = &self.pore_vertices[b];
        Ok(self.pore_vertices[a]
            .iter()
            .filter(|v| other.contains(v))
            .copied()
            .collect())
    }

    /// A throat's shared vertices permuted into hull order around the facet.
    ///
    /// Coincident pore centres fall back to the plane fitted through the
    /// shared vertices, as in facet erosion.
    ///
    /// # Errors
    ///
    /// - `NetworkError::ThroatOutOfRange` for an unknown throat
    /// - `GeometryError` if the facet is degenerate
    pub fn hull_ordered_vertices(&self, throat: usize, axis: ReferenceAxis) -> Result<Vec<Point3>> {
        let shared = self.shared_vertices(throat)?;
        let projection = PlaneProjection::for_facet(&shared, &self.throat_normal(throat)?, axis)?;
        let flat = projection.project(&shared);
        Ok(convex_hull_indices(&flat.points)?
            .into_iter()
            .map(|i| shared[i])
            .collect())
    }

    /// Stores erosion results for every throat.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::LengthMismatch` unless there is exactly one
    /// entry per throat.
    pub fn set_throat_geometry(&mut self, geometry: ThroatGeometry) -> Result<()> {
        if geometry.len() != self.num_throats() {
            return Err(NetworkError::LengthMismatch {
                what: "throat geometry",
                expected: self.num_throats(),
                found: geometry.len(),
            }
            .into());
        }
        self.throat_geometry = Some(geometry);
        Ok(())
    }

    /// Removes throats from the connectivity and from all stored throat data.
    ///
    /// Pores are left untouched. Remaining throats keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::ThroatOutOfRange` if any index is unknown; the
    /// network is then left unchanged.
    pub fn trim_throats(&mut self, throats: &[usize]) -> Result<()> {
        let count = self.num_throats();
        let mut keep = vec![true; count];
        for &t in throats {
            if t >= count {
                return Err(NetworkError::ThroatOutOfRange { index: t, count }.into());
            }
            keep[t] = false;
        }

        let mut flags = keep.iter();
        self.throat_conns
            .retain(|_| flags.next().copied().unwrap_or(true));
        if let Some(geometry) = &mut self.throat_geometry {
            geometry.retain(&keep);
        }
        Ok(())
    }
}
