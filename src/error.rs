use thiserror::Error;

/// Top-level error type for porefacet.
#[derive(Debug, Error)]
pub enum PorefacetError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("lines are parallel and do not intersect")]
    ParallelLines,

    #[error("convex hull failed: {0}")]
    HullFailed(String),
}

/// Errors raised while reading or trimming a pore network.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("throat {throat} references pore {pore}, but the network has {count} pores")]
    PoreOutOfRange {
        throat: usize,
        pore: usize,
        count: usize,
    },

    #[error("throat index {index} is out of range for {count} throats")]
    ThroatOutOfRange { index: usize, count: usize },

    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Errors related to operation inputs.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Why a facet could not be eroded into a polygon with non-zero area.
///
/// These are outcomes, not faults: each one means the throat is treated as
/// occluded (zero area, no eroded vertices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErosionError {
    #[error("fewer than 3 vertices in the facet hull")]
    TooFewVertices,

    #[error("facet span is smaller than twice the fibre radius")]
    FacetTooSmall,

    #[error("every offset vertex is overlapped, facet fully occluded")]
    FullyOccluded,

    #[error("overlap resolution left fewer than 3 vertices")]
    ResolutionFailed,

    #[error("hull of original and offset vertices could not be computed")]
    ContainmentExceeded,

    #[error("an offset vertex lies outside the original facet")]
    OutsideHull,
}

impl ErosionError {
    /// All failure classes, in code order.
    pub const ALL: [Self; 6] = [
        Self::TooFewVertices,
        Self::FacetTooSmall,
        Self::FullyOccluded,
        Self::ResolutionFailed,
        Self::ContainmentExceeded,
        Self::OutsideHull,
    ];

    /// Numeric code of the failure class (`0` is reserved for success).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::TooFewVertices => 1,
            Self::FacetTooSmall => 2,
            Self::FullyOccluded => 3,
            Self::ResolutionFailed => 4,
            Self::ContainmentExceeded => 5,
            Self::OutsideHull => 6,
        }
    }
}

/// Convenience type alias for results using [`PorefacetError`].
pub type Result<T> = std::result::Result<T, PorefacetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_ordered() {
        let codes: Vec<u8> = ErosionError::ALL.iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn geometry_error_converts_to_top_level() {
        let err: PorefacetError = GeometryError::ParallelLines.into();
        assert!(matches!(err, PorefacetError::Geometry(GeometryError::ParallelLines)));
        assert_eq!(err.to_string(), "lines are parallel and do not intersect");
    }
}
