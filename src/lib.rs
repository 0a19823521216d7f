pub mod erosion;
pub mod error;
pub mod math;
pub mod network;
pub mod parallel;

pub use erosion::{ErodedFacet, ErosionParams, FacetErosion, FacetOutcome};
pub use error::{ErosionError, PorefacetError, Result};
pub use math::projection::ReferenceAxis;
pub use network::{ErosionReport, OcclusionPruning, PoreNetwork, ThroatErosion, ThroatGeometry};
