use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use super::pruning::OcclusionPruning;
use super::{PoreNetwork, ThroatGeometry};
use crate::erosion::{ErosionParams, FacetErosion};
use crate::error::{ErosionError, Result};
use crate::parallel::map_indexed;

/// Summary of one batch erosion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErosionReport {
    /// Throats processed.
    pub throats: usize,
    /// Throats that eroded to a polygon.
    pub eroded: usize,
    /// Number of throats per failure class.
    pub failures: HashMap<ErosionError, usize>,
    /// Indices (before trimming) of the throats removed from the network.
    pub pruned: Vec<usize>,
    /// Area at or below which throats were pruned.
    pub cutoff: f64,
}

impl ErosionReport {
    /// Number of throats that failed with `error`.
    #[must_use]
    pub fn failure_count(&self, error: ErosionError) -> usize {
        self.failures.get(&error).copied().unwrap_or(0)
    }

    /// Failure tally keyed by [`ErosionError::code`].
    #[must_use]
    pub fn failures_by_code(&self) -> BTreeMap<u8, usize> {
        self.failures.iter().map(|(e, &n)| (e.code(), n)).collect()
    }

    fn tally(geometry: &ThroatGeometry) -> Self {
        let mut report = Self {
            throats: geometry.len(),
            ..Self::default()
        };
        for error in &geometry.errors {
            match error {
                None => report.eroded += 1,
                Some(e) => *report.failures.entry(*e).or_insert(0) += 1,
            }
        }
        report
    }
}

/// Erodes every throat facet of a pore network by the fibre radius.
///
/// Each throat's facet is the set of vertices its two pores share; its normal
/// is the vector between the pore centres. Throats are independent and are
/// processed on the worker pool when the `parallel` feature is enabled.
///
/// After erosion, throats whose area falls at or below the pruning cutoff are
/// removed from the network together with their stored geometry.
#[derive(Debug, Clone)]
pub struct ThroatErosion {
    params: ErosionParams,
    pruning: Option<OcclusionPruning>,
}

impl ThroatErosion {
    /// Creates a batch erosion with the default pruning policy.
    #[must_use]
    pub fn new(params: ErosionParams) -> Self {
        Self {
            params,
            pruning: Some(OcclusionPruning::default()),
        }
    }

    /// Sets the pruning policy.
    #[must_use]
    pub fn with_pruning(mut self, pruning: OcclusionPruning) -> Self {
        self.pruning = Some(pruning);
        self
    }

    /// Keeps every throat, including occluded ones.
    #[must_use]
    pub fn without_pruning(mut self) -> Self {
        self.pruning = None;
        self
    }

    /// Erodes every throat without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the parameters are unusable.
    /// Per-throat failures are recorded in the returned geometry, not raised.
    pub fn erode(&self, network: &PoreNetwork) -> Result<ThroatGeometry> {
        self.params.validate()?;
        let length = self.params.fibre_radius;

        let outcomes = map_indexed(network.num_throats(), |t| -> Result<_> {
            let shared = network.shared_vertices(t)?;
            let normal = network.throat_normal(t)?;
            let outcome = if shared.len() < 3 {
                Err(ErosionError::TooFewVertices)
            } else {
                FacetErosion::new(&shared, normal, self.params).execute()
            };
            if let Err(e) = &outcome {
                debug!(throat = t, code = e.code(), error = %e, "throat occluded");
            }
            Ok((shared, normal, length, outcome))
        });

        outcomes.into_iter().collect()
    }

    /// Erodes every throat, stores the results on the network and prunes
    /// occluded throats.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the parameters or the pruning
    /// fraction are unusable. The network is unchanged on error.
    pub fn execute(&self, network: &mut PoreNetwork) -> Result<ErosionReport> {
        if let Some(pruning) = &self.pruning {
            pruning.validate()?;
        }
        let geometry = self.erode(network)?;
        let mut report = ErosionReport::tally(&geometry);

        let pruned = match &self.pruning {
            Some(pruning) => {
                report.cutoff = pruning.cutoff(&geometry.area);
                pruning.select(&geometry.area)
            }
            None => Vec::new(),
        };

        network.set_throat_geometry(geometry)?;
        network.trim_throats(&pruned)?;
        report.pruned = pruned;

        info!(
            throats = report.throats,
            eroded = report.eroded,
            failures = ?report.failures_by_code(),
            pruned = report.pruned.len(),
            cutoff = report.cutoff,
            "throat erosion finished"
        );
        Ok(report)
    }
}
