use crate::error::{OperationError, Result};

/// Removes throats whose eroded area is negligible next to the typical throat.
///
/// The cutoff is `fraction` times the mean of the non-zero areas; every
/// throat at or below it, zero-area throats included, is selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionPruning {
    /// Fraction of the mean non-zero area below which a throat is pruned.
    pub fraction: f64,
}

impl Default for OcclusionPruning {
    fn default() -> Self {
        Self { fraction: 0.01 }
    }
}

impl OcclusionPruning {
    /// Creates a pruning policy with the given fraction of the mean area.
    #[must_use]
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }

    /// Checks the fraction is usable.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a negative or non-finite
    /// fraction.
    pub fn validate(&self) -> Result<()> {
        if !self.fraction.is_finite() || self.fraction < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "pruning fraction must be finite and non-negative, got {}",
                self.fraction
            ))
            .into());
        }
        Ok(())
    }

    /// Area at or below which a throat is pruned.
    ///
    /// Zero when no throat has a non-zero area.
    #[must_use]
    pub fn cutoff(&self, areas: &[f64]) -> f64 {
        let (sum, count) = areas
            .iter()
            .filter(|&&a| a > 0.0)
            .fold((0.0, 0_usize), |(sum, count), &a| (sum + a, count + 1));
        if count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / count as f64;
        mean * self.fraction
    }

    /// Indices of the throats to prune, in ascending order.
    #[must_use]
    pub fn select(&self, areas: &[f64]) -> Vec<usize> {
        let cutoff = self.cutoff(areas);
        areas
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a <= cutoff)
            .map(|(i, _)| i)
            .collect()
    }
}
