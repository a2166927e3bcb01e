// inference/drift.rs

// Drift compensation: a reference read-out is taken right after programming and
// the outputs at inference time are rescaled by the ratio of the reference to the
// current read-out.

// Dependencies
use serde::{Deserialize, Serialize};

use crate::{check_positive, ConfigError};

/// Read-out used to estimate the global drift of a tile
#[cfg_attr(test, mockall::automock)]
pub trait DriftCompensation {
    /// Scalar summary of the tile outputs for a fixed probe input
    fn readout(&self, outputs: &[f64]) -> f64;
}

/// Output scale that undoes the drift measured since `baseline` was taken
pub fn drift_alpha<C: DriftCompensation + ?Sized>(compensation: &C, baseline: f64, outputs: &[f64]) -> f64 {
    baseline / compensation.readout(outputs)
}

/// Global compensation: mean absolute output of the whole tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalDriftCompensation {
    /// Lower bound of the read-out, keeps `alpha` finite for silent tiles
    pub readout_floor: f64,
}

impl Default for GlobalDriftCompensation {
    fn default() -> Self {
        GlobalDriftCompensation { readout_floor: 1e-4 }
    }
}

impl GlobalDriftCompensation {
    /// Read-out right after programming
    pub fn init_baseline(&self, outputs: &[f64]) -> f64 {
        self.readout(outputs)
    }

    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("GlobalDriftCompensation", "readout_floor", self.readout_floor)
    }
}

impl DriftCompensation for GlobalDriftCompensation {
    fn readout(&self, outputs: &[f64]) -> f64 {
        if outputs.is_empty() {
            return self.readout_floor;
        }
        let mean_abs = outputs.iter().map(|o| o.abs()).sum::<f64>() / outputs.len() as f64;
        mean_abs.max(self.readout_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_readout_is_mean_abs() {
        let compensation = GlobalDriftCompensation::default();
        assert!((compensation.readout(&[1.0, -3.0]) - 2.0).abs() < 1e-12);
        assert_eq!(compensation.readout(&[]), 1e-4);
        assert_eq!(compensation.readout(&[0.0, 0.0]), 1e-4);
    }

    #[test]
    fn test_alpha_restores_baseline() {
        let compensation = GlobalDriftCompensation::default();
        let baseline = compensation.init_baseline(&[2.0, -2.0]);
        let alpha = drift_alpha(&compensation, baseline, &[1.0, -1.0]);
        assert!((alpha - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_uses_readout_once() {
        let mut compensation = MockDriftCompensation::new();
        compensation.expect_readout().times(1).returning(|_| 0.5);
        assert_eq!(drift_alpha(&compensation, 2.0, &[0.3, 0.7]), 4.0);
    }
}
