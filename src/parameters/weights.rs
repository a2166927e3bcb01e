// parameters/weights.rs

// Weight clipping and weight modification applied during hardware-aware training.
// These bundles travel with an inference configuration and are consumed by the
// inference runtime, not by the native tile.

// Dependencies
use serde::{Deserialize, Serialize};

use crate::{check_non_negative, check_positive, check_probability, ConfigError};

/// Clipping strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightClipType {
    /// No clipping
    #[default]
    None,
    /// Clip to `fixed_value`
    FixedValue,
    /// Clip to `sigma` standard deviations of the layer weights
    LayerGaussian,
    /// Clip to the average of the per-channel maxima
    AverageChannelMax,
}

/// Weight clipping after each update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightClipParameter {
    /// Clip value for `FixedValue` (negative disables)
    pub fixed_value: f64,
    /// Number of standard deviations for `LayerGaussian`
    pub sigma: f64,
    /// Clipping strategy
    pub clip_type: WeightClipType,
}

impl Default for WeightClipParameter {
    fn default() -> Self {
        WeightClipParameter {
            fixed_value: -1.0,
            sigma: 2.5,
            clip_type: WeightClipType::None,
        }
    }
}

impl WeightClipParameter {
    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clip_type == WeightClipType::FixedValue && !(self.fixed_value > 0.0) {
            return Err(ConfigError::invalid(
                "WeightClipParameter",
                "fixed_value",
                format!("must be > 0 for fixed value clipping, got {}", self.fixed_value),
            ));
        }
        check_positive("WeightClipParameter", "sigma", self.sigma)
    }
}

/// Modification applied to the weights in the forward pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightModifierType {
    /// Weights are used as they are
    #[default]
    Copy,
    /// Discretize to `res`
    Discretize,
    /// Multiplicative Gaussian noise
    MultNormal,
    /// Additive Gaussian noise
    AddNormal,
    /// Discretize, then additive Gaussian noise
    DiscretizeAddNormal,
    /// DoReFa discretization
    #[serde(rename = "dorefa")]
    DoReFa,
    /// Polynomial noise in the weight magnitude, see `coeffs`
    Poly,
}

/// Weight modifier for noise-aware training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightModifierParameter {
    /// Std of the modifier noise
    pub std_dev: f64,
    /// Discretization resolution
    pub res: f64,
    /// Stochastic rounding
    pub sto_round: bool,
    /// Clip value of the DoReFa modifier
    pub dorefa_clip: f64,
    /// Drop connect probability
    pub pdrop: f64,
    /// Also modify weights in evaluation mode
    pub enable_during_test: bool,
    /// Scale relative to the actual maximal weight instead of `assumed_wmax`
    pub rel_to_actual_wmax: bool,
    /// Assumed maximal weight
    pub assumed_wmax: f64,
    /// Modification applied to the weights
    pub modifier_type: WeightModifierType,
    /// Polynomial coefficients for `Poly`
    pub coeffs: Vec<f64>,
}

impl Default for WeightModifierParameter {
    fn default() -> Self {
        WeightModifierParameter {
            std_dev: 0.0,
            res: 0.0,
            sto_round: false,
            dorefa_clip: 0.6,
            pdrop: 0.0,
            enable_during_test: false,
            rel_to_actual_wmax: true,
            assumed_wmax: 1.0,
            modifier_type: WeightModifierType::Copy,
            coeffs: vec![0.2, 0.0],
        }
    }
}

impl WeightModifierParameter {
    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        const B: &str = "WeightModifierParameter";
        check_non_negative(B, "std_dev", self.std_dev)?;
        check_non_negative(B, "res", self.res)?;
        check_positive(B, "dorefa_clip", self.dorefa_clip)?;
        check_probability(B, "pdrop", self.pdrop)?;
        check_positive(B, "assumed_wmax", self.assumed_wmax)?;
        if self.modifier_type == WeightModifierType::Poly && self.coeffs.is_empty() {
            return Err(ConfigError::invalid(B, "coeffs", "polynomial modifier needs coefficients"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(WeightClipParameter::default().validate().is_ok());
        assert!(WeightModifierParameter::default().validate().is_ok());
    }

    #[test]
    fn test_fixed_clip_needs_positive_value() {
        let clip = WeightClipParameter {
            clip_type: WeightClipType::FixedValue,
            ..WeightClipParameter::default()
        };
        assert!(clip.validate().is_err());
        let clip = WeightClipParameter { fixed_value: 1.5, ..clip };
        assert!(clip.validate().is_ok());
    }

    #[test]
    fn test_pdrop_is_probability() {
        let modifier = WeightModifierParameter {
            pdrop: 1.2,
            ..WeightModifierParameter::default()
        };
        assert!(modifier.validate().is_err());
    }
}
