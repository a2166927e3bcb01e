//! Device parameter models
//!
//! This module holds the physical parameter bundles of a single simulated device:
//! the floating point device, the ideal device, and the family of pulsed devices
//! whose weight changes are driven by discrete programming pulses. Composite
//! devices ("unit cells") live in [`unit_cell`].

/// Composite devices
pub mod unit_cell;

use serde::{Deserialize, Serialize};

use crate::{check_non_negative, check_positive, check_probability, ConfigError};

pub use unit_cell::{
    DifferenceUnitCellDevice, TransferCompound, UnitCellDevice, VectorUnitCellDevice,
    VectorUnitCellUpdatePolicy,
};

/// Floating point device: no pulsing, optional decay and diffusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloatingPointDevice {
    /// Standard deviation of the diffusion process (0 disables diffusion)
    pub diffusion: f64,
    /// One over decay rate, in mini-batches (0 disables decay)
    pub lifetime: f64,
}

impl Default for FloatingPointDevice {
    fn default() -> Self {
        FloatingPointDevice {
            diffusion: 0.0,
            lifetime: 0.0,
        }
    }
}

impl FloatingPointDevice {
    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("FloatingPointDevice", "diffusion", self.diffusion)?;
        check_non_negative("FloatingPointDevice", "lifetime", self.lifetime)
    }
}

/// Ideal device: updates are exact, used where only I/O realism matters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdealDevice {
    /// Seed for device-to-device variations (0 draws a random seed)
    pub construction_seed: u32,
    /// Standard deviation of the diffusion process
    pub diffusion: f64,
    /// One over decay rate, in mini-batches
    pub lifetime: f64,
}

impl Default for IdealDevice {
    fn default() -> Self {
        IdealDevice {
            construction_seed: 0,
            diffusion: 0.0,
            lifetime: 0.0,
        }
    }
}

impl IdealDevice {
    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("IdealDevice", "diffusion", self.diffusion)?;
        check_non_negative("IdealDevice", "lifetime", self.lifetime)
    }
}

/// Step response of a pulsed device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepModel {
    /// Same step size for every pulse, independent of the current weight
    #[default]
    ConstantStep,
    /// Step size depends linearly on the current weight
    LinearStep(LinearStepParameters),
    /// Step size shrinks linearly towards the bounds (slopes derived from `w_min`/`w_max`)
    SoftBounds,
    /// Step size follows an exponential in the distance to the bounds
    ExpStep(ExpStepParameters),
}

impl StepModel {
    /// Short name used in summaries and bindings
    pub fn name(&self) -> &'static str {
        match self {
            StepModel::ConstantStep => "constant_step",
            StepModel::LinearStep(_) => "linear_step",
            StepModel::SoftBounds => "soft_bounds",
            StepModel::ExpStep(_) => "exp_step",
        }
    }
}

/// Extra parameters of the linear step model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearStepParameters {
    /// Slope of the up step size over the weight
    pub gamma_up: f64,
    /// Slope of the down step size over the weight
    pub gamma_down: f64,
    /// Device-to-device variation of `gamma_up`
    pub gamma_up_dtod: f64,
    /// Device-to-device variation of `gamma_down`
    pub gamma_down_dtod: f64,
    /// Whether the step size may grow with the weight
    pub allow_increasing: bool,
    /// Slopes are relative to the mean bound instead of the device bound
    pub mean_bound_reference: bool,
    /// Cycle-to-cycle noise is multiplicative
    pub mult_noise: bool,
}

impl Default for LinearStepParameters {
    fn default() -> Self {
        LinearStepParameters {
            gamma_up: 0.0,
            gamma_down: 0.0,
            gamma_up_dtod: 0.05,
            gamma_down_dtod: 0.05,
            allow_increasing: false,
            mean_bound_reference: true,
            mult_noise: true,
        }
    }
}

/// Extra parameters of the exponential step model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpStepParameters {
    /// Prefactor of the up exponential
    pub a_up: f64,
    /// Prefactor of the down exponential
    pub a_down: f64,
    /// Exponent scale of the up step
    pub gamma_up: f64,
    /// Exponent scale of the down step
    pub gamma_down: f64,
    /// Weight offset of the exponential argument
    pub a: f64,
    /// Weight scale of the exponential argument
    pub b: f64,
}

impl Default for ExpStepParameters {
    fn default() -> Self {
        ExpStepParameters {
            a_up: 0.00081,
            a_down: 0.36833,
            gamma_up: 12.44625,
            gamma_down: 12.78785,
            a: 0.244,
            b: 0.2425,
        }
    }
}

/// Pulsed device: weight changes through discrete pulses with device-to-device (dtod)
/// and cycle-to-cycle (std) variations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PulsedDevice {
    /// Step response model
    pub step: StepModel,
    /// Seed for device-to-device variations (0 draws a random seed)
    pub construction_seed: u32,
    /// Probability that a device is stuck at a random weight
    pub corrupt_devices_prob: f64,
    /// Range of the stuck weight, in units of `dw_min`
    pub corrupt_devices_range: u32,
    /// Standard deviation of the diffusion process
    pub diffusion: f64,
    /// Device-to-device variation of `diffusion`
    pub diffusion_dtod: f64,
    /// Mean weight change of one pulse
    pub dw_min: f64,
    /// Device-to-device variation of `dw_min`
    pub dw_min_dtod: f64,
    /// Cycle-to-cycle variation of `dw_min`
    pub dw_min_std: f64,
    /// Redraw devices until `w_min < 0 < w_max` and `dw_min > 0`
    pub enforce_consistency: bool,
    /// One over decay rate, in mini-batches
    pub lifetime: f64,
    /// Device-to-device variation of `lifetime`
    pub lifetime_dtod: f64,
    /// No variation on the bias row
    pub perfect_bias: bool,
    /// Mean weight after reset
    pub reset: f64,
    /// Device-to-device variation of `reset`
    pub reset_dtod: f64,
    /// Cycle-to-cycle variation of `reset`
    pub reset_std: f64,
    /// Up/down step asymmetry
    pub up_down: f64,
    /// Device-to-device variation of `up_down`
    pub up_down_dtod: f64,
    /// Upper weight bound
    pub w_max: f64,
    /// Device-to-device variation of `w_max`
    pub w_max_dtod: f64,
    /// Lower weight bound
    pub w_min: f64,
    /// Device-to-device variation of `w_min`
    pub w_min_dtod: f64,
}

impl Default for PulsedDevice {
    fn default() -> Self {
        PulsedDevice {
            step: StepModel::ConstantStep,
            construction_seed: 0,
            corrupt_devices_prob: 0.0,
            corrupt_devices_range: 1000,
            diffusion: 0.0,
            diffusion_dtod: 0.0,
            dw_min: 0.001,
            dw_min_dtod: 0.3,
            dw_min_std: 0.3,
            enforce_consistency: true,
            lifetime: 0.0,
            lifetime_dtod: 0.0,
            perfect_bias: false,
            reset: 0.01,
            reset_dtod: 0.0,
            reset_std: 0.01,
            up_down: 0.0,
            up_down_dtod: 0.01,
            w_max: 0.6,
            w_max_dtod: 0.3,
            w_min: -0.6,
            w_min_dtod: 0.3,
        }
    }
}

impl PulsedDevice {
    /// Constant step device with default parameters
    pub fn constant_step() -> Self {
        PulsedDevice::default()
    }

    /// Linear step device with default parameters
    pub fn linear_step() -> Self {
        PulsedDevice {
            step: StepModel::LinearStep(LinearStepParameters::default()),
            ..PulsedDevice::default()
        }
    }

    /// Soft bounds device with default parameters
    pub fn soft_bounds() -> Self {
        PulsedDevice {
            step: StepModel::SoftBounds,
            ..PulsedDevice::default()
        }
    }

    /// Exponential step device with default parameters
    pub fn exp_step() -> Self {
        PulsedDevice {
            step: StepModel::ExpStep(ExpStepParameters::default()),
            ..PulsedDevice::default()
        }
    }

    /// Sets diffusion, keeping everything else
    pub fn with_diffusion(mut self, diffusion: f64) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Sets lifetime, keeping everything else
    pub fn with_lifetime(mut self, lifetime: f64) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        const B: &str = "PulsedDevice";
        check_probability(B, "corrupt_devices_prob", self.corrupt_devices_prob)?;
        check_non_negative(B, "diffusion", self.diffusion)?;
        check_non_negative(B, "diffusion_dtod", self.diffusion_dtod)?;
        check_positive(B, "dw_min", self.dw_min)?;
        check_non_negative(B, "dw_min_dtod", self.dw_min_dtod)?;
        check_non_negative(B, "dw_min_std", self.dw_min_std)?;
        check_non_negative(B, "lifetime", self.lifetime)?;
        check_non_negative(B, "lifetime_dtod", self.lifetime_dtod)?;
        check_non_negative(B, "reset_dtod", self.reset_dtod)?;
        check_non_negative(B, "reset_std", self.reset_std)?;
        check_non_negative(B, "up_down_dtod", self.up_down_dtod)?;
        check_non_negative(B, "w_max_dtod", self.w_max_dtod)?;
        check_non_negative(B, "w_min_dtod", self.w_min_dtod)?;
        if !(self.w_min.is_finite() && self.w_max.is_finite()) || self.w_min > self.w_max {
            return Err(ConfigError::invalid(
                B,
                "w_min",
                format!("must not exceed w_max ({} > {})", self.w_min, self.w_max),
            ));
        }

        match &self.step {
            StepModel::LinearStep(p) => {
                check_non_negative("LinearStepParameters", "gamma_up_dtod", p.gamma_up_dtod)?;
                check_non_negative("LinearStepParameters", "gamma_down_dtod", p.gamma_down_dtod)?;
            }
            StepModel::ExpStep(p) => {
                check_non_negative("ExpStepParameters", "a_up", p.a_up)?;
                check_non_negative("ExpStepParameters", "a_down", p.a_down)?;
            }
            StepModel::ConstantStep | StepModel::SoftBounds => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_disable_decay_and_diffusion() {
        assert_eq!(FloatingPointDevice::default().lifetime, 0.0);
        assert_eq!(IdealDevice::default().diffusion, 0.0);
        let device = PulsedDevice::default();
        assert_eq!(device.step, StepModel::ConstantStep);
        assert_eq!(device.diffusion, 0.0);
        assert_eq!(device.lifetime, 0.0);
    }

    #[rstest]
    #[case(PulsedDevice::constant_step(), "constant_step")]
    #[case(PulsedDevice::linear_step(), "linear_step")]
    #[case(PulsedDevice::soft_bounds(), "soft_bounds")]
    #[case(PulsedDevice::exp_step(), "exp_step")]
    fn test_step_presets_validate(#[case] device: PulsedDevice, #[case] name: &str) {
        assert_eq!(device.step.name(), name);
        assert!(device.validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let device = PulsedDevice {
            w_min: 0.7,
            ..PulsedDevice::default()
        };
        match device.validate() {
            Err(ConfigError::InvalidParameter { field, .. }) => assert_eq!(field, "w_min"),
            other => panic!("expected invalid w_min, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_diffusion_not_clamped() {
        let device = PulsedDevice::default().with_diffusion(-0.1);
        assert!(device.validate().is_err());
        assert_eq!(device.diffusion, -0.1);
    }
}
