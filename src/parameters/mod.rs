//! Signal and update parameters
//!
//! I/O parameters describe the non-idealities of one analog matrix-vector
//! product (forward or backward pass). Update parameters describe how gradient
//! updates are turned into programming pulses.

/// Weight clipping and modifier bundles
pub mod weights;

use serde::{Deserialize, Serialize};

use crate::{check_non_negative, check_positive, ConfigError};

pub use weights::{WeightClipParameter, WeightClipType, WeightModifierParameter, WeightModifierType};

/// How the output bound is managed during a matrix-vector product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundManagementType {
    /// No management, outputs are clipped
    None,
    /// Inputs are iteratively scaled down until the output is within bound
    #[default]
    Iterative,
    /// Inputs are shifted to use the full output range
    Shift,
}

impl BoundManagementType {
    /// Native enum code
    pub fn code(self) -> i32 {
        match self {
            BoundManagementType::None => 0,
            BoundManagementType::Iterative => 1,
            BoundManagementType::Shift => 2,
        }
    }
}

/// How the input vector is normalized before entering the array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseManagementType {
    /// Disabled
    None,
    /// Scale by the absolute maximum
    #[default]
    AbsMax,
    /// Scale by the maximum
    Max,
    /// Scale by a constant
    Constant,
    /// Scale by a running average of the absolute maximum
    AverageAbsMax,
}

impl NoiseManagementType {
    /// Native enum code
    pub fn code(self) -> i32 {
        match self {
            NoiseManagementType::None => 0,
            NoiseManagementType::AbsMax => 1,
            NoiseManagementType::Max => 2,
            NoiseManagementType::Constant => 3,
            NoiseManagementType::AverageAbsMax => 4,
        }
    }
}

/// Noise added to the weights when they are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightNoiseType {
    /// Disabled
    #[default]
    None,
    /// Constant additive noise
    AdditiveConstant,
    /// PCM-like read noise
    PcmRead,
}

impl WeightNoiseType {
    /// Native enum code
    pub fn code(self) -> i32 {
        match self {
            WeightNoiseType::None => 0,
            WeightNoiseType::AdditiveConstant => 1,
            WeightNoiseType::PcmRead => 2,
        }
    }
}

/// Pulse generation scheme of the update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseType {
    /// No pulsing: the update is applied exactly in floating point
    None,
    /// Stochastic pulse trains
    Stochastic,
    /// Stochastic pulse trains, compressed to coincidences
    #[default]
    StochasticCompressed,
    /// Deterministic pulse trains
    DeterministicImplicit,
    /// Exact update, but still passed through the device model
    NoneWithDevice,
    /// Mean number of coincidences only
    MeanCount,
}

impl PulseType {
    /// Native enum code
    pub fn code(self) -> i32 {
        match self {
            PulseType::None => 0,
            PulseType::StochasticCompressed => 1,
            PulseType::Stochastic => 2,
            PulseType::NoneWithDevice => 3,
            PulseType::MeanCount => 4,
            PulseType::DeterministicImplicit => 5,
        }
    }
}

/// Non-idealities of a forward or backward pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IoParameters {
    /// Bound management also checks the negative output bound
    pub bm_test_negative_bound: bool,
    /// Bound management strategy
    pub bound_management: BoundManagementType,
    /// Input clipping bound
    pub inp_bound: f64,
    /// Std of additive input noise
    pub inp_noise: f64,
    /// Input resolution (<= 0 disables discretization)
    pub inp_res: f64,
    /// Stochastic rounding of the inputs
    pub inp_sto_round: bool,
    /// Bypasses every other field: the pass is an exact floating point product
    pub is_perfect: bool,
    /// Largest input down-scaling of the bound management
    pub max_bm_factor: u32,
    /// Resolution limit of the bound management
    pub max_bm_res: f64,
    /// Threshold of the noise management
    pub nm_thres: f64,
    /// Input normalization strategy
    pub noise_management: NoiseManagementType,
    /// Output clipping bound
    pub out_bound: f64,
    /// Std of additive output noise
    pub out_noise: f64,
    /// Output resolution (<= 0 disables discretization)
    pub out_res: f64,
    /// Output scale
    pub out_scale: f64,
    /// Stochastic rounding of the outputs
    pub out_sto_round: bool,
    /// Std of weight read noise
    pub w_noise: f64,
    /// Kind of weight read noise
    pub w_noise_type: WeightNoiseType,
}

impl Default for IoParameters {
    fn default() -> Self {
        IoParameters {
            bm_test_negative_bound: true,
            bound_management: BoundManagementType::Iterative,
            inp_bound: 1.0,
            inp_noise: 0.0,
            inp_res: 1.0 / (2f64.powi(7) - 2.0),
            inp_sto_round: false,
            is_perfect: false,
            max_bm_factor: 1000,
            max_bm_res: 0.25,
            nm_thres: 0.0,
            noise_management: NoiseManagementType::AbsMax,
            out_bound: 12.0,
            out_noise: 0.06,
            out_res: 1.0 / (2f64.powi(9) - 2.0),
            out_scale: 1.0,
            out_sto_round: false,
            w_noise: 0.0,
            w_noise_type: WeightNoiseType::None,
        }
    }
}

impl IoParameters {
    /// Perfect I/O: no non-ideality is injected on this pass
    pub fn perfect() -> Self {
        IoParameters {
            is_perfect: true,
            ..IoParameters::default()
        }
    }

    /// Sets the output noise, keeping everything else
    pub fn with_out_noise(mut self, out_noise: f64) -> Self {
        self.out_noise = out_noise;
        self
    }

    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        const B: &str = "IoParameters";
        check_positive(B, "inp_bound", self.inp_bound)?;
        check_non_negative(B, "inp_noise", self.inp_noise)?;
        check_positive(B, "out_bound", self.out_bound)?;
        check_non_negative(B, "out_noise", self.out_noise)?;
        check_positive(B, "out_scale", self.out_scale)?;
        check_non_negative(B, "nm_thres", self.nm_thres)?;
        check_non_negative(B, "max_bm_res", self.max_bm_res)?;
        check_non_negative(B, "w_noise", self.w_noise)?;
        if !self.inp_res.is_finite() {
            return Err(ConfigError::invalid(B, "inp_res", "must be finite"));
        }
        if !self.out_res.is_finite() {
            return Err(ConfigError::invalid(B, "out_res", "must be finite"));
        }
        if self.max_bm_factor == 0 {
            return Err(ConfigError::invalid(B, "max_bm_factor", "must be >= 1"));
        }
        Ok(())
    }
}

/// Pulse generation of the weight update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateParameters {
    /// Desired pulse train length
    pub desired_bl: u32,
    /// Always use `desired_bl` pulses
    pub fixed_bl: bool,
    /// Pulse generation scheme
    pub pulse_type: PulseType,
    /// Resolution of the update probability (0 disables discretization)
    pub res: f64,
    /// Stochastic rounding
    pub sto_round: bool,
    /// Shorten the pulse train when the update is small
    pub update_bl_management: bool,
    /// Balance x and d pulse probabilities
    pub update_management: bool,
    /// Resolution of x for the implicit deterministic scheme
    pub x_res_implicit: f64,
    /// Resolution of d for the implicit deterministic scheme
    pub d_res_implicit: f64,
}

impl Default for UpdateParameters {
    fn default() -> Self {
        UpdateParameters {
            desired_bl: 31,
            fixed_bl: true,
            pulse_type: PulseType::StochasticCompressed,
            res: 0.0,
            sto_round: false,
            update_bl_management: true,
            update_management: true,
            x_res_implicit: 0.0,
            d_res_implicit: 0.0,
        }
    }
}

impl UpdateParameters {
    /// No-pulse update: updates are exact
    pub fn no_pulse() -> Self {
        UpdateParameters {
            pulse_type: PulseType::None,
            ..UpdateParameters::default()
        }
    }

    /// Whether the update is pulsed at all
    pub fn is_pulsed(&self) -> bool {
        !matches!(self.pulse_type, PulseType::None | PulseType::NoneWithDevice)
    }

    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        const B: &str = "UpdateParameters";
        if self.is_pulsed() && self.desired_bl == 0 {
            return Err(ConfigError::invalid(B, "desired_bl", "must be >= 1 for pulsed updates"));
        }
        if !self.res.is_finite() {
            return Err(ConfigError::invalid(B, "res", "must be finite"));
        }
        check_non_negative(B, "x_res_implicit", self.x_res_implicit)?;
        check_non_negative(B, "d_res_implicit", self.d_res_implicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let perfect = IoParameters::perfect();
        assert!(perfect.is_perfect);
        assert_eq!(perfect.out_noise, IoParameters::default().out_noise);

        let update = UpdateParameters::no_pulse();
        assert_eq!(update.pulse_type, PulseType::None);
        assert!(!update.is_pulsed());
        assert!(UpdateParameters::default().is_pulsed());
    }

    #[test]
    fn test_default_resolutions() {
        let io = IoParameters::default();
        assert!((io.inp_res - 1.0 / 126.0).abs() < 1e-15);
        assert!((io.out_res - 1.0 / 510.0).abs() < 1e-15);
        assert!(io.validate().is_ok());
    }

    #[test]
    fn test_zero_pulse_train_only_rejected_when_pulsed() {
        let mut update = UpdateParameters {
            desired_bl: 0,
            ..UpdateParameters::default()
        };
        assert!(update.validate().is_err());
        update.pulse_type = PulseType::None;
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_negative_noise_rejected() {
        let io = IoParameters::default().with_out_noise(-0.01);
        assert!(matches!(
            io.validate(),
            Err(ConfigError::InvalidParameter { field: "out_noise", .. })
        ));
    }

    #[test]
    fn test_pulse_type_codes_unique() {
        let codes: Vec<i32> = [
            PulseType::None,
            PulseType::Stochastic,
            PulseType::StochasticCompressed,
            PulseType::DeterministicImplicit,
            PulseType::NoneWithDevice,
            PulseType::MeanCount,
        ]
        .iter()
        .map(|p| p.code())
        .collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
