//! Native simulator bindings
//!
//! Flat parameter blocks in the shape the native analog-tile simulator consumes.
//! Enum-valued settings are lowered to their native integer codes; everything
//! else is copied verbatim. These values are built once by the translator and
//! are not touched by the configuration layer afterwards.

/// Translation of configurations into bindings
pub mod translate;

use crate::inference::{GlobalDriftCompensation, InferenceNoiseModel};
use crate::parameters::{WeightClipParameter, WeightModifierParameter};

pub use translate::{tile_parameters_to_bindings, AnalogConfigRef};

/// Forward/backward pass parameters
#[derive(Debug, Clone, PartialEq)]
pub struct IoParameter {
    /// Bound management also checks the negative output bound
    pub bm_test_negative_bound: bool,
    /// Bound management strategy
    pub bound_management: i32,
    /// Input clipping bound
    pub inp_bound: f64,
    /// Std of additive input noise
    pub inp_noise: f64,
    /// Input resolution
    pub inp_res: f64,
    /// Stochastic rounding of the inputs
    pub inp_sto_round: bool,
    /// Exact floating point pass
    pub is_perfect: bool,
    /// Largest input down-scaling of the bound management
    pub max_bm_factor: u32,
    /// Resolution limit of the bound management
    pub max_bm_res: f64,
    /// Threshold of the noise management
    pub nm_thres: f64,
    /// Input normalization strategy
    pub noise_management: i32,
    /// Output clipping bound
    pub out_bound: f64,
    /// Std of additive output noise
    pub out_noise: f64,
    /// Output resolution
    pub out_res: f64,
    /// Output scale
    pub out_scale: f64,
    /// Stochastic rounding of the outputs
    pub out_sto_round: bool,
    /// Std of weight read noise
    pub w_noise: f64,
    /// Kind of weight read noise
    pub w_noise_type: i32,
}

/// Update parameters
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateParameter {
    /// Desired pulse train length
    pub desired_bl: u32,
    /// Always use `desired_bl` pulses
    pub fixed_bl: bool,
    /// Pulse generation scheme
    pub pulse_type: i32,
    /// Resolution of the pulse probabilities
    pub res: f64,
    /// Stochastic rounding
    pub sto_round: bool,
    /// Adapt the pulse train length per batch
    pub update_bl_management: bool,
    /// Balance pulse probabilities between x and d
    pub update_management: bool,
    /// Implicit resolution of x
    pub x_res_implicit: f64,
    /// Implicit resolution of d
    pub d_res_implicit: f64,
}

/// Ideal device
#[derive(Debug, Clone, PartialEq)]
pub struct IdealDeviceParameter {
    /// Seed of the device-to-device variations
    pub construction_seed: u32,
    /// Std of the diffusion process
    pub diffusion: f64,
    /// Decay lifetime (0 disables decay)
    pub lifetime: f64,
}

/// Pulsed device: common fields plus every step-model field (unused ones are zero)
#[derive(Debug, Clone, PartialEq)]
pub struct PulsedDeviceParameter {
    /// Native step model code
    pub step_type: i32,
    /// Seed of the device-to-device variations
    pub construction_seed: u32,
    /// Probability of a stuck device
    pub corrupt_devices_prob: f64,
    /// Range of stuck device weights
    pub corrupt_devices_range: u32,
    /// Std of the diffusion process
    pub diffusion: f64,
    /// Device-to-device variation of `diffusion`
    pub diffusion_dtod: f64,
    /// Mean step size of one pulse
    pub dw_min: f64,
    /// Device-to-device variation of `dw_min`
    pub dw_min_dtod: f64,
    /// Cycle-to-cycle variation of `dw_min`
    pub dw_min_std: f64,
    /// Keep `w_min` below `w_max` after sampling
    pub enforce_consistency: bool,
    /// Decay lifetime (0 disables decay)
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
    /// Linear step up slope
    pub ls_gamma_up: f64,
    /// Linear step down slope
    pub ls_gamma_down: f64,
    /// Variation of `ls_gamma_up`
    pub ls_gamma_up_dtod: f64,
    /// Variation of `ls_gamma_down`
    pub ls_gamma_down_dtod: f64,
    /// Linear step may grow with the weight
    pub ls_allow_increasing: bool,
    /// Linear slopes relative to the mean bound
    pub ls_mean_bound_reference: bool,
    /// Multiplicative cycle-to-cycle noise
    pub ls_mult_noise: bool,
    /// Exp step up prefactor
    pub es_a_up: f64,
    /// Exp step down prefactor
    pub es_a_down: f64,
    /// Exp step up exponent scale
    pub es_gamma_up: f64,
    /// Exp step down exponent scale
    pub es_gamma_down: f64,
    /// Exp step weight offset
    pub es_a: f64,
    /// Exp step weight scale
    pub es_b: f64,
}

/// Multi-device layout shared by vector and difference cells
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDeviceParameter {
    /// Sub-devices in cell order
    pub devices: Vec<PulsedDeviceParameter>,
    /// Which devices receive an update
    pub update_policy: i32,
    /// Device updated under `SingleFixed`
    pub first_update_idx: usize,
    /// Per-device weighting (empty for uniform)
    pub gamma_vec: Vec<f64>,
}

/// Transfer compound layout
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDeviceParameter {
    /// Devices and vector settings
    pub vector: VectorDeviceParameter,
    /// Weighting of the transfer target
    pub gamma: f64,
    /// Updates between transfers
    pub transfer_every: f64,
    /// Per-device transfer periods
    pub transfer_every_vec: Vec<f64>,
    /// Skip transfer onto the same device
    pub no_self_transfer: bool,
    /// Count `transfer_every` in mini-batches
    pub units_in_mbatch: bool,
    /// Columns read per transfer
    pub n_cols_per_transfer: usize,
    /// Reset probability after transfer
    pub with_reset_prob: f64,
    /// Pick transfer columns at random
    pub random_column: bool,
    /// Learning rate of the transfer
    pub transfer_lr: f64,
    /// Per-device transfer learning rates
    pub transfer_lr_vec: Vec<f64>,
    /// Scale the transfer learning rate with the tile learning rate
    pub scale_transfer_lr: bool,
    /// I/O of the transfer read
    pub transfer_io: IoParameter,
    /// Update of the transfer write
    pub transfer_up: UpdateParameter,
}

/// Device part of a tile parameter block
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceParameter {
    /// Exact updates
    Ideal(IdealDeviceParameter),
    /// One pulsed device
    Pulsed(PulsedDeviceParameter),
    /// Sum of devices
    Vector(VectorDeviceParameter),
    /// Differential pair
    Difference(VectorDeviceParameter),
    /// Transfer chain
    Transfer(TransferDeviceParameter),
}

impl DeviceParameter {
    /// Pulsed devices carried by this block, in order (empty for the ideal device)
    pub fn devices(&self) -> Vec<&PulsedDeviceParameter> {
        match self {
            DeviceParameter::Ideal(_) => Vec::new(),
            DeviceParameter::Pulsed(device) => vec![device],
            DeviceParameter::Vector(cell) | DeviceParameter::Difference(cell) => cell.devices.iter().collect(),
            DeviceParameter::Transfer(cell) => cell.vector.devices.iter().collect(),
        }
    }
}

/// Analog tile parameter block
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogTileParameter {
    /// Device parameters
    pub device: DeviceParameter,
    /// Forward pass I/O
    pub forward_io: IoParameter,
    /// Backward pass I/O
    pub backward_io: IoParameter,
    /// Update parameters
    pub update: UpdateParameter,
}

/// Tile bindings of an inference configuration, together with the runtime
/// parameters that are applied outside the native tile
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceTileParameter {
    /// Analog tile parameters
    pub tile: AnalogTileParameter,
    /// Statistical inference noise
    pub noise_model: InferenceNoiseModel,
    /// Drift compensation (`None` disables it)
    pub drift_compensation: Option<GlobalDriftCompensation>,
    /// Weight clipping
    pub clip: WeightClipParameter,
    /// Weight modifier
    pub modifier: WeightModifierParameter,
}
