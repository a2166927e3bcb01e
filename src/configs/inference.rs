// configs/inference.rs

// Configuration for tiles that are only used for inference. Training is done in a
// hardware-aware manner: only the forward pass carries non-idealities, backward
// and update are ideal. At inference time statistical programming, drift and read
// noise apply, together with a drift compensation.
//
// Device, backward and update are fixed at construction and only readable. They
// are never constructor arguments and never deserialized.

// Dependencies
use serde::{Deserialize, Serialize};

use super::{AnalogRpuConfig, BindingsClass, DeviceSummary, RpuConfig};
use crate::bindings::{tile_parameters_to_bindings, AnalogConfigRef, AnalogTileParameter, InferenceTileParameter};
use crate::devices::IdealDevice;
use crate::inference::{GlobalDriftCompensation, InferenceNoiseModel};
use crate::parameters::{IoParameters, UpdateParameters, WeightClipParameter, WeightModifierParameter};
use crate::ConfigError;

/// Configuration for an analog tile that is used only for inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceRpuConfig {
    /// Input-output parameter setting for the forward direction
    pub forward: IoParameters,
    /// Statistical noise model used during (realistic) inference
    pub noise_model: InferenceNoiseModel,
    /// Drift compensation at inference time (`None` disables it)
    pub drift_compensation: Option<GlobalDriftCompensation>,
    /// Weight clipping
    pub clip: WeightClipParameter,
    /// Weight modifier
    pub modifier: WeightModifierParameter,

    #[serde(skip)]
    device: IdealDevice,
    #[serde(skip, default = "IoParameters::perfect")]
    backward: IoParameters,
    #[serde(skip, default = "UpdateParameters::no_pulse")]
    update: UpdateParameters,
}

impl Default for InferenceRpuConfig {
    fn default() -> Self {
        InferenceRpuConfig::with_forward(IoParameters::default())
    }
}

impl InferenceRpuConfig {
    /// Inference configuration with the given forward I/O and default noise model
    pub fn new(forward: IoParameters) -> Result<Self, ConfigError> {
        let config = InferenceRpuConfig::with_forward(forward);
        config.validate()?;
        Ok(config)
    }

    fn with_forward(forward: IoParameters) -> Self {
        InferenceRpuConfig {
            forward,
            noise_model: InferenceNoiseModel::default(),
            drift_compensation: Some(GlobalDriftCompensation::default()),
            clip: WeightClipParameter::default(),
            modifier: WeightModifierParameter::default(),
            device: IdealDevice::default(),
            backward: IoParameters::perfect(),
            update: UpdateParameters::no_pulse(),
        }
    }

    /// Replaces the noise model
    pub fn with_noise_model(mut self, noise_model: InferenceNoiseModel) -> Self {
        self.noise_model = noise_model;
        self
    }

    /// Replaces the drift compensation
    pub fn with_drift_compensation(mut self, drift_compensation: Option<GlobalDriftCompensation>) -> Self {
        self.drift_compensation = drift_compensation;
        self
    }

    /// Replaces the weight clipping
    pub fn with_clip(mut self, clip: WeightClipParameter) -> Self {
        self.clip = clip;
        self
    }

    /// Replaces the weight modifier
    pub fn with_modifier(mut self, modifier: WeightModifierParameter) -> Self {
        self.modifier = modifier;
        self
    }

    /// Ideal device (read-only)
    pub fn device(&self) -> &IdealDevice {
        &self.device
    }

    /// Perfect backward I/O (read-only)
    pub fn backward(&self) -> &IoParameters {
        &self.backward
    }

    /// No-pulse update (read-only)
    pub fn update(&self) -> &UpdateParameters {
        &self.update
    }

    /// Validates the parameters used by the inference runtime
    pub(crate) fn validate_runtime(&self) -> Result<(), ConfigError> {
        self.noise_model.validate()?;
        if let Some(compensation) = &self.drift_compensation {
            compensation.validate()?;
        }
        self.clip.validate()?;
        self.modifier.validate()
    }

    /// Tile bindings plus the runtime parameters carried alongside them
    pub fn inference_bindings(&self) -> Result<InferenceTileParameter, ConfigError> {
        Ok(InferenceTileParameter {
            tile: self.as_bindings()?,
            noise_model: self.noise_model.clone(),
            drift_compensation: self.drift_compensation.clone(),
            clip: self.clip.clone(),
            modifier: self.modifier.clone(),
        })
    }
}

impl RpuConfig for InferenceRpuConfig {
    const BINDINGS_CLASS: BindingsClass = BindingsClass::AnalogTile;

    fn requires_diffusion(&self) -> bool {
        self.device.diffusion > 0.0
    }

    fn requires_decay(&self) -> bool {
        self.device.lifetime > 0.0
    }

    fn device_summary(&self) -> DeviceSummary {
        DeviceSummary {
            kind: "ideal",
            n_devices: 1,
            diffusion: self.device.diffusion,
            lifetime: self.device.lifetime,
            requires_diffusion: self.requires_diffusion(),
            requires_decay: self.requires_decay(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.device.validate()?;
        self.forward.validate()?;
        self.backward.validate()?;
        self.update.validate()?;
        self.validate_runtime()
    }
}

impl AnalogRpuConfig for InferenceRpuConfig {
    fn as_bindings(&self) -> Result<AnalogTileParameter, ConfigError> {
        tile_parameters_to_bindings(AnalogConfigRef::Inference(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::DeviceParameter;
    use crate::inference::PcmLikeNoiseModel;
    use crate::parameters::PulseType;

    #[test]
    fn test_fixed_fields() {
        let config = InferenceRpuConfig::default();
        assert_eq!(config.device(), &IdealDevice::default());
        assert_eq!(config.backward(), &IoParameters::perfect());
        assert_eq!(config.update().pulse_type, PulseType::None);
        assert!(!config.requires_diffusion());
        assert!(!config.requires_decay());
    }

    #[test]
    fn test_new_rejects_invalid_forward() {
        let forward = IoParameters {
            out_noise: -5.0,
            ..IoParameters::default()
        };
        assert!(matches!(
            InferenceRpuConfig::new(forward),
            Err(ConfigError::InvalidParameter { bundle: "IoParameters", field: "out_noise", .. })
        ));
    }

    #[test]
    fn test_capabilities_read_device_field() {
        let mut config = InferenceRpuConfig::default();
        config.device.lifetime = 5.0;
        assert!(config.requires_decay());
        assert!(!config.requires_diffusion());
    }

    #[test]
    fn test_runtime_parameters_stay_out_of_tile() {
        let config = InferenceRpuConfig::default().with_drift_compensation(None);
        let bindings = config.inference_bindings().unwrap();
        assert!(matches!(bindings.tile.device, DeviceParameter::Ideal(_)));
        assert!(bindings.tile.backward_io.is_perfect);
        assert_eq!(bindings.tile.update.pulse_type, PulseType::None.code());
        assert_eq!(bindings.drift_compensation, None);
        assert_eq!(bindings.noise_model, InferenceNoiseModel::default());
    }

    #[test]
    fn test_invalid_noise_model_fails_translation() {
        let config = InferenceRpuConfig::default().with_noise_model(InferenceNoiseModel::PcmLike(
            PcmLikeNoiseModel {
                t_0: -1.0,
                ..PcmLikeNoiseModel::default()
            },
        ));
        assert!(matches!(
            config.as_bindings(),
            Err(ConfigError::InvalidParameter { field: "t_0", .. })
        ));
    }
}
