// configs/single.rs

// Analog tile whose weights are realized by one pulsed device, with independent
// forward/backward I/O and update settings.

// Dependencies
use serde::{Deserialize, Serialize};

use super::{AnalogRpuConfig, BindingsClass, DeviceSummary, RpuConfig};
use crate::bindings::{tile_parameters_to_bindings, AnalogConfigRef, AnalogTileParameter};
use crate::devices::PulsedDevice;
use crate::parameters::{IoParameters, UpdateParameters};
use crate::ConfigError;

/// Configuration for an analog (pulsed device) resistive processing unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingleRpuConfig {
    /// Parameters that modify the behavior of the pulsed device
    pub device: PulsedDevice,
    /// Input-output parameter setting for the forward direction
    pub forward: IoParameters,
    /// Input-output parameter setting for the backward direction
    pub backward: IoParameters,
    /// Parameters for the update behavior
    pub update: UpdateParameters,
}

impl SingleRpuConfig {
    /// Configuration around the given device, other fields at their defaults
    pub fn new(device: PulsedDevice) -> Result<Self, ConfigError> {
        let config = SingleRpuConfig {
            device,
            ..SingleRpuConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

impl RpuConfig for SingleRpuConfig {
    const BINDINGS_CLASS: BindingsClass = BindingsClass::AnalogTile;

    fn requires_diffusion(&self) -> bool {
        self.device.diffusion > 0.0
    }

    fn requires_decay(&self) -> bool {
        self.device.lifetime > 0.0
    }

    fn device_summary(&self) -> DeviceSummary {
        DeviceSummary {
            kind: self.device.step.name(),
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
        self.update.validate()
    }
}

impl AnalogRpuConfig for SingleRpuConfig {
    fn as_bindings(&self) -> Result<AnalogTileParameter, ConfigError> {
        tile_parameters_to_bindings(AnalogConfigRef::Single(self))
    }
}
