// configs/floating_point.rs

// Floating point tile: no analog non-idealities besides optional decay and
// diffusion of the weights.

// Dependencies
use serde::{Deserialize, Serialize};

use super::{BindingsClass, DeviceSummary, RpuConfig};
use crate::devices::FloatingPointDevice;
use crate::ConfigError;

/// Configuration for a floating point resistive processing unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloatingPointRpuConfig {
    /// Decay and diffusion of the floating point weights
    pub device: FloatingPointDevice,
}

impl FloatingPointRpuConfig {
    /// Configuration around the given device
    pub fn new(device: FloatingPointDevice) -> Result<Self, ConfigError> {
        let config = FloatingPointRpuConfig { device };
        config.validate()?;
        Ok(config)
    }
}

impl RpuConfig for FloatingPointRpuConfig {
    const BINDINGS_CLASS: BindingsClass = BindingsClass::FloatingPointTile;

    fn requires_diffusion(&self) -> bool {
        self.device.diffusion > 0.0
    }

    fn requires_decay(&self) -> bool {
        self.device.lifetime > 0.0
    }

    fn device_summary(&self) -> DeviceSummary {
        DeviceSummary {
            kind: "floating_point",
            n_devices: 1,
            diffusion: self.device.diffusion,
            lifetime: self.device.lifetime,
            requires_diffusion: self.requires_diffusion(),
            requires_decay: self.requires_decay(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.device.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_device() {
        let mut config = FloatingPointRpuConfig::default();
        assert!(!config.requires_diffusion());
        assert!(!config.requires_decay());

        config.device.lifetime = 1000.0;
        assert!(config.requires_decay());
        assert!(!config.requires_diffusion());

        config.device.diffusion = 1e-3;
        assert!(config.requires_diffusion());
        assert_eq!(config.device_summary().lifetime, 1000.0);
    }

    #[test]
    fn test_new_validates_device() {
        let config = FloatingPointRpuConfig::new(FloatingPointDevice {
            lifetime: 20.0,
            ..FloatingPointDevice::default()
        })
        .unwrap();
        assert!(config.requires_decay());

        let result = FloatingPointRpuConfig::new(FloatingPointDevice {
            diffusion: -0.5,
            ..FloatingPointDevice::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidParameter { field: "diffusion", .. })));
    }
}
