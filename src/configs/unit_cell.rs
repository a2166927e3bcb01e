// configs/unit_cell.rs

// Analog tile backed by a unit cell: several pulsed devices jointly represent one
// weight. Capability flags are the OR over all devices of the cell.

// Dependencies
use serde::{Deserialize, Serialize};

use super::{AnalogRpuConfig, BindingsClass, DeviceSummary, RpuConfig};
use crate::bindings::{tile_parameters_to_bindings, AnalogConfigRef, AnalogTileParameter};
use crate::devices::UnitCellDevice;
use crate::parameters::{IoParameters, UpdateParameters};
use crate::ConfigError;

/// Configuration for an analog (unit cell) resistive processing unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitCellRpuConfig {
    /// Unit cell devices, in cell order
    pub device: UnitCellDevice,
    /// Input-output parameter setting for the forward direction
    pub forward: IoParameters,
    /// Input-output parameter setting for the backward direction
    pub backward: IoParameters,
    /// Parameters for the update behavior
    pub update: UpdateParameters,
}

impl UnitCellRpuConfig {
    /// Configuration around the given unit cell; the cell must not be empty and
    /// every device must be in range
    pub fn new(device: UnitCellDevice) -> Result<Self, ConfigError> {
        let config = UnitCellRpuConfig {
            device,
            ..UnitCellRpuConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

impl RpuConfig for UnitCellRpuConfig {
    const BINDINGS_CLASS: BindingsClass = BindingsClass::AnalogTile;

    fn requires_diffusion(&self) -> bool {
        self.device.unit_cell_devices().iter().any(|dev| dev.diffusion > 0.0)
    }

    fn requires_decay(&self) -> bool {
        self.device.unit_cell_devices().iter().any(|dev| dev.lifetime > 0.0)
    }

    fn device_summary(&self) -> DeviceSummary {
        let devices = self.device.unit_cell_devices();
        DeviceSummary {
            kind: self.device.name(),
            n_devices: devices.len(),
            diffusion: devices.iter().map(|dev| dev.diffusion).fold(0.0, f64::max),
            lifetime: devices.iter().map(|dev| dev.lifetime).fold(0.0, f64::max),
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

impl AnalogRpuConfig for UnitCellRpuConfig {
    fn as_bindings(&self) -> Result<AnalogTileParameter, ConfigError> {
        tile_parameters_to_bindings(AnalogConfigRef::UnitCell(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{PulsedDevice, VectorUnitCellDevice};

    #[test]
    fn test_new_rejects_empty_cell() {
        let cell = UnitCellDevice::Vector(VectorUnitCellDevice::default());
        assert_eq!(UnitCellRpuConfig::new(cell), Err(ConfigError::EmptyUnitCell));
    }

    #[test]
    fn test_new_rejects_invalid_sub_device() {
        let cell = UnitCellDevice::Vector(VectorUnitCellDevice::new(vec![
            PulsedDevice::default(),
            PulsedDevice {
                dw_min: -1.0,
                ..PulsedDevice::default()
            },
        ]));
        assert!(matches!(
            UnitCellRpuConfig::new(cell),
            Err(ConfigError::InvalidParameter { field: "dw_min", .. })
        ));
    }

    #[test]
    fn test_emptied_after_construction_fails_translation() {
        let mut config = UnitCellRpuConfig::default();
        config.device.unit_cell_devices_mut().clear();
        assert_eq!(config.as_bindings(), Err(ConfigError::EmptyUnitCell));
        assert!(!config.requires_decay());
    }

    #[test]
    fn test_summary_takes_maxima() {
        let cell = UnitCellDevice::Vector(VectorUnitCellDevice::new(vec![
            PulsedDevice::default().with_lifetime(10.0),
            PulsedDevice::default().with_diffusion(0.2),
            PulsedDevice::default().with_lifetime(50.0),
        ]));
        let summary = UnitCellRpuConfig::new(cell).unwrap().device_summary();
        assert_eq!(summary.n_devices, 3);
        assert_eq!(summary.lifetime, 50.0);
        assert_eq!(summary.diffusion, 0.2);
        assert!(summary.requires_decay && summary.requires_diffusion);
    }
}
