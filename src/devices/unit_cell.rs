// devices/unit_cell.rs

// Composite devices: several pulsed devices that jointly represent one logical
// weight. The order of `unit_cell_devices` is the role of each device inside the
// cell (e.g. plus/minus of a differential pair, fast/slow of a transfer compound).

// Dependencies
use serde::{Deserialize, Serialize};

use super::PulsedDevice;
use crate::parameters::{IoParameters, UpdateParameters};
use crate::{check_non_negative, check_probability, ConfigError};

/// Which device(s) of a vector unit cell receive an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorUnitCellUpdatePolicy {
    /// Update all devices
    #[default]
    All,
    /// Always update the device at `first_update_idx`
    SingleFixed,
    /// Round-robin over the devices
    SingleSequential,
    /// Pick one device at random per update
    SingleRandom,
}

impl VectorUnitCellUpdatePolicy {
    /// Native enum code
    pub fn code(self) -> i32 {
        match self {
            VectorUnitCellUpdatePolicy::All => 0,
            VectorUnitCellUpdatePolicy::SingleFixed => 1,
            VectorUnitCellUpdatePolicy::SingleSequential => 2,
            VectorUnitCellUpdatePolicy::SingleRandom => 3,
        }
    }
}

/// Weight is the (gamma-weighted) sum of all devices in the cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VectorUnitCellDevice {
    /// Devices of the cell, in order
    pub unit_cell_devices: Vec<PulsedDevice>,
    /// Update policy
    pub update_policy: VectorUnitCellUpdatePolicy,
    /// Device updated first (and only, for `SingleFixed`)
    pub first_update_idx: usize,
    /// Per-device weighting of the read-out (empty means all ones)
    pub gamma_vec: Vec<f64>,
}

impl VectorUnitCellDevice {
    /// Vector unit cell with default policy
    pub fn new(unit_cell_devices: Vec<PulsedDevice>) -> Self {
        VectorUnitCellDevice {
            unit_cell_devices,
            ..VectorUnitCellDevice::default()
        }
    }
}

/// Differential pair: weight is the difference of the two devices
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DifferenceUnitCellDevice {
    /// Plus device followed by minus device
    pub unit_cell_devices: Vec<PulsedDevice>,
}

impl DifferenceUnitCellDevice {
    /// Differential pair built from `plus` and `minus`
    pub fn pair(plus: PulsedDevice, minus: PulsedDevice) -> Self {
        DifferenceUnitCellDevice {
            unit_cell_devices: vec![plus, minus],
        }
    }
}

/// Transfer compound: gradients go to the first device and are periodically
/// transferred down the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransferCompound {
    /// Devices of the cell, fastest first
    pub unit_cell_devices: Vec<PulsedDevice>,
    /// Weighting of the last device relative to the others
    pub gamma: f64,
    /// Explicit per-device weighting (overrides `gamma`)
    pub gamma_vec: Vec<f64>,
    /// Transfer period, in mini-batches or vectors (see `units_in_mbatch`)
    pub transfer_every: f64,
    /// Per-link transfer period
    pub transfer_every_vec: Vec<f64>,
    /// Skip transferring a device onto itself
    pub no_self_transfer: bool,
    /// `transfer_every` counts mini-batches instead of single vectors
    pub units_in_mbatch: bool,
    /// Columns transferred per transfer event
    pub n_cols_per_transfer: usize,
    /// Probability of resetting the source column after transfer
    pub with_reset_prob: f64,
    /// Transfer a random column instead of the next one
    pub random_column: bool,
    /// Learning rate of the transfer update
    pub transfer_lr: f64,
    /// Per-link transfer learning rate
    pub transfer_lr_vec: Vec<f64>,
    /// Scale the transfer learning rate with the optimizer learning rate
    pub scale_transfer_lr: bool,
    /// I/O of the transfer read-out
    pub transfer_forward: IoParameters,
    /// Update of the transfer write
    pub transfer_update: UpdateParameters,
}

impl Default for TransferCompound {
    fn default() -> Self {
        TransferCompound {
            unit_cell_devices: Vec::new(),
            gamma: 0.0,
            gamma_vec: Vec::new(),
            transfer_every: 0.0,
            transfer_every_vec: Vec::new(),
            no_self_transfer: true,
            units_in_mbatch: false,
            n_cols_per_transfer: 1,
            with_reset_prob: 0.0,
            random_column: false,
            transfer_lr: 1.0,
            transfer_lr_vec: Vec::new(),
            scale_transfer_lr: true,
            transfer_forward: IoParameters::default(),
            transfer_update: UpdateParameters::default(),
        }
    }
}

impl TransferCompound {
    /// Transfer compound over the given chain of devices
    pub fn new(unit_cell_devices: Vec<PulsedDevice>) -> Self {
        TransferCompound {
            unit_cell_devices,
            ..TransferCompound::default()
        }
    }
}

/// Unit cell: an ordered, homogeneous collection of pulsed devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnitCellDevice {
    /// Sum of devices
    Vector(VectorUnitCellDevice),
    /// Difference of a pair
    Difference(DifferenceUnitCellDevice),
    /// Transfer chain
    Transfer(TransferCompound),
}

impl Default for UnitCellDevice {
    fn default() -> Self {
        UnitCellDevice::Vector(VectorUnitCellDevice::new(vec![
            PulsedDevice::constant_step(),
            PulsedDevice::constant_step(),
        ]))
    }
}

impl UnitCellDevice {
    /// Short name used in summaries
    pub fn name(&self) -> &'static str {
        match self {
            UnitCellDevice::Vector(_) => "vector_unit_cell",
            UnitCellDevice::Difference(_) => "difference_unit_cell",
            UnitCellDevice::Transfer(_) => "transfer_compound",
        }
    }

    /// Sub-devices, in cell order
    pub fn unit_cell_devices(&self) -> &[PulsedDevice] {
        match self {
            UnitCellDevice::Vector(cell) => &cell.unit_cell_devices,
            UnitCellDevice::Difference(cell) => &cell.unit_cell_devices,
            UnitCellDevice::Transfer(cell) => &cell.unit_cell_devices,
        }
    }

    /// Mutable access to the sub-devices
    pub fn unit_cell_devices_mut(&mut self) -> &mut Vec<PulsedDevice> {
        match self {
            UnitCellDevice::Vector(cell) => &mut cell.unit_cell_devices,
            UnitCellDevice::Difference(cell) => &mut cell.unit_cell_devices,
            UnitCellDevice::Transfer(cell) => &mut cell.unit_cell_devices,
        }
    }

    /// Number of sub-devices
    pub fn len(&self) -> usize {
        self.unit_cell_devices().len()
    }

    /// Whether the cell has no sub-device
    pub fn is_empty(&self) -> bool {
        self.unit_cell_devices().is_empty()
    }

    /// Validates the cell and every sub-device
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Err(ConfigError::EmptyUnitCell);
        }
        for device in self.unit_cell_devices() {
            device.validate()?;
        }

        if let UnitCellDevice::Transfer(cell) = self {
            const B: &str = "TransferCompound";
            check_non_negative(B, "transfer_every", cell.transfer_every)?;
            check_probability(B, "with_reset_prob", cell.with_reset_prob)?;
            check_non_negative(B, "transfer_lr", cell.transfer_lr)?;
            if cell.n_cols_per_transfer == 0 {
                return Err(ConfigError::invalid(B, "n_cols_per_transfer", "must be >= 1"));
            }
            cell.transfer_forward.validate()?;
            cell.transfer_update.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_has_two_devices() {
        let cell = UnitCellDevice::default();
        assert_eq!(cell.name(), "vector_unit_cell");
        assert_eq!(cell.len(), 2);
        assert!(cell.validate().is_ok());
    }

    #[test]
    fn test_empty_cell_rejected() {
        let cell = UnitCellDevice::Transfer(TransferCompound::default());
        assert_eq!(cell.validate(), Err(ConfigError::EmptyUnitCell));
    }

    #[test]
    fn test_mutating_devices_through_enum() {
        let mut cell = UnitCellDevice::Difference(DifferenceUnitCellDevice::pair(
            PulsedDevice::soft_bounds(),
            PulsedDevice::soft_bounds(),
        ));
        cell.unit_cell_devices_mut()[1].lifetime = 100.0;
        assert_eq!(cell.unit_cell_devices()[1].lifetime, 100.0);
        assert_eq!(cell.unit_cell_devices()[0].lifetime, 0.0);
    }

    #[test]
    fn test_policy_codes() {
        assert_eq!(VectorUnitCellUpdatePolicy::All.code(), 0);
        assert_eq!(VectorUnitCellUpdatePolicy::SingleRandom.code(), 3);
    }
}
