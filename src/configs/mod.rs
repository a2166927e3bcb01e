//! RPU configurations
//!
//! Four mutually exclusive configuration kinds bundle a device model with I/O,
//! update and (for inference) noise parameters:
//! - [`FloatingPointRpuConfig`]: floating point tile, optional decay/diffusion
//! - [`SingleRpuConfig`]: analog tile with one pulsed device
//! - [`UnitCellRpuConfig`]: analog tile with a composite of pulsed devices
//! - [`InferenceRpuConfig`]: hardware-aware training with ideal backward/update,
//!   plus statistical inference noise
//!
//! The three analog kinds translate to the same native tile parameter block.

/// Floating point configuration
pub mod floating_point;
/// Inference-only configuration
pub mod inference;
/// YAML configuration files
pub mod loader;
/// Single pulsed device configuration
pub mod single;
/// Unit cell configuration
pub mod unit_cell;

use serde::{Deserialize, Serialize};

use crate::bindings::AnalogTileParameter;
use crate::parameters::{IoParameters, UpdateParameters};
use crate::ConfigError;

pub use floating_point::FloatingPointRpuConfig;
pub use inference::InferenceRpuConfig;
pub use single::SingleRpuConfig;
pub use unit_cell::UnitCellRpuConfig;

/// Native parameter type a configuration kind maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingsClass {
    /// Floating point tile, handled by its own native path
    FloatingPointTile,
    /// Analog tile parameter block
    AnalogTile,
}

impl BindingsClass {
    /// Native type name
    pub fn name(self) -> &'static str {
        match self {
            BindingsClass::FloatingPointTile => "FloatingPointTileParameter",
            BindingsClass::AnalogTile => "AnalogTileParameter",
        }
    }
}

/// Capabilities shared by every configuration kind
pub trait RpuConfig {
    /// Native parameter type of this kind
    const BINDINGS_CLASS: BindingsClass;

    /// Whether a periodic diffusion pass is needed
    fn requires_diffusion(&self) -> bool;

    /// Whether a periodic decay pass is needed
    fn requires_decay(&self) -> bool;

    /// Summary of the device physics
    fn device_summary(&self) -> DeviceSummary;

    /// Validates every nested parameter bundle
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Configurations that translate to an analog tile parameter block
pub trait AnalogRpuConfig: RpuConfig {
    /// Native analog tile parameters for the current field values
    fn as_bindings(&self) -> Result<AnalogTileParameter, ConfigError>;
}

/// Device physics at a glance
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSummary {
    /// Device model name
    pub kind: &'static str,
    /// Number of physical devices per weight
    pub n_devices: usize,
    /// Largest diffusion over all devices
    pub diffusion: f64,
    /// Largest lifetime over all devices
    pub lifetime: f64,
    /// Whether any device diffuses
    pub requires_diffusion: bool,
    /// Whether any device decays
    pub requires_decay: bool,
}

impl std::fmt::Display for DeviceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} ({} device(s)): diffusion={} lifetime={} requires_diffusion={} requires_decay={}",
            self.kind, self.n_devices, self.diffusion, self.lifetime, self.requires_diffusion, self.requires_decay
        )
    }
}

/// Any configuration kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RpuConfigKind {
    /// Floating point tile
    FloatingPoint(FloatingPointRpuConfig),
    /// One pulsed device per weight
    Single(SingleRpuConfig),
    /// Unit cell of pulsed devices per weight
    UnitCell(UnitCellRpuConfig),
    /// Inference-only tile
    Inference(InferenceRpuConfig),
}

impl From<FloatingPointRpuConfig> for RpuConfigKind {
    fn from(config: FloatingPointRpuConfig) -> Self {
        RpuConfigKind::FloatingPoint(config)
    }
}

impl From<SingleRpuConfig> for RpuConfigKind {
    fn from(config: SingleRpuConfig) -> Self {
        RpuConfigKind::Single(config)
    }
}

impl From<UnitCellRpuConfig> for RpuConfigKind {
    fn from(config: UnitCellRpuConfig) -> Self {
        RpuConfigKind::UnitCell(config)
    }
}

impl From<InferenceRpuConfig> for RpuConfigKind {
    fn from(config: InferenceRpuConfig) -> Self {
        RpuConfigKind::Inference(config)
    }
}

impl RpuConfigKind {
    /// Name of the configuration kind
    pub fn name(&self) -> &'static str {
        match self {
            RpuConfigKind::FloatingPoint(_) => "floating_point",
            RpuConfigKind::Single(_) => "single",
            RpuConfigKind::UnitCell(_) => "unit_cell",
            RpuConfigKind::Inference(_) => "inference",
        }
    }

    /// Native parameter type of the wrapped kind
    pub fn bindings_class(&self) -> BindingsClass {
        match self {
            RpuConfigKind::FloatingPoint(_) => FloatingPointRpuConfig::BINDINGS_CLASS,
            RpuConfigKind::Single(_) => SingleRpuConfig::BINDINGS_CLASS,
            RpuConfigKind::UnitCell(_) => UnitCellRpuConfig::BINDINGS_CLASS,
            RpuConfigKind::Inference(_) => InferenceRpuConfig::BINDINGS_CLASS,
        }
    }

    /// Whether a periodic diffusion pass is needed
    pub fn requires_diffusion(&self) -> bool {
        match self {
            RpuConfigKind::FloatingPoint(c) => c.requires_diffusion(),
            RpuConfigKind::Single(c) => c.requires_diffusion(),
            RpuConfigKind::UnitCell(c) => c.requires_diffusion(),
            RpuConfigKind::Inference(c) => c.requires_diffusion(),
        }
    }

    /// Whether a periodic decay pass is needed
    pub fn requires_decay(&self) -> bool {
        match self {
            RpuConfigKind::FloatingPoint(c) => c.requires_decay(),
            RpuConfigKind::Single(c) => c.requires_decay(),
            RpuConfigKind::UnitCell(c) => c.requires_decay(),
            RpuConfigKind::Inference(c) => c.requires_decay(),
        }
    }

    /// Summary of the device physics
    pub fn device_summary(&self) -> DeviceSummary {
        match self {
            RpuConfigKind::FloatingPoint(c) => c.device_summary(),
            RpuConfigKind::Single(c) => c.device_summary(),
            RpuConfigKind::UnitCell(c) => c.device_summary(),
            RpuConfigKind::Inference(c) => c.device_summary(),
        }
    }

    /// Validates every nested parameter bundle
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            RpuConfigKind::FloatingPoint(c) => c.validate(),
            RpuConfigKind::Single(c) => c.validate(),
            RpuConfigKind::UnitCell(c) => c.validate(),
            RpuConfigKind::Inference(c) => c.validate(),
        }
    }

    /// Analog tile parameters; floating point configurations have none
    pub fn as_bindings(&self) -> Result<AnalogTileParameter, ConfigError> {
        match self {
            RpuConfigKind::FloatingPoint(_) => Err(ConfigError::UnsupportedTranslation(format!(
                "floating point configurations map to {}, not {}",
                BindingsClass::FloatingPointTile.name(),
                BindingsClass::AnalogTile.name()
            ))),
            RpuConfigKind::Single(c) => c.as_bindings(),
            RpuConfigKind::UnitCell(c) => c.as_bindings(),
            RpuConfigKind::Inference(c) => c.as_bindings(),
        }
    }

    /// Forward I/O, if the kind has one
    pub fn forward(&self) -> Option<&IoParameters> {
        match self {
            RpuConfigKind::FloatingPoint(_) => None,
            RpuConfigKind::Single(c) => Some(&c.forward),
            RpuConfigKind::UnitCell(c) => Some(&c.forward),
            RpuConfigKind::Inference(c) => Some(&c.forward),
        }
    }

    /// Replaces the backward I/O; fixed for inference configurations
    pub fn set_backward(&mut self, backward: IoParameters) -> Result<(), ConfigError> {
        match self {
            RpuConfigKind::FloatingPoint(_) => Err(ConfigError::invalid(
                "FloatingPointRpuConfig",
                "backward",
                "floating point configurations have no backward I/O",
            )),
            RpuConfigKind::Single(c) => {
                c.backward = backward;
                Ok(())
            }
            RpuConfigKind::UnitCell(c) => {
                c.backward = backward;
                Ok(())
            }
            RpuConfigKind::Inference(_) => Err(ConfigError::ReadOnlyField("backward")),
        }
    }

    /// Replaces the update parameters; fixed for inference configurations
    pub fn set_update(&mut self, update: UpdateParameters) -> Result<(), ConfigError> {
        match self {
            RpuConfigKind::FloatingPoint(_) => Err(ConfigError::invalid(
                "FloatingPointRpuConfig",
                "update",
                "floating point configurations have no update parameters",
            )),
            RpuConfigKind::Single(c) => {
                c.update = update;
                Ok(())
            }
            RpuConfigKind::UnitCell(c) => {
                c.update = update;
                Ok(())
            }
            RpuConfigKind::Inference(_) => Err(ConfigError::ReadOnlyField("update")),
        }
    }
}
