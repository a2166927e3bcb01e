//! RPU configuration library
//!
//! This library describes how resistive processing units (RPUs) behave inside a
//! simulated analog tile: which device model realizes the weights, how noisy the
//! forward and backward passes are, how updates are pulsed, and (for inference)
//! which programming/drift noise model applies. Every analog configuration can be
//! translated into the flat parameter block consumed by the native simulator.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod bindings;
pub mod configs;
pub mod devices;
pub mod inference;
pub mod parameters;

// Re-export commonly used items for easier access
pub use bindings::{AnalogTileParameter, DeviceParameter, InferenceTileParameter};
pub use configs::{
    AnalogRpuConfig, BindingsClass, DeviceSummary, FloatingPointRpuConfig, InferenceRpuConfig,
    RpuConfig, RpuConfigKind, SingleRpuConfig, UnitCellRpuConfig,
};
pub use devices::{FloatingPointDevice, IdealDevice, PulsedDevice, StepModel, UnitCellDevice};
pub use inference::{DriftCompensation, GlobalDriftCompensation, InferenceNoiseModel, NoiseModel};
pub use parameters::{IoParameters, PulseType, UpdateParameters, WeightClipParameter, WeightModifierParameter};

/// RPU configuration error types
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A nested parameter bundle rejected one of its values
    InvalidParameter {
        /// Bundle that owns the field (e.g. "PulsedDevice")
        bundle: &'static str,
        /// Offending field
        field: &'static str,
        /// Violated constraint
        reason: String,
    },
    /// A unit cell without any sub-device
    EmptyUnitCell,
    /// Attempt to write a field that is fixed for this configuration kind
    ReadOnlyField(&'static str),
    /// Field combination the native simulator cannot represent
    Translation(String),
    /// Configuration kind has no analog tile bindings
    UnsupportedTranslation(String),
    /// Configuration file could not be read or written
    Io(String),
    /// Configuration file could not be parsed
    Parse(String),
}

impl ConfigError {
    pub(crate) fn invalid(bundle: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            bundle,
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { bundle, field, reason } => {
                write!(f, "Invalid parameter {}.{}: {}", bundle, field, reason)
            }
            ConfigError::EmptyUnitCell => write!(f, "Unit cell has no devices"),
            ConfigError::ReadOnlyField(field) => write!(f, "Field is read-only: {}", field),
            ConfigError::Translation(msg) => write!(f, "Translation error: {}", msg),
            ConfigError::UnsupportedTranslation(msg) => write!(f, "Unsupported translation: {}", msg),
            ConfigError::Io(msg) => write!(f, "Configuration I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Configuration parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Checks that `value` is finite and non-negative.
pub(crate) fn check_non_negative(bundle: &'static str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::invalid(bundle, field, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(ConfigError::invalid(bundle, field, format!("must be >= 0, got {}", value)));
    }
    Ok(())
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn check_positive(bundle: &'static str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::invalid(bundle, field, format!("must be > 0, got {}", value)));
    }
    Ok(())
}

/// Checks that `value` is a probability.
pub(crate) fn check_probability(bundle: &'static str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(bundle, field, format!("must be in [0, 1], got {}", value)));
    }
    Ok(())
}
