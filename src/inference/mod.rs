//! Inference noise models
//!
//! Statistical models of what happens to analog weights after training: programming
//! noise when the weights are written, conductance drift over time, read noise,
//! and the compensation strategy used to undo the global drift.

/// Drift compensation
pub mod drift;
/// Statistical inference noise models
pub mod noise;

pub use drift::{drift_alpha, DriftCompensation, GlobalDriftCompensation};
pub use noise::{InferenceNoiseModel, NoiseModel, PcmLikeNoiseModel};
