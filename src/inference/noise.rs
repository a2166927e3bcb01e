// inference/noise.rs

// Closed-form statistics of the programming, drift and read noise of phase-change
// memory (PCM) devices. Only the distribution parameters are computed here; the
// inference runtime draws the actual samples.

// Dependencies
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{check_non_negative, check_positive, ConfigError};

// Smallest relative conductance considered in log terms
const ZERO_CLIP: f64 = 1e-7;

/// Statistics of a noise model, all conductances in micro-Siemens
#[cfg_attr(test, mockall::automock)]
pub trait NoiseModel {
    /// Std of the programming noise for a target conductance
    fn programming_noise_std(&self, g_target: f64) -> f64;

    /// Mean drift exponent for a target conductance
    fn drift_nu_mean(&self, g_target: f64) -> f64;

    /// Std of the drift exponent for a target conductance
    fn drift_nu_std(&self, g_target: f64) -> f64;

    /// Multiplicative conductance factor after `t_inference` seconds for drift exponent `nu`
    fn drift_factor(&self, nu: f64, t_inference: f64) -> f64;

    /// Std of the read noise of a (drifted) conductance after `t_inference` seconds
    fn read_noise_std(&self, g_drift: f64, t_inference: f64) -> f64;
}

/// PCM-like noise model fitted on phase-change memory measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PcmLikeNoiseModel {
    /// Programming noise polynomial in the relative conductance (constant term first)
    pub prog_coeff: Vector3<f64>,
    /// Maximal conductance (uS)
    pub g_max: f64,
    /// Read pulse duration (s)
    pub t_read: f64,
    /// Time between programming and the first read (s)
    pub t_0: f64,
    /// Scale of the programming noise
    pub prog_noise_scale: f64,
    /// Scale of the read noise
    pub read_noise_scale: f64,
    /// Scale of the drift exponent variation
    pub drift_scale: f64,
}

impl Default for PcmLikeNoiseModel {
    fn default() -> Self {
        PcmLikeNoiseModel {
            prog_coeff: Vector3::new(0.26348, 1.9650, -1.1731),
            g_max: 25.0,
            t_read: 250.0e-9,
            t_0: 20.0,
            prog_noise_scale: 1.0,
            read_noise_scale: 1.0,
            drift_scale: 1.0,
        }
    }
}

impl PcmLikeNoiseModel {
    fn relative(&self, g: f64) -> f64 {
        (g / self.g_max).abs().max(ZERO_CLIP)
    }

    /// Validates ranges of all fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        const B: &str = "PcmLikeNoiseModel";
        if self.prog_coeff.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::invalid(B, "prog_coeff", "coefficients must be finite"));
        }
        check_positive(B, "g_max", self.g_max)?;
        check_positive(B, "t_read", self.t_read)?;
        check_positive(B, "t_0", self.t_0)?;
        check_non_negative(B, "prog_noise_scale", self.prog_noise_scale)?;
        check_non_negative(B, "read_noise_scale", self.read_noise_scale)?;
        check_non_negative(B, "drift_scale", self.drift_scale)
    }
}

impl NoiseModel for PcmLikeNoiseModel {
    fn programming_noise_std(&self, g_target: f64) -> f64 {
        let g_rel = g_target / self.g_max;
        let powers = Vector3::new(1.0, g_rel, g_rel * g_rel);
        // Polynomial was fitted for g_max = 25 uS
        let sigma = self.prog_coeff.dot(&powers).max(0.0) * self.g_max / 25.0;
        sigma * self.prog_noise_scale
    }

    fn drift_nu_mean(&self, g_target: f64) -> f64 {
        let g_rel = self.relative(g_target);
        (-0.0155 * g_rel.ln() + 0.0244).clamp(0.049, 0.1)
    }

    fn drift_nu_std(&self, g_target: f64) -> f64 {
        let g_rel = self.relative(g_target);
        (-0.0125 * g_rel.ln() - 0.0059).clamp(0.008, 0.045) * self.drift_scale
    }

    fn drift_factor(&self, nu: f64, t_inference: f64) -> f64 {
        if t_inference <= 0.0 {
            return 1.0;
        }
        ((t_inference + self.t_0) / self.t_0).powf(-nu)
    }

    fn read_noise_std(&self, g_drift: f64, t_inference: f64) -> f64 {
        let g_rel = (g_drift / self.g_max).abs().powf(0.65).max(1e-3);
        let q_s = (0.0088 / g_rel).min(0.2);
        let log_term = ((t_inference + self.t_read) / (2.0 * self.t_read)).ln().max(0.0);
        g_drift.abs() * q_s * log_term.sqrt() * self.read_noise_scale
    }
}

/// Noise model used by an inference configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InferenceNoiseModel {
    /// PCM-like statistics
    PcmLike(PcmLikeNoiseModel),
    /// No noise and no drift
    Null,
}

impl Default for InferenceNoiseModel {
    fn default() -> Self {
        InferenceNoiseModel::PcmLike(PcmLikeNoiseModel::default())
    }
}

impl InferenceNoiseModel {
    /// Short name used in summaries
    pub fn name(&self) -> &'static str {
        match self {
            InferenceNoiseModel::PcmLike(_) => "pcm_like",
            InferenceNoiseModel::Null => "null",
        }
    }

    /// Validates the model parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            InferenceNoiseModel::PcmLike(model) => model.validate(),
            InferenceNoiseModel::Null => Ok(()),
        }
    }
}

impl NoiseModel for InferenceNoiseModel {
    fn programming_noise_std(&self, g_target: f64) -> f64 {
        match self {
            InferenceNoiseModel::PcmLike(model) => model.programming_noise_std(g_target),
            InferenceNoiseModel::Null => 0.0,
        }
    }

    fn drift_nu_mean(&self, g_target: f64) -> f64 {
        match self {
            InferenceNoiseModel::PcmLike(model) => model.drift_nu_mean(g_target),
            InferenceNoiseModel::Null => 0.0,
        }
    }

    fn drift_nu_std(&self, g_target: f64) -> f64 {
        match self {
            InferenceNoiseModel::PcmLike(model) => model.drift_nu_std(g_target),
            InferenceNoiseModel::Null => 0.0,
        }
    }

    fn drift_factor(&self, nu: f64, t_inference: f64) -> f64 {
        match self {
            InferenceNoiseModel::PcmLike(model) => model.drift_factor(nu, t_inference),
            InferenceNoiseModel::Null => 1.0,
        }
    }

    fn read_noise_std(&self, g_drift: f64, t_inference: f64) -> f64 {
        match self {
            InferenceNoiseModel::PcmLike(model) => model.read_noise_std(g_drift, t_inference),
            InferenceNoiseModel::Null => 0.0,
        }
    }
}

/// Expected conductance after drift, using the mean drift exponent
pub fn expected_drifted_conductance(model: &dyn NoiseModel, g_target: f64, t_inference: f64) -> f64 {
    let nu = model.drift_nu_mean(g_target);
    g_target * model.drift_factor(nu, t_inference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use rstest::rstest;

    #[test]
    fn test_programming_noise_polynomial() {
        let model = PcmLikeNoiseModel::default();
        assert!((model.programming_noise_std(0.0) - 0.26348).abs() < 1e-12);
        let expected = 0.26348 + 1.9650 - 1.1731;
        assert!((model.programming_noise_std(25.0) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(1e-9, 0.1)] // tiny conductance: upper clamp
    #[case(25.0, 0.049)] // full conductance: lower clamp
    fn test_drift_mean_clamped(#[case] g: f64, #[case] expected: f64) {
        let model = PcmLikeNoiseModel::default();
        assert!((model.drift_nu_mean(g) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_drift_std_scaled() {
        let model = PcmLikeNoiseModel {
            drift_scale: 2.0,
            ..PcmLikeNoiseModel::default()
        };
        assert!((model.drift_nu_std(25.0) - 0.016).abs() < 1e-12);
    }

    #[test]
    fn test_drift_factor_before_first_read_is_one() {
        let model = PcmLikeNoiseModel::default();
        assert_eq!(model.drift_factor(0.06, 0.0), 1.0);
        let factor = model.drift_factor(0.06, 3600.0);
        assert!(factor < 1.0 && factor > 0.0);
    }

    #[test]
    fn test_read_noise_never_nan_for_short_times() {
        let model = PcmLikeNoiseModel::default();
        assert_eq!(model.read_noise_std(10.0, 0.0), 0.0);
        assert!(model.read_noise_std(10.0, 1.0) > 0.0);
    }

    #[test]
    fn test_null_model_is_noiseless() {
        let model = InferenceNoiseModel::Null;
        assert_eq!(model.programming_noise_std(10.0), 0.0);
        assert_eq!(model.drift_factor(0.1, 1e6), 1.0);
        assert_eq!(expected_drifted_conductance(&model, 10.0, 1e6), 10.0);
    }

    #[test]
    fn test_expected_drift_uses_mean_exponent() {
        let mut model = MockNoiseModel::new();
        model.expect_drift_nu_mean().with(eq(8.0)).times(1).returning(|_| 0.05);
        model
            .expect_drift_factor()
            .with(eq(0.05), eq(100.0))
            .times(1)
            .returning(|_, _| 0.5);
        assert_eq!(expected_drifted_conductance(&model, 8.0, 100.0), 4.0);
    }

    #[test]
    fn test_invalid_g_max() {
        let model = InferenceNoiseModel::PcmLike(PcmLikeNoiseModel {
            g_max: 0.0,
            ..PcmLikeNoiseModel::default()
        });
        assert!(model.validate().is_err());
    }
}
