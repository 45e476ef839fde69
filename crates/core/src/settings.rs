use serde::{Deserialize, Serialize};

use crate::error::SmoothError;

pub const DEFAULT_ORTHOGONAL_TOLERANCE: f32 = 0.001;
pub const DEFAULT_TRUNCATION_SIGMAS: f32 = 3.0;

/// Engine tuning. The defaults reproduce the reference outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothSettings {
    /// Largest normalized dot product between two axes still treated as
    /// perpendicular.
    pub orthogonal_tolerance: f32,
    /// Kernel cutoff radius in multiples of sigma.
    pub truncation_sigmas: f32,
    /// Run the dense 3-D kernel even on orthogonal grids.
    pub force_dense: bool,
}

impl Default for SmoothSettings {
    fn default() -> Self {
        Self {
            orthogonal_tolerance: DEFAULT_ORTHOGONAL_TOLERANCE,
            truncation_sigmas: DEFAULT_TRUNCATION_SIGMAS,
            force_dense: false,
        }
    }
}

impl SmoothSettings {
    pub fn truncation_radius(&self, sigma: f32) -> f32 {
        sigma * self.truncation_sigmas
    }

    pub fn from_json(text: &str) -> Result<Self, SmoothError> {
        serde_json::from_str(text).map_err(|err| SmoothError::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = SmoothSettings::from_json(r#"{ "force_dense": true }"#).expect("parse");
        assert!(settings.force_dense);
        assert_eq!(settings.orthogonal_tolerance, DEFAULT_ORTHOGONAL_TOLERANCE);
        assert_eq!(settings.truncation_sigmas, DEFAULT_TRUNCATION_SIGMAS);
    }

    #[test]
    fn truncation_radius_is_three_sigma_by_default() {
        let settings = SmoothSettings::default();
        assert!((settings.truncation_radius(2.0) - 6.0).abs() < 1.0e-6);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SmoothSettings::from_json("{ truncation_sigmas: }").unwrap_err();
        assert!(matches!(err, SmoothError::Config(_)));
    }
}
