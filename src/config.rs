//! Configuration file
//!
//! ```toml
//! [simulator]
//! population = 100
//! steps = 40
//! conservation = "exact"
//!
//! [simulator.model]
//! kind = "conserved_three_state"
//! alpha = 0.3
//!
//! [animator]
//! base_delay_ms = 100
//! speed = 2.0
//! trail = { mode = "slope_sign" }
//!
//! [dashboard]
//! surface_id = "phase-portrait"
//! ```
//!
//! Every section and field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dashboard::DashboardConfig;
use crate::error::ConfigError;
use crate::portrait::AnimatorConfig;
use crate::systems::SimulatorConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulator: SimulatorConfig,
    pub animator: AnimatorConfig,
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Read and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulator.validate()?;
        self.animator.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnimatorError, SimulationError};
    use crate::portrait::TrailColoring;
    use crate::systems::{ConservationPolicy, ModelKind, OscillatorParams};
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.simulator.step_count(), 40);
        assert_eq!(config.animator.base_delay_ms, 100);
        assert_eq!(config.dashboard.posts_per_page, 20);
    }

    #[test]
    fn test_oscillator_section() {
        let text = r#"
            [simulator]
            population = 250
            conservation = "clamped"

            [simulator.model]
            kind = "damped_oscillator"
            frequency = 0.8

            [animator]
            speed = 2.5
            trail = { mode = "slope_sign" }
            fit = { mode = "padded", margin = 0.2 }
        "#;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.simulator.population, 250.0);
        assert_eq!(config.simulator.conservation, ConservationPolicy::Clamped);
        assert_eq!(config.simulator.step_count(), 180);
        assert_eq!(
            config.simulator.model,
            ModelKind::DampedOscillator(OscillatorParams {
                frequency: 0.8,
                ..OscillatorParams::default()
            })
        );
        assert_eq!(config.animator.trail, TrailColoring::SlopeSign);
        assert_eq!(config.animator.speed, 2.5);
    }

    #[test]
    fn test_negative_population_rejected() {
        let err = Config::from_toml_str("[simulator]\npopulation = -5.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Simulation(SimulationError::InvalidPopulation(_))));
    }

    #[test]
    fn test_zero_speed_rejected() {
        let err = Config::from_toml_str("[animator]\nspeed = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Animator(AnimatorError::InvalidSpeed(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[simulator]\nsteps = 12\n[dashboard]\nsurface_id = \"canvas\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.simulator.step_count(), 12);
        assert_eq!(config.dashboard.surface_id, "canvas");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/sentiment.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
