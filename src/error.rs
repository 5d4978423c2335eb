//! Error types
//!
//! Each component reports its own failures. Configuration faults stop only
//! the component that raised them; data faults inside the playback loop are
//! logged and degrade to no-op frames instead of surfacing here.

use std::path::PathBuf;

use thiserror::Error;

/// Simulator configuration and initialization errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("population must be a finite non-negative number, got {0}")]
    InvalidPopulation(f64),

    #[error("step count must be at least 1")]
    InvalidStepCount,

    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),

    #[error("rate coefficient {name} must be finite and non-negative, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("initial {name} measure must be finite and non-negative, got {value}")]
    InvalidInitialMeasure { name: &'static str, value: f64 },

    #[error("initial negative+positive measure {occupied} exceeds population {population}")]
    PopulationExceeded { occupied: f64, population: f64 },
}

/// Animator construction and playback errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimatorError {
    #[error("drawing surface '{0}' not found")]
    SurfaceNotFound(String),

    #[error("animator has no drawing surface")]
    Inert,

    #[error("frame {index} out of range for trajectory of length {len}")]
    FrameOutOfRange { index: usize, len: usize },

    #[error("trajectory is empty")]
    EmptyTrajectory,

    #[error("speed multiplier must be finite and positive, got {0}")]
    InvalidSpeed(f64),
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Animator(#[from] AnimatorError),
}

/// Authentication collaborator errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("authentication backend unavailable: {0}")]
    Unavailable(String),

    #[error("sign-out rejected: {0}")]
    SignOut(String),
}

/// Observation source errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("observation fetch failed: {0}")]
    Fetch(String),

    #[error("observation source rejected session for user {0}")]
    Unauthorized(String),
}

/// Dashboard controller errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
