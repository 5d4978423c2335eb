//! Trajectory Simulator: One Configurable Entry Point for All Models
//!
//! The model kind is a tagged variant chosen at construction time. The
//! simulator partitions the input into initial measures, builds the
//! matching `DynamicalSystem`, and iterates it a fixed number of steps.
//!
//! ## Contract
//!
//! - Step count is fixed by configuration (or by the model kind's
//!   default), never by the number of observations.
//! - Entry k of the trajectory is the state after k updates; entry 0 is
//!   the initial partition.
//! - Runs are deterministic: same inputs, same trajectory.
//! - An empty observation set is not an error: the whole population
//!   starts in the neutral bucket.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::conserved::{ConservationPolicy, ConservedSentimentModel, SentimentRates};
use super::oscillator::{DampedOscillator, OscillatorParams};
use super::state::Trajectory;
use super::traits::DynamicalSystem;
use crate::error::SimulationError;
use crate::observation::{Observation, SentimentCounts};

/// Default step count for the conserved model
pub const CONSERVED_DEFAULT_STEPS: usize = 40;

/// Default step count for the oscillator
pub const OSCILLATOR_DEFAULT_STEPS: usize = 180;

/// Model kind with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// S/I/N populations with S + I + N = C
    ConservedThreeState(SentimentRates),
    /// Damped rotation around (S*, I*) with data disturbance
    DampedOscillator(OscillatorParams),
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::ConservedThreeState(SentimentRates::default())
    }
}

impl ModelKind {
    /// Oscillator with default parameters
    pub fn oscillator() -> Self {
        ModelKind::DampedOscillator(OscillatorParams::default())
    }

    pub fn default_steps(&self) -> usize {
        match self {
            ModelKind::ConservedThreeState(_) => CONSERVED_DEFAULT_STEPS,
            ModelKind::DampedOscillator(_) => OSCILLATOR_DEFAULT_STEPS,
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        match self {
            ModelKind::ConservedThreeState(rates) => rates.validate(),
            ModelKind::DampedOscillator(params) => params.validate(),
        }
    }

    /// Build the system for one run
    fn build(
        &self,
        population: f64,
        counts: SentimentCounts,
        policy: ConservationPolicy,
    ) -> Result<Box<dyn DynamicalSystem>, SimulationError> {
        let system: Box<dyn DynamicalSystem> = match *self {
            ModelKind::ConservedThreeState(rates) => Box::new(ConservedSentimentModel::new(
                population,
                counts.negative as f64,
                counts.positive as f64,
                rates,
                policy,
            )?),
            ModelKind::DampedOscillator(params) => {
                Box::new(DampedOscillator::new(population, counts, params)?)
            }
        };
        Ok(system)
    }
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Population constant C
    pub population: f64,
    /// Step count (None: model kind default)
    pub steps: Option<usize>,
    /// Conservation policy (conserved model only)
    pub conservation: ConservationPolicy,
    /// Model kind and parameters
    pub model: ModelKind,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            population: 100.0,
            steps: None,
            conservation: ConservationPolicy::Exact,
            model: ModelKind::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.population.is_finite() || self.population < 0.0 {
            return Err(SimulationError::InvalidPopulation(self.population));
        }
        if self.steps == Some(0) {
            return Err(SimulationError::InvalidStepCount);
        }
        self.model.validate()
    }

    /// Effective step count
    pub fn step_count(&self) -> usize {
        self.steps.unwrap_or_else(|| self.model.default_steps())
    }
}

/// Deterministic trajectory simulator
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create simulator, rejecting invalid configuration
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Conserved model with default rates for population `c`
    pub fn standard(population: f64) -> Result<Self, SimulationError> {
        Self::new(SimulatorConfig {
            population,
            ..SimulatorConfig::default()
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run from raw sentiment scores
    pub fn run_scores(&self, scores: &[f64]) -> Result<Trajectory, SimulationError> {
        self.run_counts(SentimentCounts::from_scores(scores))
    }

    /// Run from observations
    pub fn run_observations(
        &self,
        observations: &[Observation],
    ) -> Result<Trajectory, SimulationError> {
        self.run_counts(SentimentCounts::from_observations(observations))
    }

    /// Run from pre-aggregated counts
    pub fn run_counts(&self, counts: SentimentCounts) -> Result<Trajectory, SimulationError> {
        let population = self.config.population;
        let steps = self.config.step_count();

        let mut system = self
            .config
            .model
            .build(population, counts, self.config.conservation)?;

        debug!(
            model = system.model_name(),
            population,
            steps,
            negative = counts.negative,
            neutral = counts.neutral,
            positive = counts.positive,
            "running simulation"
        );

        let mut states = Vec::with_capacity(steps);
        for k in 0..steps {
            states.push(system.state());
            if k + 1 < steps {
                system.step();
            }
        }

        Ok(Trajectory::new(states, population, system.equilibrium()))
    }
}
