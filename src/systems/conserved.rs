//! Conserved Three-State Model: Sentiment Propagation
//!
//! A compartmental model over three sentiment populations:
//!
//!   dS/dt = β_N·N + β_I·I − (γ + ρ)·S − κ·S·I/C
//!   dI/dt = α·N + ρ·S − (ε + β_I)·I + κ·S·I/C
//!   dN/dt = γ·S + ε·I − (α + β_N)·N
//!
//! where:
//! - S: negative population, I: positive population, N: neutral population
//! - α: neutral → positive, β_N: neutral → negative
//! - β_I: positive → negative, γ: negative → neutral
//! - ρ: negative → positive, ε: positive → neutral
//! - κ: non-linear persuasion coupling (negative → positive on contact)
//!
//! The transfer terms cancel pairwise, so S + I + N = C is conserved by
//! the continuous system. The discrete system (explicit Euler) keeps it
//! either exactly, by computing N = C − S − I, or approximately, by
//! clamping each measure independently.
//!
//! ## Equilibrium
//!
//! For κ = 0 the system is linear. Eliminating N = C − S − I:
//!
//!   −(β_N + γ + ρ)·S + (β_I − β_N)·I = −β_N·C
//!   (ρ − α)·S − (α + ε + β_I)·I       = −α·C
//!
//! The fixed point (S*, I*) follows by Cramer's rule.
//!
//! ## References
//!
//! - Kermack, W. O. & McKendrick, A. G. (1927). A contribution to the
//!   mathematical theory of epidemics. Proc. R. Soc. A 115, 700-721.
//! - Daley, D. J. & Kendall, D. G. (1965). Stochastic rumours.
//!   IMA J. Appl. Math. 1, 42-55.

use serde::{Deserialize, Serialize};

use super::state::ModelState;
use super::traits::DynamicalSystem;
use crate::error::SimulationError;

/// Rate coefficients for the conserved model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentRates {
    /// Neutral → positive
    pub alpha: f64,
    /// Neutral → negative
    pub beta_n: f64,
    /// Positive → negative
    pub beta_i: f64,
    /// Negative → neutral
    pub gamma: f64,
    /// Negative → positive
    pub rho: f64,
    /// Positive → neutral
    pub epsilon: f64,
    /// Non-linear S·I/C coupling (negative → positive)
    pub kappa: f64,
    /// Integration timestep
    pub dt: f64,
}

impl Default for SentimentRates {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta_n: 0.2,
            beta_i: 0.1,
            gamma: 0.15,
            rho: 0.25,
            epsilon: 0.1,
            kappa: 0.0,
            dt: 1.0,
        }
    }
}

impl SentimentRates {
    /// Check every coefficient is finite and non-negative
    pub fn validate(&self) -> Result<(), SimulationError> {
        let named = [
            ("alpha", self.alpha),
            ("beta_n", self.beta_n),
            ("beta_i", self.beta_i),
            ("gamma", self.gamma),
            ("rho", self.rho),
            ("epsilon", self.epsilon),
            ("kappa", self.kappa),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidRate { name, value });
            }
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }

    /// Analytic fixed point (S*, I*) for population `c`
    ///
    /// Only defined for the linear system (κ = 0) with a non-singular
    /// coefficient matrix.
    pub fn equilibrium(&self, c: f64) -> Option<(f64, f64)> {
        if self.kappa != 0.0 {
            return None;
        }

        let a11 = -(self.beta_n + self.gamma + self.rho);
        let a12 = self.beta_i - self.beta_n;
        let a21 = self.rho - self.alpha;
        let a22 = -(self.alpha + self.epsilon + self.beta_i);
        let b1 = -self.beta_n * c;
        let b2 = -self.alpha * c;

        let det = a11 * a22 - a12 * a21;
        if det.abs() < 1e-12 {
            return None;
        }

        let s = (b1 * a22 - a12 * b2) / det;
        let i = (a11 * b2 - b1 * a21) / det;
        Some((s, i))
    }
}

/// How the discrete update keeps S + I + N = C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConservationPolicy {
    /// N is recomputed as C − S − I after each step
    #[default]
    Exact,
    /// Each measure integrates independently and clamps at zero
    Clamped,
}

fn check_initial(name: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidInitialMeasure { name, value })
    }
}

/// Conserved three-state sentiment model
#[derive(Debug, Clone)]
pub struct ConservedSentimentModel {
    /// Negative population
    s: f64,
    /// Positive population
    i: f64,
    /// Neutral population
    n: f64,
    /// Population constant C
    population: f64,
    /// Rate coefficients
    rates: SentimentRates,
    /// Conservation policy for this run
    policy: ConservationPolicy,
    /// Steps taken
    steps: usize,
}

impl ConservedSentimentModel {
    /// Create a model from initial negative and positive measures
    ///
    /// The neutral measure is whatever remains of the population.
    pub fn new(
        population: f64,
        s0: f64,
        i0: f64,
        rates: SentimentRates,
        policy: ConservationPolicy,
    ) -> Result<Self, SimulationError> {
        if !population.is_finite() || population < 0.0 {
            return Err(SimulationError::InvalidPopulation(population));
        }
        rates.validate()?;
        check_initial("negative", s0)?;
        check_initial("positive", i0)?;

        let occupied = s0 + i0;
        if occupied > population {
            return Err(SimulationError::PopulationExceeded {
                occupied,
                population,
            });
        }

        Ok(Self {
            s: s0,
            i: i0,
            n: population - occupied,
            population,
            rates,
            policy,
            steps: 0,
        })
    }

    /// Standard model with default rates and exact conservation
    pub fn standard(population: f64, s0: f64, i0: f64) -> Result<Self, SimulationError> {
        Self::new(
            population,
            s0,
            i0,
            SentimentRates::default(),
            ConservationPolicy::Exact,
        )
    }

    pub fn rates(&self) -> &SentimentRates {
        &self.rates
    }

    pub fn policy(&self) -> ConservationPolicy {
        self.policy
    }

    /// Persuasion term κ·S·I/C, zero for an empty population
    fn coupling(&self, s: f64, i: f64) -> f64 {
        if self.population <= 0.0 {
            return 0.0;
        }
        self.rates.kappa * s * i / self.population
    }

    /// Right-hand side (dS, dI, dN)
    fn derivatives(&self, s: f64, i: f64, n: f64) -> (f64, f64, f64) {
        let r = &self.rates;
        let coupling = self.coupling(s, i);

        let ds = r.beta_n * n + r.beta_i * i - (r.gamma + r.rho) * s - coupling;
        let di = r.alpha * n + r.rho * s - (r.epsilon + r.beta_i) * i + coupling;
        let dn = r.gamma * s + r.epsilon * i - (r.alpha + r.beta_n) * n;

        (ds, di, dn)
    }

    /// Explicit Euler step
    fn euler_step(&mut self) {
        let dt = self.rates.dt;
        let (ds, di, dn) = self.derivatives(self.s, self.i, self.n);

        let mut s = (self.s + ds * dt).max(0.0);
        let mut i = (self.i + di * dt).max(0.0);

        match self.policy {
            ConservationPolicy::Exact => {
                let occupied = s + i;
                if occupied > self.population && occupied > 0.0 {
                    let scale = self.population / occupied;
                    s *= scale;
                    i *= scale;
                }
                self.n = (self.population - s - i).max(0.0);
            }
            ConservationPolicy::Clamped => {
                self.n = (self.n + dn * dt).max(0.0);
            }
        }

        self.s = s;
        self.i = i;
        self.steps += 1;
    }
}

impl DynamicalSystem for ConservedSentimentModel {
    fn step(&mut self) {
        self.euler_step();
    }

    fn state(&self) -> ModelState {
        let (_, di, _) = self.derivatives(self.s, self.i, self.n);
        ModelState {
            step: self.steps,
            s: self.s,
            i: self.i,
            n: self.n,
            di,
        }
    }

    fn steps_taken(&self) -> usize {
        self.steps
    }

    fn equilibrium(&self) -> Option<(f64, f64)> {
        self.rates.equilibrium(self.population)
    }

    fn model_name(&self) -> &'static str {
        "conserved three-state"
    }
}
