//! Damped Oscillator: Sentiment Swings Around an Equilibrium
//!
//! The pure-oscillator variant treats the (S, I) plane as a damped
//! rotation around a fixed equilibrium (S*, I*):
//!
//!   u = S − S*,  v = I − I*
//!   dS/dt = −ω·v − ζ·u
//!   dI/dt =  ω·u − ζ·v + D(t)
//!
//! where:
//! - ω: angular frequency of the swing
//! - ζ: damping rate (spiral decays as e^(−ζt))
//! - D(t): data disturbance
//!
//! ## Data Disturbance
//!
//! The synthetic oscillator is perturbed by a sinusoid whose amplitude
//! comes from the observed sentiment balance:
//!
//!   D(t) = g · (pos − neg) / max(total, 1) · sin(f·t)
//!
//! This is reproduced as plain arithmetic; it is not a fitting step.
//!
//! ## Stability of the Discretization
//!
//! Explicit Euler multiplies the deviation by |1 + dt·(−ζ + iω)| per step.
//! With the defaults (dt = 0.1, ω = 0.5, ζ = 0.05) that factor is ≈ 0.996,
//! so the discrete spiral still decays toward (S*, I*).
//!
//! The neutral measure does not take part in the swing and stays at its
//! initial value.

use serde::{Deserialize, Serialize};

use super::state::ModelState;
use super::traits::DynamicalSystem;
use crate::error::SimulationError;
use crate::observation::SentimentCounts;

/// Parameters of the damped oscillator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorParams {
    /// Angular frequency ω
    pub frequency: f64,
    /// Damping rate ζ
    pub damping: f64,
    /// Equilibrium negative measure S*
    pub equilibrium_s: f64,
    /// Equilibrium positive measure I*
    pub equilibrium_i: f64,
    /// Integration timestep
    pub dt: f64,
    /// Disturbance gain g (0 disables the disturbance)
    pub disturbance_gain: f64,
    /// Disturbance frequency f
    pub disturbance_frequency: f64,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            frequency: 0.5,
            damping: 0.05,
            equilibrium_s: 5.0,
            equilibrium_i: 3.0,
            dt: 0.1,
            disturbance_gain: 0.5,
            disturbance_frequency: 0.3,
        }
    }
}

impl OscillatorParams {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let named = [
            ("frequency", self.frequency),
            ("damping", self.damping),
            ("equilibrium_s", self.equilibrium_s),
            ("equilibrium_i", self.equilibrium_i),
            ("disturbance_gain", self.disturbance_gain),
            ("disturbance_frequency", self.disturbance_frequency),
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
}

/// Damped sentiment oscillator
#[derive(Debug, Clone)]
pub struct DampedOscillator {
    /// Negative measure
    s: f64,
    /// Positive measure
    i: f64,
    /// Neutral measure (held constant)
    n: f64,
    params: OscillatorParams,
    /// Disturbance amplitude g·balance, fixed at construction
    disturbance_amplitude: f64,
    /// Current time
    time: f64,
    steps: usize,
}

impl DampedOscillator {
    /// Create oscillator from observed counts
    ///
    /// S₀ and I₀ are the negative and positive counts; N₀ is the rest of
    /// the population.
    pub fn new(
        population: f64,
        counts: SentimentCounts,
        params: OscillatorParams,
    ) -> Result<Self, SimulationError> {
        if !population.is_finite() || population < 0.0 {
            return Err(SimulationError::InvalidPopulation(population));
        }
        params.validate()?;

        let s0 = counts.negative as f64;
        let i0 = counts.positive as f64;
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
            params,
            disturbance_amplitude: params.disturbance_gain * counts.balance(),
            time: 0.0,
            steps: 0,
        })
    }

    pub fn params(&self) -> &OscillatorParams {
        &self.params
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Data disturbance D(t)
    fn disturbance(&self, t: f64) -> f64 {
        self.disturbance_amplitude * (self.params.disturbance_frequency * t).sin()
    }

    /// Right-hand side (dS, dI) at time t
    fn derivatives(&self, s: f64, i: f64, t: f64) -> (f64, f64) {
        let p = &self.params;
        let u = s - p.equilibrium_s;
        let v = i - p.equilibrium_i;

        let ds = -p.frequency * v - p.damping * u;
        let di = p.frequency * u - p.damping * v + self.disturbance(t);

        (ds, di)
    }

    fn euler_step(&mut self) {
        let dt = self.params.dt;
        let (ds, di) = self.derivatives(self.s, self.i, self.time);

        self.s = (self.s + ds * dt).max(0.0);
        self.i = (self.i + di * dt).max(0.0);
        self.time += dt;
        self.steps += 1;
    }
}

impl DynamicalSystem for DampedOscillator {
    fn step(&mut self) {
        self.euler_step();
    }

    fn state(&self) -> ModelState {
        let (_, di) = self.derivatives(self.s, self.i, self.time);
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
        Some((self.params.equilibrium_s, self.params.equilibrium_i))
    }

    fn model_name(&self) -> &'static str {
        "damped oscillator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn distance_to_equilibrium(osc: &DampedOscillator) -> f64 {
        let st = osc.state();
        let p = osc.params();
        ((st.s - p.equilibrium_s).powi(2) + (st.i - p.equilibrium_i).powi(2)).sqrt()
    }

    #[test]
    fn test_spiral_decays_without_disturbance() {
        let params = OscillatorParams { disturbance_gain: 0.0, ..OscillatorParams::default() };
        let mut osc = DampedOscillator::new(100.0, SentimentCounts::new(6, 0, 4), params).unwrap();

        let initial = distance_to_equilibrium(&osc);
        osc.run(180);
        let fin = distance_to_equilibrium(&osc);

        assert!(fin < initial, "expected decay: initial={}, final={}", initial, fin);
        assert!(fin > 0.0);
    }

    #[test]
    fn test_swing_changes_slope_sign() {
        let params = OscillatorParams { disturbance_gain: 0.0, ..OscillatorParams::default() };
        let mut osc = DampedOscillator::new(100.0, SentimentCounts::new(8, 0, 3), params).unwrap();

        let mut rising = 0;
        let mut falling = 0;
        for _ in 0..180 {
            if osc.state().di > 0.0 { rising += 1 } else { falling += 1 }
            osc.step();
        }
        assert!(rising > 0 && falling > 0,
            "oscillation should alternate slope: rising={}, falling={}", rising, falling);
    }

    #[test]
    fn test_disturbance_follows_balance() {
        // Start on the equilibrium point: only the disturbance moves I.
        let params = OscillatorParams {
            equilibrium_s: 2.0,
            equilibrium_i: 6.0,
            ..OscillatorParams::default()
        };
        let mut osc = DampedOscillator::new(100.0, SentimentCounts::new(2, 0, 6), params).unwrap();
        assert_relative_eq!(osc.disturbance_amplitude, 0.25, epsilon = 1e-12);

        osc.run(5);
        assert!(osc.state().i > 6.0, "positive balance should push I up, got {}", osc.state().i);

        let counts = SentimentCounts::new(5, 10, 3);
        let leaning_negative =
            DampedOscillator::new(100.0, counts, OscillatorParams::default()).unwrap();
        assert_relative_eq!(
            leaning_negative.disturbance_amplitude,
            0.5 * (3.0 - 5.0) / 18.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_neutral_constant_and_nonnegative() {
        let mut osc = DampedOscillator::new(
            20.0,
            SentimentCounts::new(0, 0, 12),
            OscillatorParams { frequency: 2.0, ..OscillatorParams::default() },
        )
        .unwrap();
        for _ in 0..180 {
            osc.step();
            let st = osc.state();
            assert!(st.s >= 0.0 && st.i >= 0.0, "negative component {:?}", st);
            assert_eq!(st.n, 8.0);
        }
        assert_relative_eq!(osc.time(), 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_counts_start_at_origin() {
        let osc =
            DampedOscillator::new(50.0, SentimentCounts::default(), OscillatorParams::default())
                .unwrap();
        let st = osc.state();
        assert_eq!((st.s, st.i, st.n), (0.0, 0.0, 50.0));
        assert_eq!(osc.equilibrium(), Some((5.0, 3.0)));
    }
}
