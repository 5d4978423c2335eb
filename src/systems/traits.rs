//! Dynamical System Trait: Common API for Sentiment Models
//!
//! Every model kind implements this trait so the simulator can drive it
//! without knowing its right-hand side:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DynamicalSystem Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + step()              - Advance system by dt               │
//! │  + run(n)              - Run n steps                        │
//! │  + state()             - Snapshot as ModelState             │
//! │  + equilibrium()       - Fixed point (S*, I*) if known      │
//! │  + model_name()        - Human-readable model name          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::state::ModelState;

/// Trait for sentiment models driven by the simulator
pub trait DynamicalSystem {
    /// Advance system by one timestep
    fn step(&mut self);

    /// Run multiple timesteps
    fn run(&mut self, n_steps: usize) {
        for _ in 0..n_steps {
            self.step();
        }
    }

    /// Snapshot of the current state
    ///
    /// `di` is the derivative of I evaluated at this state.
    fn state(&self) -> ModelState;

    /// Number of steps taken so far
    fn steps_taken(&self) -> usize;

    /// Fixed point in the (S, I) plane, if the model has a known one
    fn equilibrium(&self) -> Option<(f64, f64)> {
        None
    }

    /// Name of the model kind
    fn model_name(&self) -> &'static str;
}
