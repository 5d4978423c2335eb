//! Sentiment Systems Module: Difference-Equation Models
//!
//! Implements the sentiment propagation models behind the phase portrait:
//!
//! - **Conserved three-state**: S/I/N populations with a fixed total
//! - **Damped oscillator**: spiral around a fixed (S, I) equilibrium
//!
//! Both are driven through the `DynamicalSystem` trait by one `Simulator`
//! that produces an immutable `Trajectory`.

mod traits;
mod state;
mod conserved;
mod oscillator;
mod simulator;

pub use traits::DynamicalSystem;
pub use state::{ModelState, Component, Trajectory};
pub use conserved::{ConservedSentimentModel, SentimentRates, ConservationPolicy};
pub use oscillator::{DampedOscillator, OscillatorParams};
pub use simulator::{
    Simulator,
    SimulatorConfig,
    ModelKind,
    CONSERVED_DEFAULT_STEPS,
    OSCILLATOR_DEFAULT_STEPS,
};
