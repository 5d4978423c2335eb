//! # Sentiment-Phase-Dynamics
//!
//! Public-Opinion Propagation as a Discrete Dynamical System:
//! Trajectory Simulation and Animated Phase Portraits
//!
//! ## Theoretical Framework
//!
//! A batch of scored observations (posts, comments) is reduced to three
//! populations that evolve under a difference equation:
//!
//! - **S**: negative opinion holders
//! - **I**: positive opinion holders
//! - **N**: neutral observers
//!
//! ### Conserved Three-State Model
//!
//! With total population C = S + I + N held fixed and Δt = 1:
//!
//!   ΔS = β_N·N + β_I·I − (γ + ρ)·S − κ·S·I/C
//!   ΔI = α·N + ρ·S − (ε + β_I)·I + κ·S·I/C
//!   ΔN = γ·S + ε·I − (α + β_N)·N
//!
//! For κ = 0 the fixed point (S*, I*) is the solution of a 2×2 linear
//! system, marked on the portrait.
//!
//! ### Damped Oscillator
//!
//! Spiral about a fixed (S, I) point with angular frequency ω, damping ζ and
//! a sinusoidal disturbance proportional to the opinion balance. Useful as a
//! visual reference for convergent trajectories.
//!
//! ### Stability Index
//!
//!   Δ(I) = dI / I × 100
//!
//! Positive while positive opinion is growing, negative while it decays.
//!
//! ## Rendering
//!
//! Trajectories are drawn one point per tick onto a host surface. The host
//! supplies the clock (`portrait::Scheduler`) and the drawing primitives
//! (`portrait::Surface`); an SVG surface is provided for headless use.
//!
//! ## References
//!
//! - Kermack & McKendrick, "A contribution to the mathematical theory of
//!   epidemics" (1927) - compartmental models
//! - Strogatz, "Nonlinear Dynamics and Chaos" (2015) - phase portraits
//! - Daley & Kendall, "Stochastic rumours" (1965) - rumor spreading

pub mod error;
pub mod observation;
pub mod systems;
pub mod portrait;
pub mod dashboard;
pub mod config;

// Re-exports from error
pub use error::{
    SimulationError,
    AnimatorError,
    ConfigError,
    AuthError,
    SourceError,
    DashboardError,
};

// Re-exports from observation
pub use observation::{
    Observation,
    Sentiment,
    SentimentCounts,
    NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD,
};

// Re-exports from systems
pub use systems::{
    // Traits
    DynamicalSystem,
    // Trajectory
    ModelState,
    Component,
    Trajectory,
    // Conserved three-state
    ConservedSentimentModel,
    SentimentRates,
    ConservationPolicy,
    // Damped oscillator
    DampedOscillator,
    OscillatorParams,
    // Driver
    Simulator,
    SimulatorConfig,
    ModelKind,
};

// Re-exports from portrait
pub use portrait::{
    Animator,
    AnimatorConfig,
    Playback,
    TickOutcome,
    Surface,
    SurfaceProvider,
    Scheduler,
    ManualScheduler,
    SvgSurface,
    TrailColoring,
    Viewport,
    ViewportFit,
};

// Re-exports from dashboard
pub use dashboard::{
    AuthClient,
    Session,
    ObservationSource,
    ObservationQuery,
    DashboardController,
    DashboardConfig,
    TrendChart,
};

pub use config::Config;
