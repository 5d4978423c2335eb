//! Phase Portrait Module: Animated Trajectory Rendering
//!
//! Renders a simulated trajectory onto a 2-D surface, one point per tick:
//!
//! - **Mapping**: affine state-space → pixel transform with padding
//! - **Color**: hue sweep or slope-sign trail coloring
//! - **Surface / Scheduler**: host seams for drawing and frame timing
//! - **Animator**: cursor, playback loop, restart and speed control

mod color;
mod mapping;
mod surface;
mod scheduler;
mod svg;
mod animator;

pub use color::{Color, TrailColoring, sweep_hue};
pub use mapping::{Point, AxisRange, Viewport, ViewportFit};
pub use surface::{
    Surface,
    SurfaceProvider,
    Stroke,
    DrawOp,
    RecordingSurface,
    RecordingProvider,
    DEFAULT_WIDTH,
    DEFAULT_HEIGHT,
};
pub use scheduler::{Scheduler, TickHandle, ManualScheduler};
pub use svg::SvgSurface;
pub use animator::{Animator, AnimatorConfig, Playback, TickOutcome};
