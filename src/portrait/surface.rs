//! Drawing Surfaces
//!
//! The animator draws through the `Surface` trait and never touches a
//! concrete canvas. Hosts look surfaces up by identifier through a
//! `SurfaceProvider`; a failed lookup leaves the animator inert.
//!
//! `RecordingSurface` keeps every draw call as a `DrawOp`, which is what
//! hosts replay onto their own canvas and what the tests inspect.

use std::collections::HashMap;

use super::color::Color;
use super::mapping::Point;

/// Default surface width in pixels
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Default surface height in pixels
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Dash pattern (on, off); `None` for a solid line
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64, on: f64, off: f64) -> Self {
        Self { color, width, dash: Some((on, off)) }
    }
}

/// 2-D drawing surface
pub trait Surface {
    /// (width, height) in pixels
    fn size(&self) -> (f64, f64);

    /// Erase everything
    fn clear(&mut self);

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color);

    fn fill_text(&mut self, at: Point, text: &str, color: &Color);
}

/// Looks surfaces up by identifier
pub trait SurfaceProvider {
    type Surface: Surface;

    fn surface(&mut self, id: &str) -> Option<Self::Surface>;
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Line { from: Point, to: Point, stroke: Stroke },
    Circle { center: Point, radius: f64, color: Color },
    Text { at: Point, text: String, color: Color },
}

/// Surface that records draw calls
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    /// Number of `clear` calls so far
    frames: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            frames: 0,
        }
    }

    /// Operations recorded since the last `clear`
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of frames started (clears issued)
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Circles drawn in the current frame
    pub fn circles(&self) -> impl Iterator<Item = (&Point, f64, &Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Circle { center, radius, color } => Some((center, *radius, color)),
            _ => None,
        })
    }

    /// Solid lines drawn in the current frame (trail segments and axes)
    pub fn solid_lines(&self) -> impl Iterator<Item = (&Point, &Point, &Stroke)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line { from, to, stroke } if stroke.dash.is_none() => Some((from, to, stroke)),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.frames += 1;
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke: *stroke });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color) {
        self.ops.push(DrawOp::Circle { center, radius, color: *color });
    }

    fn fill_text(&mut self, at: Point, text: &str, color: &Color) {
        self.ops.push(DrawOp::Text { at, text: text.to_string(), color: *color });
    }
}

/// Provider handing out recording surfaces for registered identifiers
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    sizes: HashMap<String, (f64, f64)>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identifier with the default size
    pub fn with_surface(mut self, id: impl Into<String>) -> Self {
        self.register(id, DEFAULT_WIDTH, DEFAULT_HEIGHT);
        self
    }

    pub fn register(&mut self, id: impl Into<String>, width: f64, height: f64) {
        self.sizes.insert(id.into(), (width, height));
    }
}

impl SurfaceProvider for RecordingProvider {
    type Surface = RecordingSurface;

    fn surface(&mut self, id: &str) -> Option<RecordingSurface> {
        self.sizes
            .get(id)
            .map(|&(width, height)| RecordingSurface::new(width, height))
    }
}
