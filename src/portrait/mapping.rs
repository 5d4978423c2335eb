//! Coordinate Mapping: State Space → Surface Pixels
//!
//! Each axis is an affine transform:
//!
//!   px = (v − min) · (extent / (max − min))
//!
//! The vertical axis is inverted so that the origin sits at the bottom of
//! the surface, matching conventional plot orientation.

use serde::{Deserialize, Serialize};

use crate::systems::{Component, Trajectory};

/// Spans narrower than this are treated as degenerate
const MIN_SPAN: f64 = 1e-9;

/// Span substituted for a degenerate axis
const FALLBACK_SPAN: f64 = 1.0;

/// Point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible value range of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range with a guaranteed non-zero width
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if !(max - min).is_finite() || max - min < MIN_SPAN {
            let mid = if (min + max).is_finite() { (min + max) / 2.0 } else { 0.0 };
            return Self {
                min: mid - FALLBACK_SPAN / 2.0,
                max: mid + FALLBACK_SPAN / 2.0,
            };
        }
        Self { min, max }
    }

    /// Data extent padded by `margin` of its span on each side
    pub fn padded(lo: f64, hi: f64, margin: f64) -> Self {
        let span = hi - lo;
        Self::new(lo - span * margin, hi + span * margin)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Value at fraction `t` of the range
    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * self.span()
    }
}

/// How the viewport is fitted to the data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewportFit {
    /// Fit the data extent with `margin` padding per side
    Padded { margin: f64 },
    /// Fixed ranges, independent of the data
    Fixed { x: AxisRange, y: AxisRange },
}

impl Default for ViewportFit {
    fn default() -> Self {
        ViewportFit::Padded { margin: 0.1 }
    }
}

/// Affine mapping from two state components to surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: AxisRange,
    pub y: AxisRange,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: AxisRange, y: AxisRange, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Fit a viewport to a trajectory
    ///
    /// `extra` points (e.g. an equilibrium marker) are included in the
    /// extent. An empty trajectory yields unit ranges around the origin.
    pub fn fit(
        trajectory: &Trajectory,
        x_component: Component,
        y_component: Component,
        extra: Option<(f64, f64)>,
        fit: ViewportFit,
        width: f64,
        height: f64,
    ) -> Self {
        match fit {
            ViewportFit::Fixed { x, y } => {
                Self::new(AxisRange::new(x.min, x.max), AxisRange::new(y.min, y.max), width, height)
            }
            ViewportFit::Padded { margin } => {
                let (mut x_lo, mut x_hi) = trajectory.bounds(x_component).unwrap_or((0.0, 0.0));
                let (mut y_lo, mut y_hi) = trajectory.bounds(y_component).unwrap_or((0.0, 0.0));
                if let Some((ex, ey)) = extra {
                    if trajectory.is_empty() {
                        (x_lo, x_hi, y_lo, y_hi) = (ex, ex, ey, ey);
                    } else {
                        x_lo = x_lo.min(ex);
                        x_hi = x_hi.max(ex);
                        y_lo = y_lo.min(ey);
                        y_hi = y_hi.max(ey);
                    }
                }
                Self::new(
                    AxisRange::padded(x_lo, x_hi, margin),
                    AxisRange::padded(y_lo, y_hi, margin),
                    width,
                    height,
                )
            }
        }
    }

    /// Map a value pair to surface coordinates
    pub fn map(&self, x: f64, y: f64) -> Point {
        Point {
            x: (x - self.x.min) * (self.width / self.x.span()),
            y: self.height - (y - self.y.min) * (self.height / self.y.span()),
        }
    }
}
