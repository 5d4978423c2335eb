//! Colors and trail coloring strategies

use std::fmt;

use serde::{Deserialize, Serialize};

/// Surface color
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
    /// Hue in degrees, saturation and lightness in percent
    Hsl(f64, f64, f64),
}

impl Color {
    pub const GRID: Color = Color::Rgb(0xee, 0xee, 0xee);
    pub const AXIS: Color = Color::Rgb(0x66, 0x66, 0x66);
    pub const LABEL: Color = Color::Rgb(0x33, 0x33, 0x33);
    pub const MARKER: Color = Color::Rgb(0x21, 0x96, 0xf3);
    pub const EQUILIBRIUM: Color = Color::Rgba(255, 0, 0, 0.3);
    pub const RISING: Color = Color::Rgb(0x4c, 0xaf, 0x50);
    pub const FALLING: Color = Color::Rgb(0xf4, 0x43, 0x36);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({}, {}, {}, {})", r, g, b, a),
            Color::Hsl(h, s, l) => write!(f, "hsl({:.1}, {}%, {}%)", h, s, l),
        }
    }
}

/// How trail segments are colored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TrailColoring {
    /// Hue sweeps from `start_hue` to `end_hue` across the trajectory
    HueSweep { start_hue: f64, end_hue: f64 },
    /// Rising dI in one color, non-rising in another
    SlopeSign,
}

impl Default for TrailColoring {
    fn default() -> Self {
        TrailColoring::HueSweep {
            start_hue: 0.0,
            end_hue: 240.0,
        }
    }
}

impl TrailColoring {
    /// Color of segment `index` of a trajectory of length `len`
    ///
    /// `slope` is the dI sample at the segment's end point.
    pub fn segment_color(&self, index: usize, len: usize, slope: f64) -> Color {
        match *self {
            TrailColoring::HueSweep { start_hue, end_hue } => {
                Color::Hsl(sweep_hue(index, len, start_hue, end_hue), 100.0, 50.0)
            }
            TrailColoring::SlopeSign => {
                if slope > 0.0 {
                    Color::RISING
                } else {
                    Color::FALLING
                }
            }
        }
    }
}

/// Hue for position `index` out of `len`, linear in the index
pub fn sweep_hue(index: usize, len: usize, start_hue: f64, end_hue: f64) -> f64 {
    if len == 0 {
        return start_hue;
    }
    let t = (index as f64 / len as f64).clamp(0.0, 1.0);
    start_hue + t * (end_hue - start_hue)
}
