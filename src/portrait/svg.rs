//! SVG surface for headless rendering
//!
//! Each `clear` starts a new frame; `to_svg` serializes the current one.

use std::fmt::Write;

use super::color::Color;
use super::mapping::Point;
use super::surface::{Stroke, Surface, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// Current frame as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for element in &self.elements {
            let _ = writeln!(out, "  {element}");
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

impl Surface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let dash = stroke
            .dash
            .map(|(on, off)| format!(r#" stroke-dasharray="{on} {off}""#))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"{}/>"#,
            from.x, from.y, to.x, to.y, stroke.color, stroke.width, dash
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &Color) {
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            center.x, center.y, radius, color
        ));
    }

    fn fill_text(&mut self, at: Point, text: &str, color: &Color) {
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}" font-family="Arial" font-size="12" fill="{}">{}</text>"#,
            at.x,
            at.y,
            color,
            escape(text)
        ));
    }
}
