use std::fmt;

use crate::geometry::{Canvas, Point, battery_color};
use crate::model::{DrawMode, Realization, Terminal};

use super::ReportModel;

const EDGE_STROKE: &str = "#3498db";
const EDGE_WIDTH: u32 = 6;
const EDGE_OPACITY: f64 = 0.7;

const STEINER_RADIUS: u32 = 5;
const STEINER_FILL: &str = "#5d6d7e";
const STEINER_STROKE: &str = "#34495e";

const TERMINAL_RADIUS: u32 = 8;
const COVERED_STROKE: &str = "#333";
const UNCOVERED_STROKE: &str = "#999";
const UNCOVERED_DASH: &str = "5,3";
const UNCOVERED_MARK_FILL: &str = "#e74c3c";

/// The network diagram as an inline SVG element.
pub struct Diagram<'a> {
    model: &'a ReportModel,
    canvas: Canvas,
    label_color: &'a str,
}

impl<'a> Diagram<'a> {
    pub fn new(model: &'a ReportModel, label_color: &'a str) -> Self {
        Self {
            model,
            canvas: Canvas::REPORT,
            label_color,
        }
    }

    fn terminal_position(&self, id: usize) -> Option<(i32, i32)> {
        self.model
            .terminals
            .get(id)
            .map(|t| self.canvas.scale(t.position))
    }

    fn write_segment(
        &self,
        f: &mut fmt::Formatter<'_>,
        from: (i32, i32),
        to: (i32, i32),
    ) -> fmt::Result {
        writeln!(
            f,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{EDGE_STROKE}" stroke-width="{EDGE_WIDTH}" opacity="{EDGE_OPACITY}"/>"#,
            from.0, from.1, to.0, to.1
        )
    }

    fn write_edges(&self, f: &mut fmt::Formatter<'_>, r: &Realization) -> fmt::Result {
        match r.mode {
            DrawMode::Junction(steiner) => {
                let hub = self.canvas.scale(steiner);
                for &t in &r.terminals {
                    if let Some(pos) = self.terminal_position(t) {
                        self.write_segment(f, hub, pos)?;
                    }
                }
            }
            DrawMode::Chain => {
                for pair in r.terminals.windows(2) {
                    let ends = (
                        self.terminal_position(pair[0]),
                        self.terminal_position(pair[1]),
                    );
                    if let (Some(from), Some(to)) = ends {
                        self.write_segment(f, from, to)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_steiner(&self, f: &mut fmt::Formatter<'_>, p: Point) -> fmt::Result {
        let (x, y) = self.canvas.scale(p);
        writeln!(
            f,
            r#"  <circle class="steiner-point" cx="{x}" cy="{y}" r="{STEINER_RADIUS}" fill="{STEINER_FILL}" stroke="{STEINER_STROKE}" stroke-width="1"/>"#
        )
    }

    fn write_terminal(&self, f: &mut fmt::Formatter<'_>, t: &Terminal) -> fmt::Result {
        let (x, y) = self.canvas.scale(t.position);
        let fill = battery_color(t.battery);
        if t.covered {
            writeln!(
                f,
                r#"  <circle class="terminal covered" cx="{x}" cy="{y}" r="{TERMINAL_RADIUS}" fill="{fill}" stroke="{COVERED_STROKE}" stroke-width="2"/>"#
            )?;
        } else {
            writeln!(
                f,
                r#"  <circle class="terminal uncovered" cx="{x}" cy="{y}" r="{TERMINAL_RADIUS}" fill="{fill}" stroke="{UNCOVERED_STROKE}" stroke-width="3" stroke-dasharray="{UNCOVERED_DASH}"/>"#
            )?;
            writeln!(
                f,
                r#"  <text x="{x}" y="{}" text-anchor="middle" font-size="9" fill="{UNCOVERED_MARK_FILL}">✗</text>"#,
                y - 5
            )?;
        }
        writeln!(
            f,
            r#"  <text class="terminal-label" x="{x}" y="{}" text-anchor="middle" fill="{}">{}</text>"#,
            y - 20,
            self.label_color,
            t.id
        )?;
        writeln!(
            f,
            r#"  <text class="battery-text" x="{x}" y="{}" text-anchor="middle" fill="{}">{:.1}%</text>"#,
            y + 25,
            self.label_color,
            t.battery
        )
    }
}

impl fmt::Display for Diagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg class="network-svg" width="{}" height="{}" xmlns="http://www.w3.org/2000/svg">"#,
            self.canvas.width, self.canvas.height
        )?;

        let realizations = &self.model.topology.realizations;
        for r in realizations {
            self.write_edges(f, r)?;
        }
        for r in realizations {
            if let DrawMode::Junction(p) = r.mode {
                self.write_steiner(f, p)?;
            }
        }
        for t in &self.model.terminals {
            self.write_terminal(f, t)?;
        }

        write!(f, "</svg>")
    }
}
