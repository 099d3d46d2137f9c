//! SVG rendering of a co-author graph
//!
//! Force-directed layout (Fruchterman-Reingold, seeded on a circle so the
//! output is deterministic) drawn on a square 15 inch canvas.

use crate::graph::CoauthorGraph;
use authormaps_common::errors::{AppError, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Image extensions `write_image` accepts
pub const ACCEPTED_EXTENSIONS: &[&str] = &["svg"];

const CANVAS_INCHES: f64 = 15.0;
const LAYOUT_ITERATIONS: usize = 50;
const TARGET_FILL: &str = "#fdd0a2";
const NODE_FILL: &str = "#c6dbef";
const EDGE_PALETTE: [&str; 9] = [
    "#f8f7b1", "#edf8b1", "#c7e9b4", "#7fcdbb", "#4dd4d6", "#41b6c4", "#1d91c0", "#225ea8", "#253494",
];
const PALETTE_VMAX: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub dpi: u32,
    pub with_edge_labels: bool,
    /// Display name of the searched author; matching nodes are highlighted
    pub highlight: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 72,
            with_edge_labels: false,
            highlight: None,
        }
    }
}

/// Edge width in [1, 10] from the shared count
pub fn edge_width(weight: u32, min: u32, max: u32) -> f64 {
    let k = if max == 1 || max == min {
        1.0
    } else {
        9.0 / f64::from(max - min)
    };
    k * f64::from(weight.saturating_sub(min)) + 1.0
}

/// Palette colour for a shared count; `vmin` is the smallest weight
pub fn edge_color(weight: u32, vmin: u32) -> String {
    let vmin = f64::from(vmin);
    let vmax = PALETTE_VMAX.max(vmin + 1.0);
    let t = ((f64::from(weight) - vmin) / (vmax - vmin)).clamp(0.0, 1.0);

    let scaled = t * (EDGE_PALETTE.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(EDGE_PALETTE.len() - 1);
    let frac = scaled - lo as f64;

    let (a, b) = (hex_rgb(EDGE_PALETTE[lo]), hex_rgb(EDGE_PALETTE[hi]));
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * frac).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn hex_rgb(hex: &str) -> (u8, u8, u8) {
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    (channel(1), channel(3), channel(5))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Node positions in [-1, 1]², index-aligned with the petgraph nodes
fn layout(graph: &CoauthorGraph) -> Vec<(f64, f64)> {
    let inner = graph.inner();
    let n = inner.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![(0.0, 0.0)],
        _ => {}
    }

    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let k = (4.0 / n as f64).sqrt();
    let edges: Vec<(usize, usize)> = inner
        .edge_indices()
        .filter_map(|e| inner.edge_endpoints(e))
        .map(|(a, b)| (a.index(), b.index()))
        .collect();

    let initial_temp = 0.1;
    for iteration in 0..LAYOUT_ITERATIONS {
        let temp = initial_temp * (1.0 - iteration as f64 / LAYOUT_ITERATIONS as f64);
        let mut disp = vec![(0.0f64, 0.0f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = k * k / dist;
                disp[i].0 += dx / dist * force;
                disp[i].1 += dy / dist * force;
                disp[j].0 -= dx / dist * force;
                disp[j].1 -= dy / dist * force;
            }
        }

        for &(a, b) in &edges {
            let (dx, dy) = (pos[a].0 - pos[b].0, pos[a].1 - pos[b].1);
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = dist * dist / k;
            disp[a].0 -= dx / dist * force;
            disp[a].1 -= dy / dist * force;
            disp[b].0 += dx / dist * force;
            disp[b].1 += dy / dist * force;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.0 * d.0 + d.1 * d.1).sqrt();
            if len > 0.0 {
                let step = len.min(temp);
                p.0 += d.0 / len * step;
                p.1 += d.1 / len * step;
            }
        }
    }

    // rescale into [-1, 1]
    let extent = pos
        .iter()
        .fold(0.0f64, |m, p| m.max(p.0.abs()).max(p.1.abs()))
        .max(f64::EPSILON);
    pos.iter().map(|p| (p.0 / extent, p.1 / extent)).collect()
}

/// Render the graph as an SVG document
pub fn render_svg(graph: &CoauthorGraph, options: &RenderOptions) -> String {
    let size = CANVAS_INCHES * f64::from(options.dpi.max(1));
    let margin = size * 0.08;
    let half = (size - 2.0 * margin) / 2.0;
    let to_canvas = |p: (f64, f64)| (margin + half * (p.0 + 1.0), margin + half * (p.1 + 1.0));

    let font = (size / 110.0).max(6.0);
    let radius = (size / 90.0).max(3.0);
    let positions: Vec<(f64, f64)> = layout(graph).into_iter().map(to_canvas).collect();
    let inner = graph.inner();
    let (min, max) = graph.weight_range().unwrap_or((1, 1));

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size:.0}" height="{size:.0}" viewBox="0 0 {size:.0} {size:.0}">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    let _ = writeln!(svg, r#"<g class="edges">"#);
    for e in inner.edge_indices() {
        let Some((a, b)) = inner.edge_endpoints(e) else { continue };
        let weight = inner[e].shared_publication;
        let (pa, pb) = (positions[a.index()], positions[b.index()]);
        let _ = writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.2}"/>"#,
            pa.0,
            pa.1,
            pb.0,
            pb.1,
            edge_color(weight, min),
            edge_width(weight, min, max)
        );
        if options.with_edge_labels {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}" text-anchor="middle" fill="dimgray">{}</text>"#,
                (pa.0 + pb.0) / 2.0,
                (pa.1 + pb.1) / 2.0,
                font * 0.8,
                weight
            );
        }
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(svg, r#"<g class="nodes">"#);
    for idx in inner.node_indices() {
        let node = &inner[idx];
        let (x, y) = positions[idx.index()];
        let highlighted = options
            .highlight
            .as_deref()
            .is_some_and(|target| node.label.contains(target));
        let fill = if highlighted { TARGET_FILL } else { NODE_FILL };
        let _ = writeln!(
            svg,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="{radius:.1}" fill="{fill}"><title>{}</title></circle>"#,
            escape(&node.id)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{:.1}" font-size="{font:.1}" font-family="sans-serif" text-anchor="middle">{}</text>"#,
            y - radius - 2.0,
            escape(&node.label)
        );
    }
    let _ = writeln!(svg, "</g>");
    svg.push_str("</svg>\n");
    svg
}

/// Render to a file; only `.svg` paths are accepted
pub fn write_image(graph: &CoauthorGraph, path: impl AsRef<Path>, options: &RenderOptions) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::UnsupportedImageFormat {
            extension,
            accepted: ACCEPTED_EXTENSIONS
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    std::fs::write(path, render_svg(graph, options))?;
    info!(path = %path.display(), nodes = graph.node_count(), "Graph image written");
    Ok(())
}
