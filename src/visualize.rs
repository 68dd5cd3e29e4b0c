//! SVG rendering of a route.
//!
//! Emits a self-contained vector image of the closed tour: direction-arrowed
//! edges, waypoint markers, name and coordinate labels, and the total tour
//! distance. This is a formatting collaborator of the engine; it has no
//! bearing on the evolution itself.

use crate::route::{closed_tour_distance, Waypoint};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;
const PADDING: f64 = 80.0;
const MARKER_RADIUS: f64 = 6.0;

/// A failed rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot render an empty route")]
    EmptyRoute,
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders `route` as an SVG file at `path`.
pub fn render_route_svg(route: &[Waypoint], path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let svg = route_svg(route)?;
    fs::write(path, svg).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the SVG document for `route`.
pub fn route_svg(route: &[Waypoint]) -> Result<String, RenderError> {
    if route.is_empty() {
        return Err(RenderError::EmptyRoute);
    }

    let (min_x, max_x) = bounds(route.iter().map(|w| w.x));
    let (min_y, max_y) = bounds(route.iter().map(|w| w.y));

    // Uniform scale preserving aspect ratio. A degenerate extent (all
    // waypoints on one vertical/horizontal line, or coincident) must not
    // produce NaN coordinates, so collapse to scale 1.
    let scale_x = scale_for(max_x - min_x, CANVAS_WIDTH);
    let scale_y = scale_for(max_y - min_y, CANVAS_HEIGHT);
    let mut scale = scale_x.min(scale_y);
    if !scale.is_finite() {
        scale = 1.0;
    }

    let to_canvas_x = |x: f64| PADDING + (x - min_x) * scale;
    let to_canvas_y = |y: f64| PADDING + (y - min_y) * scale;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg width="{CANVAS_WIDTH:.0}" height="{CANVAS_HEIGHT:.0}" xmlns="http://www.w3.org/2000/svg">"#
    );
    svg.push_str(concat!(
        "<defs>",
        r#"<marker id="arrowhead" markerWidth="10" markerHeight="7" refX="9" refY="3.5" orient="auto">"#,
        r#"<polygon points="0 0, 10 3.5, 0 7" fill="blue" />"#,
        "</marker>",
        "</defs>",
    ));

    // Tour edges, endpoints inset so arrows stop at the marker circles.
    for i in 0..route.len() {
        let current = &route[i];
        let next = &route[(i + 1) % route.len()];

        let x1 = to_canvas_x(current.x);
        let y1 = to_canvas_y(current.y);
        let x2 = to_canvas_x(next.x);
        let y2 = to_canvas_y(next.y);

        let dx = x2 - x1;
        let dy = y2 - y1;
        let length = (dx * dx + dy * dy).sqrt();
        if length > 0.0 {
            let offset_x = dx / length * MARKER_RADIUS;
            let offset_y = dy / length * MARKER_RADIUS;
            let _ = write!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="blue" stroke-width="2" marker-end="url(#arrowhead)" />"#,
                x1 + offset_x,
                y1 + offset_y,
                x2 - offset_x,
                y2 - offset_y,
            );
        }
    }

    for waypoint in route {
        let _ = write!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{MARKER_RADIUS:.0}" fill="red" stroke="black" stroke-width="1" />"#,
            to_canvas_x(waypoint.x),
            to_canvas_y(waypoint.y),
        );
    }

    for waypoint in route {
        let x = to_canvas_x(waypoint.x);
        let label_y = to_canvas_y(waypoint.y) - 12.0;
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="Arial, sans-serif" font-size="12" font-weight="bold" fill="black">{}</text>"#,
            x,
            label_y,
            escape_text(&waypoint.name),
        );
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="Arial, sans-serif" font-size="10" fill="gray">({:.1},{:.1})</text>"#,
            x,
            label_y - 14.0,
            waypoint.x,
            waypoint.y,
        );
    }

    let _ = write!(
        svg,
        r#"<text x="{:.2}" y="25" text-anchor="middle" font-family="Arial, sans-serif" font-size="18" font-weight="bold" fill="black">Route Visualization</text>"#,
        CANVAS_WIDTH / 2.0,
    );
    let _ = write!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="Arial, sans-serif" font-size="14" fill="black">Total Distance: {:.2}</text>"#,
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT - 15.0,
        closed_tour_distance(route),
    );

    svg.push_str("</svg>");
    Ok(svg)
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

fn scale_for(span: f64, canvas: f64) -> f64 {
    if span > 0.0 {
        (canvas - 2.0 * PADDING) / span
    } else {
        f64::INFINITY
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
