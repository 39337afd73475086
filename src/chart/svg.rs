//! SVG export of a scene, text included.

use std::fmt::Write;
use std::path::Path;

use crate::color::Rgb;
use crate::error::{Error, Result};

use super::scene::{Label, Scene, Shape, TextAnchor};

const FONT_FAMILY: &str = "system-ui, -apple-system, Segoe UI, sans-serif";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn anchor_attr(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn write_label(out: &mut String, label: &Label) {
    let _ = write!(
        out,
        r#"  <text x="{:.1}" y="{:.1}" font-size="{}" text-anchor="{}" fill="{}""#,
        label.position.x,
        label.position.y,
        label.size,
        anchor_attr(label.anchor),
        label.color
    );
    if label.bold {
        out.push_str(r#" font-weight="600""#);
    }
    if label.rotation_deg != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({}, {:.1}, {:.1})""#,
            label.rotation_deg, label.position.x, label.position.y
        );
    }
    let _ = writeln!(out, ">{}</text>", escape(&label.text));
}

/// Render the scene as a standalone SVG document on a `background` page
pub fn to_svg(scene: &Scene, title: &str, background: Rgb) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
            r#"viewBox="0 0 {w} {h}" font-family="{font}">"#
        ),
        w = scene.width,
        h = scene.height,
        font = FONT_FAMILY
    );
    let _ = writeln!(out, "  <title>{}</title>", escape(title));
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        background
    );

    for shape in &scene.shapes {
        match shape {
            Shape::Rect {
                bounds,
                fill,
                opacity,
                corner_radius,
                stroke,
            } => {
                let _ = write!(
                    out,
                    r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}""#,
                    bounds.x, bounds.y, bounds.width, bounds.height, fill
                );
                if *corner_radius > 0.0 {
                    let _ = write!(out, r#" rx="{}""#, corner_radius);
                }
                if *opacity < 1.0 {
                    let _ = write!(out, r#" opacity="{}""#, opacity);
                }
                if let Some(stroke) = stroke {
                    let _ = write!(
                        out,
                        r#" stroke="{}" stroke-width="{}""#,
                        stroke.color, stroke.width
                    );
                }
                out.push_str("/>\n");
            }
            Shape::Line { from, to, stroke } => {
                let _ = writeln!(
                    out,
                    concat!(
                        r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" "#,
                        r#"stroke="{}" stroke-width="{}"/>"#
                    ),
                    from.x, from.y, to.x, to.y, stroke.color, stroke.width
                );
            }
            Shape::Polyline { points, stroke } => {
                let mut d = String::new();
                for (i, p) in points.iter().enumerate() {
                    let command = if i == 0 { 'M' } else { 'L' };
                    let separator = if i == 0 { "" } else { " " };
                    let _ = write!(d, "{}{} {:.2} {:.2}", separator, command, p.x, p.y);
                }
                let _ = writeln!(
                    out,
                    concat!(
                        r#"  <path d="{}" stroke="{}" stroke-width="{}" fill="none" "#,
                        r#"stroke-linecap="round" stroke-linejoin="round"/>"#
                    ),
                    d, stroke.color, stroke.width
                );
            }
            Shape::Circle {
                center,
                radius,
                fill,
                opacity,
            } => {
                let _ = write!(
                    out,
                    r#"  <circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}""#,
                    center.x, center.y, radius, fill
                );
                if *opacity < 1.0 {
                    let _ = write!(out, r#" opacity="{}""#, opacity);
                }
                out.push_str("/>\n");
            }
            Shape::Text(label) => write_label(&mut out, label),
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Write the scene to `path` as SVG
pub fn write_svg(path: &Path, scene: &Scene, title: &str, background: Rgb) -> Result<()> {
    std::fs::write(path, to_svg(scene, title, background)).map_err(|e| Error::io(path, e))
}
