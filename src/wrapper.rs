//! HTML host documents for the browser backend

use crate::color::Rgba;
use crate::dimensions::Canvas;

/// Substrings that mark flowchart-style diagram exports.
pub const DIAGRAM_MARKERS: &[&str] = &["mermaid", "flowchart"];

/// Body padding used by the diagram template, on each side.
const DIAGRAM_PADDING: u32 = 10;

/// Which host document to use for a piece of markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Forces every element visible with legible colors and strokes
    Diagram,
    /// Plain page with the requested background and no forced styling
    Generic,
}

impl Template {
    pub fn detect(svg: &str) -> Self {
        if DIAGRAM_MARKERS.iter().any(|m| svg.contains(m)) {
            Template::Diagram
        } else {
            Template::Generic
        }
    }
}

/// Embed `svg` into an HTML page sized for `canvas`.
pub fn wrap_document(svg: &str, canvas: Canvas, background: Rgba) -> String {
    let bg = background.to_css();
    match Template::detect(svg) {
        Template::Diagram => diagram_document(svg, canvas, &bg),
        Template::Generic => generic_document(svg, &bg),
    }
}

fn diagram_document(svg: &str, canvas: Canvas, bg: &str) -> String {
    let svg_width = canvas.width.saturating_sub(DIAGRAM_PADDING * 2).max(1);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Diagram SVG Renderer</title>
  <style>
    body {{
      margin: 0;
      padding: {pad}px;
      background-color: {bg};
      font-family: "trebuchet ms", verdana, arial, sans-serif;
      width: {width}px;
      height: auto;
      min-height: {height}px;
      overflow: visible;
    }}
    svg {{
      width: {svg_width}px !important;
      height: auto !important;
      display: block;
      margin: 0;
    }}
    svg * {{
      opacity: 1 !important;
      visibility: visible !important;
    }}
    svg text, svg span, svg foreignObject, .nodeLabel, .edgeLabel {{
      fill: #000 !important;
      color: #000 !important;
      opacity: 1 !important;
    }}
    svg rect, svg polygon, svg path, svg circle, svg ellipse {{
      stroke: #333 !important;
      stroke-width: 2px !important;
      opacity: 1 !important;
    }}
    svg rect {{
      fill: #f9f9f9 !important;
    }}
    svg path {{
      stroke: #333 !important;
      fill: none !important;
    }}
  </style>
</head>
<body>
  {svg}
</body>
</html>"#,
        pad = DIAGRAM_PADDING,
        width = canvas.width,
        height = canvas.height,
    )
}

fn generic_document(svg: &str, bg: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>SVG Renderer</title>
  <style>
    body {{
      margin: 0;
      padding: 0;
      background-color: {bg};
      font-family: "trebuchet ms", verdana, arial, sans-serif;
    }}
  </style>
</head>
<body>
  {svg}
</body>
</html>"#
    )
}
