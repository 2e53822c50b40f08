//! SVG output encoder.
//!
//! Vector output for the surface chart. Faces and markers may carry a
//! `<title>` child, which browsers show as a hover tooltip.

use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Point;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Background color
    background: Rgba,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect { x: f32, y: f32, width: f32, height: f32, fill: Rgba },
    /// Line
    Line { x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32 },
    /// Closed polygon, optionally with a hover tooltip
    Polygon {
        points: Vec<Point>,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
        title: Option<String>,
    },
    /// Circle, optionally with a hover tooltip
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba, title: Option<String> },
    /// Text
    Text { x: f32, y: f32, text: String, font_size: f32, fill: Rgba, anchor: TextAnchor },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl SvgEncoder {
    /// Create a new SVG encoder with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Rgba::WHITE, elements: Vec::new() }
    }

    /// Canvas size.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Elements added so far.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Add a filled rectangle.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgba) {
        self.add_element(SvgElement::Rect { x, y, width, height, fill });
    }

    /// Add a line.
    pub fn line(&mut self, from: Point, to: Point, stroke: Rgba, stroke_width: f32) {
        self.add_element(SvgElement::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            stroke,
            stroke_width,
        });
    }

    /// Add a filled polygon.
    pub fn polygon(&mut self, points: &[Point], fill: Rgba, stroke: Option<Rgba>, stroke_width: f32) {
        self.add_element(SvgElement::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
            stroke_width,
            title: None,
        });
    }

    /// Add a filled polygon with a hover tooltip.
    ///
    /// The outline uses the fill color so neighbouring faces meet without
    /// hairline gaps.
    pub fn face(&mut self, points: &[Point], fill: Rgba, tooltip: impl Into<String>) {
        self.add_element(SvgElement::Polygon {
            points: points.to_vec(),
            fill,
            stroke: Some(fill),
            stroke_width: 0.5,
            title: Some(tooltip.into()),
        });
    }

    /// Add a circle with an optional hover tooltip.
    pub fn circle(&mut self, center: Point, r: f32, fill: Rgba, tooltip: Option<String>) {
        self.add_element(SvgElement::Circle { cx: center.x, cy: center.y, r, fill, title: tooltip });
    }

    /// Add text with anchor.
    pub fn text(&mut self, at: Point, text: &str, font_size: f32, fill: Rgba, anchor: TextAnchor) {
        self.add_element(SvgElement::Text {
            x: at.x,
            y: at.y,
            text: text.to_string(),
            font_size,
            fill,
            anchor,
        });
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + self.elements.len() * 160);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            rgba_to_css(self.background)
        );

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

/// Escape XML special characters.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Coordinates are written with two decimals to keep output compact and
/// stable across runs.
fn points_attr(points: &[Point]) -> String {
    points.iter().map(|p| format!("{:.2},{:.2}", p.x, p.y)).collect::<Vec<_>>().join(" ")
}

fn title_child(title: Option<&String>) -> String {
    title.map(|t| format!("<title>{}</title>", escape_xml(t))).unwrap_or_default()
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill } => {
            format!(
                r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{}"/>"#,
                rgba_to_css(*fill)
            )
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => {
            format!(
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{stroke_width}"/>"#,
                rgba_to_css(*stroke)
            )
        }
        SvgElement::Polygon { points, fill, stroke, stroke_width, title } => {
            let stroke_attr = stroke
                .map(|s| {
                    format!(
                        r#" stroke="{}" stroke-width="{stroke_width}" stroke-linejoin="round""#,
                        rgba_to_css(s)
                    )
                })
                .unwrap_or_default();
            let open = format!(
                r#"<polygon points="{}" fill="{}"{stroke_attr}"#,
                points_attr(points),
                rgba_to_css(*fill)
            );
            match title {
                Some(_) => format!(r#"{open} class="face">{}</polygon>"#, title_child(title.as_ref())),
                None => format!("{open}/>"),
            }
        }
        SvgElement::Circle { cx, cy, r, fill, title } => {
            let open =
                format!(r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r}" fill="{}""#, rgba_to_css(*fill));
            match title {
                Some(_) => format!("{open}>{}</circle>", title_child(title.as_ref())),
                None => format!("{open}/>"),
            }
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            format!(
                r#"<text x="{x:.2}" y="{y:.2}" font-size="{font_size}" fill="{}" text-anchor="{anchor_str}" font-family="'Open Sans', verdana, arial, sans-serif">{}</text>"#,
                rgba_to_css(*fill),
                escape_xml(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(1000, 1000).render();

        assert!(svg.contains("width=\"1000\""));
        assert!(svg.contains("height=\"1000\""));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_rect() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.rect(10.0, 20.0, 30.0, 40.0, Rgba::RED);
        let svg = enc.render();

        assert!(svg.contains(r#"<rect x="10.00" y="20.00" width="30.00" height="40.00""#));
        assert!(svg.contains("rgb(255,0,0)"));
    }

    #[test]
    fn test_svg_line() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.line(Point::new(0.0, 0.0), Point::new(100.0, 50.5), Rgba::BLACK, 2.0);
        let svg = enc.render();

        assert!(svg.contains(r#"x2="100.00" y2="50.50""#));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn test_svg_polygon_without_title_self_closes() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.polygon(&square(), Rgba::PANE, None, 1.0);
        let svg = enc.render();

        assert!(svg.contains(r#"points="0.00,0.00 10.00,0.00 10.00,10.00 0.00,10.00""#));
        assert!(svg.contains("/>"));
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("stroke="));
    }

    #[test]
    fn test_svg_face_tooltip() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.face(&square(), Rgba::BLUE, "x: 1\ny: 2\nz: 0.5");
        let svg = enc.render();

        assert!(svg.contains(r#"class="face"><title>x: 1"#));
        assert!(svg.contains("<title>x: 1\ny: 2\nz: 0.5</title></polygon>"));
        assert!(svg.contains(r#"stroke="rgb(0,0,255)""#));
    }

    #[test]
    fn test_svg_circle() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.circle(Point::new(50.0, 50.0), 4.0, Rgba::RED, None);
        enc.circle(Point::new(20.0, 20.0), 4.0, Rgba::RED, Some("z: 1".into()));
        let svg = enc.render();

        assert!(svg.contains(r#"<circle cx="50.00" cy="50.00" r="4" fill="rgb(255,0,0)"/>"#));
        assert!(svg.contains("<title>z: 1</title></circle>"));
    }

    #[test]
    fn test_svg_text_anchor_and_escaping() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.text(Point::new(50.0, 50.0), "<b> & \"q\"", 12.0, Rgba::TEXT, TextAnchor::Middle);
        let svg = enc.render();

        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("&lt;b&gt; &amp; &quot;q&quot;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn test_svg_white_background() {
        let svg = SvgEncoder::new(100, 100).render();
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(r#"<rect width="100%" height="100%" fill="rgb(255,255,255)"/>"#));
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let css = rgba_to_css(Rgba::new(255, 0, 0, 128));
        assert_eq!(css, "rgba(255,0,0,0.502)");
    }

    #[test]
    fn test_svg_write_to_file() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.rect(10.0, 10.0, 80.0, 80.0, Rgba::BLUE);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        enc.write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, enc.render());
        assert_eq!(enc.elements().len(), 1);
        assert_eq!(enc.size(), (100, 100));
    }

    #[test]
    fn test_text_anchor_default() {
        assert_eq!(TextAnchor::default(), TextAnchor::Start);
    }
}
