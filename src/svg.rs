//! Typed SVG primitives and a document that renders them to XML text.

use std::fmt::Write as _;

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

#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    None,
    Name(String),
    Rgb { r: u8, g: u8, b: u8 },
    Rgba { r: u8, g: u8, b: u8, a: f64 },
}

impl Default for Color {
    fn default() -> Self {
        Color::None
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::None => write!(f, "none"),
            Color::Name(n) => write!(f, "{n}"),
            Color::Rgb { r, g, b } => write!(f, "rgb({r},{g},{b})"),
            Color::Rgba { r, g, b, a } => write!(f, "rgba({r},{g},{b},{a})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLineCap {
    Butt,
    Round,
    Square,
}

impl std::fmt::Display for StrokeLineCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrokeLineCap::Butt => "butt",
            StrokeLineCap::Round => "round",
            StrokeLineCap::Square => "square",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLineJoin {
    Arcs,
    Bevel,
    Miter,
    MiterClip,
    Round,
}

impl std::fmt::Display for StrokeLineJoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrokeLineJoin::Arcs => "arcs",
            StrokeLineJoin::Bevel => "bevel",
            StrokeLineJoin::Miter => "miter",
            StrokeLineJoin::MiterClip => "miter-clip",
            StrokeLineJoin::Round => "round",
        };
        write!(f, "{s}")
    }
}

/// Stroke/fill attributes shared by every primitive. Composition stands in
/// for the original's CRTP `PathProps` mixin, which Rust has no analogue
/// for.
#[derive(Debug, Clone, Default)]
pub struct ShapeAttrs {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: Option<f64>,
    pub stroke_line_cap: Option<StrokeLineCap>,
    pub stroke_line_join: Option<StrokeLineJoin>,
}

impl ShapeAttrs {
    fn render(&self, out: &mut String) {
        if !matches!(self.fill, Color::None) {
            let _ = write!(out, " fill=\"{}\"", self.fill);
        }
        if !matches!(self.stroke, Color::None) {
            let _ = write!(out, " stroke=\"{}\"", self.stroke);
        }
        if let Some(w) = self.stroke_width {
            let _ = write!(out, " stroke-width=\"{w}\"");
        }
        if let Some(cap) = self.stroke_line_cap {
            let _ = write!(out, " stroke-linecap=\"{cap}\"");
        }
        if let Some(join) = self.stroke_line_join {
            let _ = write!(out, " stroke-linejoin=\"{join}\"");
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub attrs: ShapeAttrs,
}

#[derive(Debug, Clone, Default)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub attrs: ShapeAttrs,
}

#[derive(Debug, Clone, Default)]
pub struct Text {
    pub position: Point,
    pub offset: Point,
    pub font_size: u32,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub data: String,
    pub attrs: ShapeAttrs,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

impl From<Polyline> for Shape {
    fn from(p: Polyline) -> Self {
        Shape::Polyline(p)
    }
}

impl From<Text> for Shape {
    fn from(t: Text) -> Self {
        Shape::Text(t)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    shapes: Vec<Shape>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for shape in &self.shapes {
            render_shape(shape, &mut out);
        }
        out.push_str("</svg>");
        out
    }
}

fn render_shape(shape: &Shape, out: &mut String) {
    match shape {
        Shape::Circle(c) => {
            let _ = write!(
                out,
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                c.center.x, c.center.y, c.radius
            );
            c.attrs.render(out);
            out.push_str("/>\n");
        }
        Shape::Polyline(p) => {
            out.push_str("  <polyline points=\"");
            for (i, pt) in p.points.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{},{}", pt.x, pt.y);
            }
            out.push('"');
            p.attrs.render(out);
            out.push_str("/>\n");
        }
        Shape::Text(t) => {
            out.push_str("  <text");
            let _ = write!(
                out,
                " x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
                t.position.x, t.position.y, t.offset.x, t.offset.y, t.font_size
            );
            if let Some(family) = &t.font_family {
                let _ = write!(out, " font-family=\"{family}\"");
            }
            if let Some(weight) = &t.font_weight {
                let _ = write!(out, " font-weight=\"{weight}\"");
            }
            t.attrs.render(out);
            out.push('>');
            escape_text(&t.data, out);
            out.push_str("</text>\n");
        }
    }
}

fn escape_text(data: &str, out: &mut String) {
    for c in data.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_xml_characters() {
        let mut out = String::new();
        escape_text(r#"a"b'c<d>e&f"#, &mut out);
        assert_eq!(out, "a&quot;b&apos;c&lt;d&gt;e&amp;f");
    }

    #[test]
    fn empty_document_has_bare_shell() {
        let doc = Document::new();
        let rendered = doc.render();
        assert!(rendered.starts_with("<?xml"));
        assert!(rendered.ends_with("</svg>"));
        assert!(!rendered.contains("<circle"));
    }

    #[test]
    fn circle_omits_none_fill() {
        let mut doc = Document::new();
        doc.add(Circle {
            center: Point::new(1.0, 2.0),
            radius: 3.0,
            attrs: ShapeAttrs::default(),
        });
        let rendered = doc.render();
        assert!(rendered.contains("<circle"));
        assert!(!rendered.contains("fill="));
    }
}
