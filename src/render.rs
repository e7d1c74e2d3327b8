//! Equirectangular projector and the layered SVG map renderer.
//!
//! Ported from the original's `SphereProjector` and `MapRenderer`; no
//! teacher module does map rendering, so the shape follows the original
//! directly while the idiom (structs, `Vec`-backed settings) follows
//! `catalogue`/`svg`.

use crate::catalogue::Catalogue;
use crate::geo::Coordinates;
use crate::svg::{Circle, Color, Document, Point, ShapeAttrs, StrokeLineCap, StrokeLineJoin, Text};

const EPSILON: f64 = 1e-6;

fn is_zero(v: f64) -> bool {
    v.abs() < EPSILON
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: (f64, f64),
    pub stop_label_font_size: u32,
    pub stop_label_offset: (f64, f64),
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

/// Maps geographic coordinates into the canvas rectangle, fitting the
/// bounding box of the given points with `padding` on every side.
struct Projector {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
}

impl Projector {
    fn new(points: &[Coordinates], width: f64, height: f64, padding: f64) -> Self {
        if points.is_empty() {
            return Self {
                padding,
                min_lon: 0.0,
                max_lat: 0.0,
                zoom: 0.0,
            };
        }

        let min_lon = points.iter().map(|p| p.longitude).fold(f64::INFINITY, f64::min);
        let max_lon = points
            .iter()
            .map(|p| p.longitude)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_lat = points.iter().map(|p| p.latitude).fold(f64::INFINITY, f64::min);
        let max_lat = points
            .iter()
            .map(|p| p.latitude)
            .fold(f64::NEG_INFINITY, f64::max);

        let width_zoom = (!is_zero(max_lon - min_lon)).then(|| (width - 2.0 * padding) / (max_lon - min_lon));
        let height_zoom = (!is_zero(max_lat - min_lat)).then(|| (height - 2.0 * padding) / (max_lat - min_lat));

        let zoom = match (width_zoom, height_zoom) {
            (Some(w), Some(h)) => w.min(h),
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => 0.0,
        };

        Self {
            padding,
            min_lon,
            max_lat,
            zoom,
        }
    }

    fn project(&self, c: Coordinates) -> Point {
        Point::new(
            (c.longitude - self.min_lon) * self.zoom + self.padding,
            (self.max_lat - c.latitude) * self.zoom + self.padding,
        )
    }
}

pub struct Renderer<'a> {
    catalogue: &'a Catalogue,
    settings: RenderSettings,
}

impl<'a> Renderer<'a> {
    pub fn new(catalogue: &'a Catalogue, settings: RenderSettings) -> Self {
        Self { catalogue, settings }
    }

    pub fn render(&self) -> Document {
        let mut doc = Document::new();
        let buses = self.catalogue.unique_buses();
        let stops = self.catalogue.unique_stops();
        let coordinates: Vec<Coordinates> = stops.iter().map(|s| s.coordinates).collect();
        let projector = Projector::new(
            &coordinates,
            self.settings.width,
            self.settings.height,
            self.settings.padding,
        );

        self.render_lines(&buses, &projector, &mut doc);
        self.render_bus_labels(&buses, &projector, &mut doc);
        self.render_stop_symbols(&stops, &projector, &mut doc);
        self.render_stop_labels(&stops, &projector, &mut doc);
        doc
    }

    fn render_lines(
        &self,
        buses: &[&crate::catalogue::Bus],
        projector: &Projector,
        doc: &mut Document,
    ) {
        if self.settings.color_palette.is_empty() {
            return;
        }
        let mut colors = self.settings.color_palette.iter().cycle();
        for bus in buses {
            if bus.stops.is_empty() {
                continue;
            }
            let color = colors.next().unwrap().clone();
            let points: Vec<Point> = bus
                .stops
                .iter()
                .map(|&id| projector.project(self.catalogue.stop(id).coordinates))
                .collect();
            doc.add(crate::svg::Polyline {
                points,
                attrs: ShapeAttrs {
                    fill: Color::None,
                    stroke: color,
                    stroke_width: Some(self.settings.line_width),
                    stroke_line_cap: Some(StrokeLineCap::Round),
                    stroke_line_join: Some(StrokeLineJoin::Round),
                },
            });
        }
    }

    fn render_bus_labels(
        &self,
        buses: &[&crate::catalogue::Bus],
        projector: &Projector,
        doc: &mut Document,
    ) {
        if self.settings.color_palette.is_empty() {
            return;
        }
        let mut colors = self.settings.color_palette.iter().cycle();
        for bus in buses {
            if bus.stops.is_empty() {
                continue;
            }
            let color = colors.next().unwrap().clone();
            let first = bus.stops[0];
            self.add_label_pair(
                &bus.name,
                color.clone(),
                projector.project(self.catalogue.stop(first).coordinates),
                true,
                doc,
            );
            if !bus.is_roundtrip {
                let mid = bus.stops[bus.stops.len() / 2];
                if mid != first {
                    self.add_label_pair(
                        &bus.name,
                        color,
                        projector.project(self.catalogue.stop(mid).coordinates),
                        true,
                        doc,
                    );
                }
            }
        }
    }

    fn render_stop_symbols(
        &self,
        stops: &[&crate::catalogue::Stop],
        projector: &Projector,
        doc: &mut Document,
    ) {
        for stop in stops {
            doc.add(Circle {
                center: projector.project(stop.coordinates),
                radius: self.settings.stop_radius,
                attrs: ShapeAttrs {
                    fill: Color::Name("white".to_string()),
                    ..Default::default()
                },
            });
        }
    }

    fn render_stop_labels(
        &self,
        stops: &[&crate::catalogue::Stop],
        projector: &Projector,
        doc: &mut Document,
    ) {
        for stop in stops {
            self.add_label_pair(
                &stop.name,
                Color::Name("black".to_string()),
                projector.project(stop.coordinates),
                false,
                doc,
            );
        }
    }

    /// Draws an underlay + foreground pair of text labels at `point`, the
    /// way the original's `AddText` does: same base text twice, once as an
    /// outline in the underlayer color, once filled in `color`.
    fn add_label_pair(&self, data: &str, color: Color, point: Point, bold: bool, doc: &mut Document) {
        let (font_size, offset) = if bold {
            (self.settings.bus_label_font_size, self.settings.bus_label_offset)
        } else {
            (self.settings.stop_label_font_size, self.settings.stop_label_offset)
        };
        let weight = bold.then(|| "bold".to_string());

        doc.add(Text {
            position: point,
            offset: Point::new(offset.0, offset.1),
            font_size,
            font_family: Some("Verdana".to_string()),
            font_weight: weight.clone(),
            data: data.to_string(),
            attrs: ShapeAttrs {
                fill: self.settings.underlayer_color.clone(),
                stroke: self.settings.underlayer_color.clone(),
                stroke_width: Some(self.settings.underlayer_width),
                stroke_line_cap: Some(StrokeLineCap::Round),
                stroke_line_join: Some(StrokeLineJoin::Round),
            },
        });

        doc.add(Text {
            position: point,
            offset: Point::new(offset.0, offset.1),
            font_size,
            font_family: Some("Verdana".to_string()),
            font_weight: weight,
            data: data.to_string(),
            attrs: ShapeAttrs {
                fill: color,
                ..Default::default()
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn settings() -> RenderSettings {
        RenderSettings {
            width: 600.0,
            height: 400.0,
            padding: 50.0,
            line_width: 14.0,
            stop_radius: 5.0,
            bus_label_font_size: 20,
            bus_label_offset: (7.0, 15.0),
            stop_label_font_size: 18,
            stop_label_offset: (7.0, -3.0),
            underlayer_color: Color::Rgba { r: 255, g: 255, b: 255, a: 0.85 },
            underlayer_width: 3.0,
            color_palette: vec![Color::Name("green".to_string()), Color::Rgb { r: 255, g: 160, b: 0 }],
        }
    }

    #[test]
    fn empty_catalogue_renders_bare_shell() {
        let c = Catalogue::new();
        let r = Renderer::new(&c, settings());
        let rendered = r.render().render();
        assert!(rendered.starts_with("<?xml"));
        assert!(!rendered.contains("<circle"));
    }

    #[test]
    fn renders_one_polyline_per_nonempty_bus() {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", Coordinates::new(55.0, 37.0)).unwrap();
        let b = c.add_stop("B", Coordinates::new(55.01, 37.01)).unwrap();
        c.add_distance(a, b, 1000);
        c.add_bus("1", &["A", "B", "A"], true).unwrap();
        let r = Renderer::new(&c, settings());
        let rendered = r.render().render();
        assert_eq!(rendered.matches("<polyline").count(), 1);
        assert_eq!(rendered.matches("<circle").count(), 2);
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", Coordinates::new(55.0, 37.0)).unwrap();
        let b = c.add_stop("B", Coordinates::new(55.01, 37.01)).unwrap();
        c.add_distance(a, b, 1000);
        c.add_bus("1", &["A", "B", "A"], true).unwrap();
        let r1 = Renderer::new(&c, settings()).render().render();
        let r2 = Renderer::new(&c, settings()).render().render();
        assert_eq!(r1, r2);
    }
}
