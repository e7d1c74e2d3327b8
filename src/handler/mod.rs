//! Binds a parsed JSON request document to the catalogue, renderer and
//! router, and assembles the JSON reply document.
//!
//! Ported from the original's `json_reader.cpp`: stops (with their distance
//! rows) are registered before any bus, `render_settings`/`routing_settings`
//! are parsed once, then `stat_requests` are dispatched in array order.

use crate::catalogue::{self, Catalogue};
use crate::json::{self, Value};
use crate::render::{RenderSettings, Renderer};
use crate::routing::{self, Router};
use crate::svg::Color;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] json::Error),
    #[error(transparent)]
    Catalogue(#[from] catalogue::Error),
    #[error("request is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid color")]
    InvalidColor(String),
    #[error("unrecognized request type '{0}'")]
    UnknownRequestType(String),
}

/// Parses `input`, ingests it into a fresh catalogue, builds the renderer
/// and router, dispatches every `stat_requests` entry, and returns the
/// pretty-printed reply array.
///
/// Ingest failures (duplicate/unknown stops, malformed JSON, missing
/// required fields) abort the whole batch with `Err`. Per-query failures
/// (`Bus`/`Stop`/`Route` targets not found) never abort; they surface as a
/// `{"error_message": "not found"}` reply for that query alone.
pub fn run(input: &str) -> Result<String, Error> {
    let document = json::parse(input)?;
    let (catalogue, render_settings, bus_wait_time, bus_velocity) = ingest(&document)?;
    let renderer = Renderer::new(&catalogue, render_settings);
    let router = Router::new(&catalogue, bus_wait_time, bus_velocity);
    tracing::info!(
        stops = catalogue.unique_stops().len(),
        buses = catalogue.unique_buses().len(),
        "ingested catalogue"
    );

    let stat_requests = document
        .get("stat_requests")?
        .map(Value::as_array)
        .transpose()?
        .cloned()
        .unwrap_or_default();

    let mut builder = json::Builder::new();
    builder.start_array()?;
    for request in &stat_requests {
        let reply = dispatch(request, &catalogue, &renderer, &router)?;
        builder.value(reply)?;
    }
    builder.end_array()?;
    let replies = builder.build()?;

    Ok(json::print_pretty(&replies))
}

fn ingest(document: &Value) -> Result<(Catalogue, RenderSettings, f64, f64), Error> {
    let mut catalogue = Catalogue::new();

    let base_requests = document
        .get("base_requests")?
        .map(Value::as_array)
        .transpose()?
        .cloned()
        .unwrap_or_default();

    // Pass 1a: register every stop (without distances yet), so that a
    // distance row may reference a stop declared later in the array.
    let mut pending_distances = Vec::new();
    for entry in &base_requests {
        if request_type(entry)? != "Stop" {
            continue;
        }
        let name = field_str(entry, "name")?;
        let latitude = field_f64(entry, "latitude")?;
        let longitude = field_f64(entry, "longitude")?;
        let from = catalogue.add_stop(name, crate::geo::Coordinates::new(latitude, longitude))?;

        if let Some(distances) = entry.get("road_distances")? {
            for (other, meters) in distances.as_object()? {
                pending_distances.push((from, name.to_string(), other.clone(), meters.as_int()? as u32));
            }
        }
    }

    // Pass 1b: apply distance rows now that every stop id is resolvable.
    for (from, from_name, to_name, meters) in pending_distances {
        let to = catalogue
            .stop_id(&to_name)
            .ok_or_else(|| catalogue::Error::UnknownStop {
                bus: from_name,
                stop: to_name,
            })?;
        catalogue.add_distance(from, to, meters);
    }

    // Pass 2: register buses; every referenced stop already exists.
    for entry in &base_requests {
        if request_type(entry)? != "Bus" {
            continue;
        }
        let name = field_str(entry, "name")?;
        let is_roundtrip = field_bool(entry, "is_roundtrip")?;
        let stops_value = entry.get("stops")?.ok_or(Error::MissingField("stops"))?;
        let stop_names: Vec<&str> = stops_value
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect::<Result<_, _>>()?;
        catalogue.add_bus(name, &stop_names, is_roundtrip)?;
    }

    let render_settings = parse_render_settings(document)?;
    let routing_settings = document
        .get("routing_settings")?
        .ok_or(Error::MissingField("routing_settings"))?;
    let bus_wait_time = field_f64(routing_settings, "bus_wait_time")?;
    let bus_velocity = field_f64(routing_settings, "bus_velocity")?;

    Ok((catalogue, render_settings, bus_wait_time, bus_velocity))
}

fn request_type(entry: &Value) -> Result<&str, Error> {
    field_str(entry, "type")
}

fn field_str<'a>(entry: &'a Value, key: &'static str) -> Result<&'a str, Error> {
    entry
        .get(key)?
        .ok_or(Error::MissingField(key))?
        .as_str()
        .map_err(Error::from)
}

fn field_f64(entry: &Value, key: &'static str) -> Result<f64, Error> {
    entry
        .get(key)?
        .ok_or(Error::MissingField(key))?
        .as_real()
        .map_err(Error::from)
}

fn field_bool(entry: &Value, key: &'static str) -> Result<bool, Error> {
    entry
        .get(key)?
        .ok_or(Error::MissingField(key))?
        .as_bool()
        .map_err(Error::from)
}

fn field_u32(entry: &Value, key: &'static str) -> Result<u32, Error> {
    Ok(field_f64(entry, key)? as u32)
}

fn parse_render_settings(document: &Value) -> Result<RenderSettings, Error> {
    let s = document
        .get("render_settings")?
        .ok_or(Error::MissingField("render_settings"))?;

    let offset = |key: &'static str| -> Result<(f64, f64), Error> {
        let pair = s.get(key)?.ok_or(Error::MissingField(key))?.as_array()?;
        let dx = pair.first().ok_or(Error::MissingField(key))?.as_real()?;
        let dy = pair.get(1).ok_or(Error::MissingField(key))?.as_real()?;
        Ok((dx, dy))
    };

    let underlayer_color = parse_color(s.get("underlayer_color")?.ok_or(Error::MissingField("underlayer_color"))?)?;
    let palette_value = s
        .get("color_palette")?
        .ok_or(Error::MissingField("color_palette"))?
        .as_array()?;
    let color_palette = palette_value
        .iter()
        .map(parse_color)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RenderSettings {
        width: field_f64(s, "width")?,
        height: field_f64(s, "height")?,
        padding: field_f64(s, "padding")?,
        line_width: field_f64(s, "line_width")?,
        stop_radius: field_f64(s, "stop_radius")?,
        bus_label_font_size: field_u32(s, "bus_label_font_size")?,
        bus_label_offset: offset("bus_label_offset")?,
        stop_label_font_size: field_u32(s, "stop_label_font_size")?,
        stop_label_offset: offset("stop_label_offset")?,
        underlayer_color,
        underlayer_width: field_f64(s, "underlayer_width")?,
        color_palette,
    })
}

/// A color is a name string, `[r,g,b]` (0..255 ints) or `[r,g,b,a]` (`a` a
/// real 0..1), matching the original's `json::Node`-variant color grammar.
fn parse_color(value: &Value) -> Result<Color, Error> {
    if let Ok(name) = value.as_str() {
        return Ok(Color::Name(name.to_owned()));
    }
    let parts = value
        .as_array()
        .map_err(|_| Error::InvalidColor(format!("{value:?}")))?;
    match parts.len() {
        3 => Ok(Color::Rgb {
            r: parts[0].as_int().map_err(|_| Error::InvalidColor(format!("{value:?}")))? as u8,
            g: parts[1].as_int().map_err(|_| Error::InvalidColor(format!("{value:?}")))? as u8,
            b: parts[2].as_int().map_err(|_| Error::InvalidColor(format!("{value:?}")))? as u8,
        }),
        4 => Ok(Color::Rgba {
            r: parts[0].as_int().map_err(|_| Error::InvalidColor(format!("{value:?}")))? as u8,
            g: parts[1].as_int().map_err(|_| Error::InvalidColor(format!("{value:?}")))? as u8,
            b: parts[2].as_int().map_err(|_| Error::InvalidColor(format!("{value:?}")))? as u8,
            a: parts[3].as_real().map_err(|_| Error::InvalidColor(format!("{value:?}")))?,
        }),
        _ => Err(Error::InvalidColor(format!("{value:?}"))),
    }
}

fn dispatch(
    request: &Value,
    catalogue: &Catalogue,
    renderer: &Renderer<'_>,
    router: &Router<'_>,
) -> Result<Value, Error> {
    let id = field_i64(request, "id")?;
    match request_type(request)? {
        "Bus" => {
            let name = field_str(request, "name")?;
            Ok(match catalogue.route_info(name) {
                Some(info) => reply_bus(id, &info),
                None => not_found(id),
            })
        }
        "Stop" => {
            let name = field_str(request, "name")?;
            Ok(match catalogue.stop_info(name) {
                Some(info) => reply_stop(id, &info),
                None => not_found(id),
            })
        }
        "Map" => {
            let svg = renderer.render().render();
            Ok(reply_map(id, &svg))
        }
        "Route" => {
            let from = field_str(request, "from")?;
            let to = field_str(request, "to")?;
            Ok(match router.route_info(from, to) {
                Ok(info) => reply_route(id, &info),
                Err(routing::Error::UnknownStop(_)) | Err(routing::Error::NoRoute) => not_found(id),
            })
        }
        other => Err(Error::UnknownRequestType(other.to_owned())),
    }
}

fn field_i64(entry: &Value, key: &'static str) -> Result<i64, Error> {
    entry
        .get(key)?
        .ok_or(Error::MissingField(key))?
        .as_int()
        .map_err(Error::from)
}

fn not_found(id: i64) -> Value {
    json::object_from([
        ("request_id", Value::Int(id)),
        ("error_message", Value::Str("not found".to_string())),
    ])
}

fn reply_bus(id: i64, info: &catalogue::RouteInfo) -> Value {
    json::object_from([
        ("request_id", Value::Int(id)),
        ("curvature", Value::Real(info.curvature)),
        ("route_length", Value::Int(info.route_length as i64)),
        ("stop_count", Value::Int(info.stop_count as i64)),
        ("unique_stop_count", Value::Int(info.unique_stop_count as i64)),
    ])
}

fn reply_stop(id: i64, info: &catalogue::StopInfo) -> Value {
    json::object_from([
        ("request_id", Value::Int(id)),
        (
            "buses",
            Value::Array(info.buses.iter().cloned().map(Value::Str).collect()),
        ),
    ])
}

fn reply_map(id: i64, svg: &str) -> Value {
    json::object_from([
        ("request_id", Value::Int(id)),
        ("map", Value::Str(svg.to_owned())),
    ])
}

fn reply_route(id: i64, info: &routing::RouteInfo) -> Value {
    let items = info
        .items
        .iter()
        .map(|item| match item {
            routing::Item::Wait { stop_name, time } => json::object_from([
                ("type", Value::Str("Wait".to_string())),
                ("stop_name", Value::Str(stop_name.clone())),
                ("time", Value::Real(*time)),
            ]),
            routing::Item::Bus { bus_name, span_count, time } => json::object_from([
                ("type", Value::Str("Bus".to_string())),
                ("bus", Value::Str(bus_name.clone())),
                ("span_count", Value::Int(*span_count as i64)),
                ("time", Value::Real(*time)),
            ]),
        })
        .collect();
    json::object_from([
        ("request_id", Value::Int(id)),
        ("total_time", Value::Real(info.total_time)),
        ("items", Value::Array(items)),
    ])
}
