//! Black-box tests driving whole JSON request documents through
//! `handler::run`, mirroring the scenarios a caller would actually submit.

use transit_atlas::handler;
use transit_atlas::json::{self, Value};

fn reply_at(output: &str, index: usize) -> Value {
    let parsed = json::parse(output).unwrap();
    parsed.as_array().unwrap()[index].clone()
}

const RENDER_SETTINGS: &str = r#"
    "render_settings": {
        "width": 600, "height": 400, "padding": 50,
        "line_width": 14, "stop_radius": 5,
        "bus_label_font_size": 20, "bus_label_offset": [7, 15],
        "stop_label_font_size": 18, "stop_label_offset": [7, -3],
        "underlayer_color": [255, 255, 255, 0.85], "underlayer_width": 3,
        "color_palette": ["green", [255, 160, 0], "red"]
    }
"#;

#[test]
fn non_roundtrip_bus_expands_to_a_palindrome() {
    let input = format!(
        r#"{{
            "base_requests": [
                {{"type": "Stop", "name": "A", "latitude": 55.6, "longitude": 37.2, "road_distances": {{"B": 100}}}},
                {{"type": "Stop", "name": "B", "latitude": 55.61, "longitude": 37.21, "road_distances": {{"C": 200, "A": 150}}}},
                {{"type": "Stop", "name": "C", "latitude": 55.62, "longitude": 37.22, "road_distances": {{"B": 250}}}},
                {{"type": "Bus", "name": "2", "stops": ["A", "B", "C"], "is_roundtrip": false}}
            ],
            {RENDER_SETTINGS},
            "routing_settings": {{"bus_wait_time": 6, "bus_velocity": 40}},
            "stat_requests": [{{"id": 1, "type": "Bus", "name": "2"}}]
        }}"#
    );
    let output = handler::run(&input).unwrap();
    let reply = reply_at(&output, 0);
    assert_eq!(reply.get("stop_count").unwrap().unwrap().as_int().unwrap(), 5);
    assert_eq!(reply.get("unique_stop_count").unwrap().unwrap().as_int().unwrap(), 3);
    // A->B 100, B->C 200, C->B 250, B->A 150 = 700
    assert_eq!(reply.get("route_length").unwrap().unwrap().as_int().unwrap(), 700);
}

#[test]
fn stop_without_buses_has_empty_list_unknown_stop_is_not_found() {
    let input = format!(
        r#"{{
            "base_requests": [
                {{"type": "Stop", "name": "X", "latitude": 1.0, "longitude": 1.0}}
            ],
            {RENDER_SETTINGS},
            "routing_settings": {{"bus_wait_time": 1, "bus_velocity": 1}},
            "stat_requests": [
                {{"id": 1, "type": "Stop", "name": "X"}},
                {{"id": 2, "type": "Stop", "name": "Y"}}
            ]
        }}"#
    );
    let output = handler::run(&input).unwrap();

    let x = reply_at(&output, 0);
    assert_eq!(x.get("buses").unwrap().unwrap().as_array().unwrap().len(), 0);

    let y = reply_at(&output, 1);
    assert_eq!(
        y.get("error_message").unwrap().unwrap().as_str().unwrap(),
        "not found"
    );
}

#[test]
fn map_rendering_is_byte_identical_across_runs() {
    let input = format!(
        r#"{{
            "base_requests": [
                {{"type": "Stop", "name": "A", "latitude": 55.6, "longitude": 37.2, "road_distances": {{"B": 1000}}}},
                {{"type": "Stop", "name": "B", "latitude": 55.61, "longitude": 37.21, "road_distances": {{"A": 1000}}}},
                {{"type": "Bus", "name": "1", "stops": ["A", "B", "A"], "is_roundtrip": true}}
            ],
            {RENDER_SETTINGS},
            "routing_settings": {{"bus_wait_time": 6, "bus_velocity": 40}},
            "stat_requests": [{{"id": 1, "type": "Map"}}]
        }}"#
    );
    let first = handler::run(&input).unwrap();
    let second = handler::run(&input).unwrap();
    assert_eq!(first, second);

    let svg = reply_at(&first, 0);
    let svg_text = svg.get("map").unwrap().unwrap().as_str().unwrap();
    assert!(svg_text.starts_with("<?xml"));
    assert!(svg_text.trim_end().ends_with("</svg>"));
}

#[test]
fn route_total_time_matches_the_sum_of_its_items() {
    let input = format!(
        r#"{{
            "base_requests": [
                {{"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": {{"B": 6000}}}},
                {{"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 0.05, "road_distances": {{"C": 6000}}}},
                {{"type": "Stop", "name": "C", "latitude": 0.0, "longitude": 0.1}},
                {{"type": "Bus", "name": "1", "stops": ["A", "B", "C"], "is_roundtrip": true}}
            ],
            {RENDER_SETTINGS},
            "routing_settings": {{"bus_wait_time": 6, "bus_velocity": 40}},
            "stat_requests": [{{"id": 5, "type": "Route", "from": "A", "to": "C"}}]
        }}"#
    );
    let output = handler::run(&input).unwrap();
    let reply = reply_at(&output, 0);
    let total_time = reply.get("total_time").unwrap().unwrap().as_real().unwrap();
    assert!((total_time - 24.0).abs() < 1e-9);

    let items = reply.get("items").unwrap().unwrap().as_array().unwrap();
    let sum: f64 = items
        .iter()
        .map(|i| i.get("time").unwrap().unwrap().as_real().unwrap())
        .sum();
    assert!((sum - total_time).abs() < 1e-9);

    // Every Bus item is preceded by a Wait item at the boarding stop.
    assert_eq!(items[0].get("type").unwrap().unwrap().as_str().unwrap(), "Wait");
    assert_eq!(items[1].get("type").unwrap().unwrap().as_str().unwrap(), "Bus");
    assert!(items[1].get("span_count").unwrap().unwrap().as_int().unwrap() >= 1);
}

#[test]
fn same_stop_route_query_is_zero_time_with_no_items() {
    let input = format!(
        r#"{{
            "base_requests": [
                {{"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0}}
            ],
            {RENDER_SETTINGS},
            "routing_settings": {{"bus_wait_time": 5, "bus_velocity": 30}},
            "stat_requests": [{{"id": 1, "type": "Route", "from": "A", "to": "A"}}]
        }}"#
    );
    let output = handler::run(&input).unwrap();
    let reply = reply_at(&output, 0);
    assert_eq!(reply.get("total_time").unwrap().unwrap().as_real().unwrap(), 0.0);
    assert_eq!(reply.get("items").unwrap().unwrap().as_array().unwrap().len(), 0);
}

#[test]
fn unreachable_route_is_reported_as_not_found() {
    let input = format!(
        r#"{{
            "base_requests": [
                {{"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0}},
                {{"type": "Stop", "name": "B", "latitude": 1.0, "longitude": 1.0}},
                {{"type": "Bus", "name": "1", "stops": ["A", "A"], "is_roundtrip": true}}
            ],
            {RENDER_SETTINGS},
            "routing_settings": {{"bus_wait_time": 5, "bus_velocity": 30}},
            "stat_requests": [{{"id": 1, "type": "Route", "from": "A", "to": "B"}}]
        }}"#
    );
    let output = handler::run(&input).unwrap();
    let reply = reply_at(&output, 0);
    assert_eq!(
        reply.get("error_message").unwrap().unwrap().as_str().unwrap(),
        "not found"
    );
}

#[test]
fn malformed_input_is_a_fatal_error_not_a_reply() {
    assert!(handler::run("{not json").is_err());
}
