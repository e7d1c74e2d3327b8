//! Shortest-time passenger itineraries over the doubled-vertex graph.
//!
//! Grounded on the teacher's own graph/allocator idiom in
//! `raptor::allocator` (pre-sized adjacency, `thiserror::Error` with
//! not-found/no-route variants) for style; the algorithm itself is a
//! single-source Dijkstra over the original's doubled-vertex construction,
//! not RAPTOR rounds — this spec's routing model does not need RAPTOR's
//! round-based transfer counting.

mod graph;

use crate::catalogue::Catalogue;
use graph::Graph;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown stop '{0}'")]
    UnknownStop(String),
    #[error("no route between the given stops")]
    NoRoute,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Wait { stop_name: String, time: f64 },
    Bus { bus_name: String, span_count: u32, time: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub total_time: f64,
    pub items: Vec<Item>,
}

pub struct Router<'a> {
    catalogue: &'a Catalogue,
    graph: Graph,
}

/// A min-heap entry ordered by `time` ascending; `f64` doesn't implement
/// `Ord`, so total ordering is delegated to `f64::total_cmp` the way the
/// idiomatic "float in a `BinaryHeap`" pattern requires.
struct HeapEntry {
    time: f64,
    vertex: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` is a max-heap, we want the smallest time first.
        other.time.total_cmp(&self.time)
    }
}

impl<'a> Router<'a> {
    /// Builds the routing graph once from the frozen catalogue.
    pub fn new(catalogue: &'a Catalogue, bus_wait_time: f64, bus_velocity_kmh: f64) -> Self {
        let graph = graph::build(catalogue, bus_wait_time, bus_velocity_kmh);
        tracing::debug!(
            vertices = graph.vertex_count,
            edges = graph.edges.len(),
            "built routing graph"
        );
        Self { catalogue, graph }
    }

    pub fn route_info(&self, from: &str, to: &str) -> Result<RouteInfo, Error> {
        let from_id = self
            .catalogue
            .stop_id(from)
            .ok_or_else(|| Error::UnknownStop(from.to_string()))?;
        let to_id = self
            .catalogue
            .stop_id(to)
            .ok_or_else(|| Error::UnknownStop(to.to_string()))?;

        if from_id == to_id {
            return Ok(RouteInfo {
                total_time: 0.0,
                items: Vec::new(),
            });
        }

        let index_of = |id: crate::catalogue::StopId| -> Option<usize> {
            self.graph.stop_order.iter().position(|&s| s == id)
        };
        let from_idx = index_of(from_id).ok_or_else(|| Error::UnknownStop(from.to_string()))?;
        let to_idx = index_of(to_id).ok_or_else(|| Error::UnknownStop(to.to_string()))?;

        let start = graph::wait_vertex(from_idx);
        let goal = graph::wait_vertex(to_idx);

        self.dijkstra(start, goal)
    }

    fn dijkstra(&self, start: usize, goal: usize) -> Result<RouteInfo, Error> {
        let n = self.graph.vertex_count;
        let mut best_time = vec![f64::INFINITY; n];
        let mut incoming_edge: Vec<Option<usize>> = vec![None; n];
        let mut visited = vec![false; n];

        best_time[start] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry { time: 0.0, vertex: start });

        while let Some(HeapEntry { time, vertex }) = heap.pop() {
            if visited[vertex] {
                continue;
            }
            visited[vertex] = true;
            if vertex == goal {
                break;
            }
            for &graph::EdgeId(edge_idx) in &self.graph.adjacency[vertex] {
                let edge = &self.graph.edges[edge_idx];
                let candidate = time + edge.weight.time;
                if candidate < best_time[edge.to] {
                    best_time[edge.to] = candidate;
                    incoming_edge[edge.to] = Some(edge_idx);
                    heap.push(HeapEntry {
                        time: candidate,
                        vertex: edge.to,
                    });
                }
            }
        }

        if !visited[goal] {
            return Err(Error::NoRoute);
        }

        let mut path_edges = Vec::new();
        let mut cur = goal;
        while cur != start {
            let edge_idx = incoming_edge[cur].expect("reachable vertex must have an incoming edge");
            path_edges.push(edge_idx);
            cur = self.graph.edges[edge_idx].from;
        }
        path_edges.reverse();

        let items = path_edges
            .iter()
            .map(|&idx| self.edge_to_item(&self.graph.edges[idx]))
            .collect();

        Ok(RouteInfo {
            total_time: best_time[goal],
            items,
        })
    }

    fn edge_to_item(&self, edge: &graph::Edge) -> Item {
        if edge.from / 2 == edge.to / 2 {
            let stop_idx = edge.to / 2;
            let stop_id = self.graph.stop_order[stop_idx];
            Item::Wait {
                stop_name: self.catalogue.stop(stop_id).name.to_string(),
                time: edge.weight.time,
            }
        } else {
            Item::Bus {
                bus_name: edge
                    .weight
                    .bus_name
                    .as_ref()
                    .expect("ride edges always carry a bus name")
                    .to_string(),
                span_count: edge.weight.span_count,
                time: edge.weight.time,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn build_line(wait: f64, velocity: f64) -> Catalogue {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        let b = c.add_stop("B", Coordinates::new(0.0, 0.05)).unwrap();
        let cc = c.add_stop("C", Coordinates::new(0.0, 0.1)).unwrap();
        c.add_distance(a, b, 6000);
        c.add_distance(b, cc, 6000);
        c.add_bus("1", &["A", "B", "C"], true).unwrap();
        let _ = (wait, velocity);
        c
    }

    #[test]
    fn same_stop_is_zero_time_no_items() {
        let c = build_line(6.0, 40.0);
        let r = Router::new(&c, 6.0, 40.0);
        let info = r.route_info("A", "A").unwrap();
        assert_eq!(info.total_time, 0.0);
        assert!(info.items.is_empty());
    }

    #[test]
    fn fastest_path_matches_wait_plus_ride() {
        let c = build_line(6.0, 40.0);
        let r = Router::new(&c, 6.0, 40.0);
        let info = r.route_info("A", "C").unwrap();
        // time_coef = 60/(40*1000) = 0.0015 min/m; 12000m * 0.0015 = 18min; +6 wait = 24
        assert!((info.total_time - 24.0).abs() < 1e-9);
        assert_eq!(info.items.len(), 2);
        match &info.items[0] {
            Item::Wait { stop_name, time } => {
                assert_eq!(stop_name, "A");
                assert_eq!(*time, 6.0);
            }
            _ => panic!("expected Wait first"),
        }
        match &info.items[1] {
            Item::Bus { bus_name, span_count, time } => {
                assert_eq!(bus_name, "1");
                assert_eq!(*span_count, 2);
                assert!((*time - 18.0).abs() < 1e-9);
            }
            _ => panic!("expected Bus second"),
        }
    }

    #[test]
    fn unreachable_stop_is_no_route() {
        let mut c = build_line(6.0, 40.0);
        c.add_stop("Island", Coordinates::new(9.0, 9.0)).unwrap();
        // Island has no bus passing through, so it's excluded from the graph's
        // stop set entirely and any query naming it fails as unknown, not as
        // unreachable -- this exercises the unreachable-but-known case instead
        // by disconnecting two otherwise valid stops.
        let mut d = Catalogue::new();
        let a = d.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        d.add_stop("B", Coordinates::new(0.0, 1.0)).unwrap();
        d.add_bus("1", &["A", "A"], true).unwrap();
        let bus2_stop = d.add_stop("C", Coordinates::new(0.0, 2.0)).unwrap();
        let _ = (a, bus2_stop);
        d.add_bus("2", &["C", "C"], true).unwrap();
        let r = Router::new(&d, 1.0, 30.0);
        assert!(matches!(r.route_info("A", "C"), Err(Error::NoRoute)));
    }

    #[test]
    fn unknown_stop_is_an_error() {
        let c = build_line(6.0, 40.0);
        let r = Router::new(&c, 6.0, 40.0);
        assert!(matches!(r.route_info("A", "Nowhere"), Err(Error::UnknownStop(_))));
    }

    #[test]
    fn transfer_itinerary_alternates_wait_and_bus() {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        let b = c.add_stop("B", Coordinates::new(0.0, 0.01)).unwrap();
        let cc = c.add_stop("C", Coordinates::new(0.0, 0.02)).unwrap();
        c.add_distance(a, b, 1000);
        c.add_distance(b, cc, 1000);
        c.add_bus("L1", &["A", "B"], true).unwrap();
        c.add_bus("L2", &["B", "C"], true).unwrap();
        let r = Router::new(&c, 2.0, 60.0);
        let info = r.route_info("A", "C").unwrap();
        assert!((info.total_time - 6.0).abs() < 1e-9);
        assert_eq!(info.items.len(), 4);
    }
}
