//! The in-memory transport catalogue: stops, buses, the directed road
//! distance index, and the per-stop bus set.
//!
//! Stops and buses live in append-only arenas addressed by [`StopId`] /
//! [`BusId`] rather than borrowed references or raw pointers — the safe,
//! indexed analogue of the original's pointer graph into append-only
//! deques. Grounded on `repository::Repository`'s `Box<[T]>` + `u32`-index
//! design, which is the teacher's current production shape (not the older,
//! superseded `engine::Engine`).

mod entities;

pub use entities::{Bus, BusId, Stop, StopId};

use crate::geo::{self, Coordinates};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("stop '{0}' was already added")]
    DuplicateStop(String),
    #[error("bus '{0}' was already added")]
    DuplicateBus(String),
    #[error("bus '{bus}' references unknown stop '{stop}'")]
    UnknownStop { bus: String, stop: String },
}

#[derive(Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_lookup: HashMap<Box<str>, StopId>,
    bus_lookup: HashMap<Box<str>, BusId>,
    /// Directed: `(from, to) -> meters`. Queried with a reverse fallback.
    distances: HashMap<(StopId, StopId), u32>,
    /// Bus names passing through each stop, kept sorted on insert.
    buses_by_stop: HashMap<StopId, Vec<Box<str>>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, name: &str, coordinates: Coordinates) -> Result<StopId, Error> {
        if self.stop_lookup.contains_key(name) {
            return Err(Error::DuplicateStop(name.to_owned()));
        }
        let id = StopId(self.stops.len() as u32);
        self.stops.push(Stop {
            id,
            name: name.into(),
            coordinates,
        });
        self.stop_lookup.insert(name.into(), id);
        Ok(id)
    }

    pub fn add_distance(&mut self, from: StopId, to: StopId, meters: u32) {
        self.distances.insert((from, to), meters);
    }

    /// Registers a bus. `stops` is the declared sequence (not yet
    /// palindrome-expanded); the catalogue performs the expansion for
    /// non-roundtrip buses.
    pub fn add_bus(
        &mut self,
        name: &str,
        stop_names: &[&str],
        is_roundtrip: bool,
    ) -> Result<BusId, Error> {
        if self.bus_lookup.contains_key(name) {
            return Err(Error::DuplicateBus(name.to_owned()));
        }

        let mut stops = Vec::with_capacity(stop_names.len());
        for &stop_name in stop_names {
            let id = self
                .stop_lookup
                .get(stop_name)
                .copied()
                .ok_or_else(|| Error::UnknownStop {
                    bus: name.to_owned(),
                    stop: stop_name.to_owned(),
                })?;
            stops.push(id);
        }

        if !is_roundtrip && stops.len() > 1 {
            let mut expanded = stops.clone();
            for &id in stops.iter().rev().skip(1) {
                expanded.push(id);
            }
            stops = expanded;
        }

        let id = BusId(self.buses.len() as u32);
        for &stop_id in &stops {
            let entry = self.buses_by_stop.entry(stop_id).or_default();
            if entry.last().map(|b| b.as_ref()) != Some(name) {
                entry.push(name.into());
                entry.sort_unstable();
                entry.dedup();
            }
        }
        self.buses.push(Bus {
            id,
            name: name.into(),
            stops,
            is_roundtrip,
        });
        self.bus_lookup.insert(name.into(), id);
        Ok(id)
    }

    pub fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_lookup.get(name).copied()
    }

    pub fn bus_id(&self, name: &str) -> Option<BusId> {
        self.bus_lookup.get(name).copied()
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.0 as usize]
    }

    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0 as usize]
    }

    pub fn stop_by_name(&self, name: &str) -> Option<&Stop> {
        self.stop_id(name).map(|id| self.stop(id))
    }

    pub fn bus_by_name(&self, name: &str) -> Option<&Bus> {
        self.bus_id(name).map(|id| self.bus(id))
    }

    /// Road distance `from -> to`, falling back to the reverse row, else 0.
    pub fn distance(&self, from: StopId, to: StopId) -> u32 {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .unwrap_or(0)
    }

    pub fn route_length(&self, bus: &Bus) -> u32 {
        bus.stops
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }

    pub fn geo_length(&self, bus: &Bus) -> f64 {
        bus.stops
            .windows(2)
            .map(|w| geo::distance(self.stop(w[0]).coordinates, self.stop(w[1]).coordinates))
            .sum()
    }

    pub fn route_info(&self, bus_name: &str) -> Option<RouteInfo> {
        let bus = self.bus_by_name(bus_name)?;
        let route_length = self.route_length(bus);
        let geo_length = self.geo_length(bus);
        let curvature = if geo_length > 0.0 {
            route_length as f64 / geo_length
        } else {
            0.0
        };
        Some(RouteInfo {
            stop_count: bus.stops.len(),
            unique_stop_count: bus.unique_stop_count(),
            route_length,
            curvature,
        })
    }

    pub fn stop_info(&self, stop_name: &str) -> Option<StopInfo> {
        let id = self.stop_id(stop_name)?;
        let buses = self
            .buses_by_stop
            .get(&id)
            .map(|v| v.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();
        Some(StopInfo { buses })
    }

    /// Buses sorted by name.
    pub fn unique_buses(&self) -> Vec<&Bus> {
        let mut v: Vec<&Bus> = self.buses.iter().collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }

    /// Stops reachable from at least one bus, sorted by name.
    pub fn unique_stops(&self) -> Vec<&Stop> {
        let mut ids: Vec<StopId> = self.buses_by_stop.keys().copied().collect();
        ids.sort_unstable();
        let mut stops: Vec<&Stop> = ids.into_iter().map(|id| self.stop(id)).collect();
        stops.sort_by(|a, b| a.name.cmp(&b.name));
        stops
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: u32,
    pub curvature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopInfo {
    pub buses: Vec<String>,
}
