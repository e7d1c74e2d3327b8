use crate::geo::Coordinates;

/// Stable index into the catalogue's stop arena. Never relocated or reused
/// once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub(crate) u32);

/// Stable index into the catalogue's bus arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub(crate) u32);

/// A named geographic point.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: StopId,
    pub name: Box<str>,
    pub coordinates: Coordinates,
}

/// A named ordered sequence of stops.
///
/// `stops` already holds the expanded (palindrome-doubled) sequence for
/// non-roundtrip buses — the caller of [`crate::catalogue::Catalogue::add_bus`]
/// passes the declared stops, and the catalogue performs the expansion once
/// at insertion time so every downstream consumer (route length, rendering,
/// routing graph) sees the same sequence.
#[derive(Debug, Clone)]
pub struct Bus {
    pub id: BusId,
    pub name: Box<str>,
    pub stops: Vec<StopId>,
    pub is_roundtrip: bool,
}

impl Bus {
    /// Number of unique stops visited, by identity.
    pub fn unique_stop_count(&self) -> usize {
        let mut seen = self.stops.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
