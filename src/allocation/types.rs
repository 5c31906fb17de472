use std::collections::HashMap;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Identifies a participant within a run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantKey {
    pub first_name: String,
    pub last_name: String,
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A participant with ranked station preferences (index 0 = most preferred)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub first_name: String,
    pub last_name: String,
    pub preferences: Vec<String>,
}

impl Participant {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, preferences: Vec<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            preferences,
        }
    }

    pub fn key(&self) -> ParticipantKey {
        ParticipantKey {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Where a participant ended up in one block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Station(String),
    Unassigned,
}

impl Placement {
    pub fn station(&self) -> Option<&str> {
        match self {
            Placement::Station(name) => Some(name),
            Placement::Unassigned => None,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        matches!(self, Placement::Unassigned)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Station(name) => f.write_str(name),
            Placement::Unassigned => f.write_str("—"),
        }
    }
}

/// One participant's placement in one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub participant: ParticipantKey,
    pub block: u32,
    pub placement: Placement,
    pub repeated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warn,
}

/// Non-fatal advisory produced during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub block: Option<u32>,
    pub station: Option<String>,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: DiagnosticLevel::Info, message: message.into(), block: None, station: None }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self { level: DiagnosticLevel::Warn, message: message.into(), block: None, station: None }
    }

    pub fn in_block(mut self, block: u32) -> Self {
        self.block = Some(block);
        self
    }

    pub fn for_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }
}

/// Per-run station count decision made by the capacity planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPlan {
    /// Stations active simultaneously in every block
    pub active_per_block: usize,
    /// Smallest non-zero headcount a station needs to stay open
    pub min_occupancy: usize,
    pub min_stations: usize,
    pub max_stations: usize,
    /// True when min_stations > max_stations and the count had to be forced
    pub conflict: bool,
}

/// Result of a complete run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub plan: CapacityPlan,
    pub records: Vec<AssignmentRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Active stations for one block together with their remaining seats
#[derive(Debug, Clone)]
pub struct BlockPool {
    active: Vec<String>,
    remaining: HashMap<String, usize>,
}

impl BlockPool {
    /// Opens every station in `active` with `capacity` free seats
    pub fn new(active: Vec<String>, capacity: usize) -> Self {
        let remaining = active.iter().map(|s| (s.clone(), capacity)).collect();
        Self { active, remaining }
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn is_active(&self, station: &str) -> bool {
        self.remaining.contains_key(station)
    }

    pub fn has_room(&self, station: &str) -> bool {
        self.remaining.get(station).copied().unwrap_or(0) > 0
    }

    pub fn remaining(&self, station: &str) -> usize {
        self.remaining.get(station).copied().unwrap_or(0)
    }

    /// Takes one seat; returns false if the station is closed or full
    pub fn take_seat(&mut self, station: &str) -> bool {
        match self.remaining.get_mut(station) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }

    /// Closes the given stations and recomputes the seats left on the survivors
    /// from their current headcount
    pub fn close(&mut self, dropped: &[String], capacity: usize, headcount: &HashMap<String, usize>) {
        self.active.retain(|s| !dropped.contains(s));
        self.remaining = self
            .active
            .iter()
            .map(|s| {
                let taken = headcount.get(s).copied().unwrap_or(0);
                (s.clone(), capacity.saturating_sub(taken))
            })
            .collect();
    }
}

/// Working assignment state for one block, indexed by participant position
#[derive(Debug, Clone, Default)]
pub struct BlockAssignments {
    slots: HashMap<usize, String>,
}

impl BlockAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, participant: usize) -> Option<&str> {
        self.slots.get(&participant).map(String::as_str)
    }

    pub fn is_assigned(&self, participant: usize) -> bool {
        self.slots.contains_key(&participant)
    }

    pub fn assign(&mut self, participant: usize, station: &str) {
        self.slots.insert(participant, station.to_string());
    }

    pub fn unassign(&mut self, participant: usize) -> Option<String> {
        self.slots.remove(&participant)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
