pub mod types;
pub mod capacity;
pub mod rotation;
pub mod history;
pub mod preference;
pub mod fallback;
pub mod occupancy;
pub mod engine;

pub use types::{
    AllocationOutcome, AssignmentRecord, CapacityPlan, Diagnostic, DiagnosticLevel, Participant,
    ParticipantKey, Placement,
};
pub use capacity::{min_occupancy, plan_station_count};
pub use rotation::active_stations;
pub use history::HistoryTracker;
pub use engine::{allocate, DEFAULT_BLOCKS};
