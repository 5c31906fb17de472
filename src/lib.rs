//! Rotates a roster of participants through activity stations over a fixed
//! number of blocks, honoring ranked preferences, per-station capacity, a
//! minimum headcount per open station and avoiding repeats where possible.

pub mod allocation;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod parser;
pub mod popularity;
pub mod web;

pub use allocation::{allocate, AllocationOutcome, AssignmentRecord, Diagnostic, Participant, Placement};
pub use error::{AllocationError, Error, Result};
