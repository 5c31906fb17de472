use std::collections::HashSet;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};
use crate::error::AllocationError;
use super::capacity::plan_station_count;
use super::fallback::{allocate_fallback, STRICT_NO_REPEAT_POOL_SIZE};
use super::history::HistoryTracker;
use super::occupancy::enforce_min_occupancy;
use super::preference::allocate_by_preference;
use super::rotation::active_stations;
use super::types::{AllocationOutcome, AssignmentRecord, BlockAssignments, BlockPool, Diagnostic, Participant};

/// Number of blocks the surrounding application runs
pub const DEFAULT_BLOCKS: u32 = 4;

/// Assigns every participant to one station per block
///
/// # Arguments
/// * `participants` - Roster with ranked preferences; keys must be unique
/// * `station_pool` - Candidate stations, most popular first (duplicates are ignored)
/// * `capacity` - Seats per station per block
/// * `blocks` - Number of sequential blocks
/// * `rng` - Source for the per-block processing order
///
/// Each block runs rotation, preference pass, fallback pass and occupancy
/// enforcement, then commits its placements to the run's history. Records are
/// returned in participant order, then block order.
pub fn allocate<R: Rng + ?Sized>(
    participants: &[Participant],
    station_pool: &[String],
    capacity: usize,
    blocks: u32,
    rng: &mut R,
) -> Result<AllocationOutcome, AllocationError> {
    if blocks < 1 {
        return Err(AllocationError::InvalidBlockCount(blocks));
    }
    if capacity < 1 {
        return Err(AllocationError::InvalidCapacity(capacity));
    }
    if participants.is_empty() {
        return Err(AllocationError::NoParticipants);
    }

    let mut seen = HashSet::new();
    let pool: Vec<String> = station_pool
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect();
    if pool.is_empty() {
        return Err(AllocationError::NoStations);
    }

    let mut diagnostics = Vec::new();

    if pool.len() < STRICT_NO_REPEAT_POOL_SIZE {
        diagnostics.push(Diagnostic::warn(format!(
            "Only {} distinct station(s) available, fewer than {}; repeated stations may be unavoidable",
            pool.len(),
            STRICT_NO_REPEAT_POOL_SIZE
        )));
    }

    let (plan, conflict) = plan_station_count(participants.len(), capacity, pool.len());
    diagnostics.extend(conflict);

    for diagnostic in &diagnostics {
        warn!("{}", diagnostic.message);
    }

    info!(
        participants = participants.len(),
        stations = pool.len(),
        capacity,
        blocks,
        active_per_block = plan.active_per_block,
        min_occupancy = plan.min_occupancy,
        "Starting allocation run"
    );

    let mut history = HistoryTracker::new();
    let mut per_participant: Vec<Vec<AssignmentRecord>> =
        vec![Vec::with_capacity(blocks as usize); participants.len()];

    for block in 1..=blocks {
        let active = active_stations(&pool, block, plan.active_per_block);
        let mut block_pool = BlockPool::new(active, capacity);
        let mut assignments = BlockAssignments::new();

        let mut order: Vec<usize> = (0..participants.len()).collect();
        order.shuffle(rng);

        let by_preference = allocate_by_preference(participants, &order, &mut block_pool, &history, &mut assignments);
        let by_fallback = allocate_fallback(participants, &order, &mut block_pool, &history, &mut assignments, pool.len());
        let dropped = enforce_min_occupancy(
            participants,
            &order,
            &mut block_pool,
            &history,
            &mut assignments,
            capacity,
            plan.min_occupancy,
            block,
        );

        debug!(
            block,
            active = ?block_pool.active(),
            by_preference,
            by_fallback,
            dropped = dropped.len(),
            unassigned = participants.len() - assignments.len(),
            "Block allocated"
        );
        diagnostics.extend(dropped);

        let records = history.record_block(participants, block, &assignments);
        for (idx, record) in records.into_iter().enumerate() {
            per_participant[idx].push(record);
        }
    }

    let records: Vec<AssignmentRecord> = per_participant.into_iter().flatten().collect();
    let unassigned = records.iter().filter(|r| r.placement.is_unassigned()).count();
    let repeated = records.iter().filter(|r| r.repeated).count();
    info!(records = records.len(), unassigned, repeated, "Allocation run finished");

    Ok(AllocationOutcome {
        plan,
        records,
        diagnostics,
    })
}
