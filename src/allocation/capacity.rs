use tracing::debug;
use super::types::{CapacityPlan, Diagnostic};

/// Minimum headcount for a station to stay open: half the capacity, rounded up
pub fn min_occupancy(capacity: usize) -> usize {
    capacity.div_ceil(2)
}

/// Decides how many stations run at the same time in each block
///
/// # Arguments
/// * `participants` - Number of participants (K), must be > 0
/// * `capacity` - Seats per station (C), must be > 0
/// * `pool_size` - Size of the candidate pool after truncation (P), must be > 0
///
/// Enough stations are opened to seat everyone (`ceil(K / C)`), but no more
/// than can each reach the minimum occupancy (`floor(K / MinOccupancy)`).
/// When the two bounds cross, the lower bound wins (capped by the pool size)
/// and a warning is returned.
pub fn plan_station_count(
    participants: usize,
    capacity: usize,
    pool_size: usize,
) -> (CapacityPlan, Option<Diagnostic>) {
    let min_occupancy = min_occupancy(capacity);
    let min_stations = participants.div_ceil(capacity);
    let max_stations = pool_size.min(participants / min_occupancy);

    let (active_per_block, diagnostic) = if min_stations <= max_stations {
        (min_stations.clamp(1, max_stations), None)
    } else {
        let forced = pool_size.min(min_stations);
        let diagnostic = Diagnostic::warn(format!(
            "Minimum occupancy of {} per station cannot be met everywhere ({} participants, {} stations needed, at most {} viable); stations may be merged or dropped",
            min_occupancy, participants, min_stations, max_stations
        ));
        (forced, Some(diagnostic))
    };

    debug!(
        participants,
        capacity,
        pool_size,
        min_stations,
        max_stations,
        active_per_block,
        "Planned station count"
    );

    let plan = CapacityPlan {
        active_per_block,
        min_occupancy,
        min_stations,
        max_stations,
        conflict: diagnostic.is_some(),
    };
    (plan, diagnostic)
}
