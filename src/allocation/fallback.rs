use super::history::HistoryTracker;
use super::types::{BlockAssignments, BlockPool, Participant};

/// Fewer stations than this make repeats unavoidable over a four-block run
pub const STRICT_NO_REPEAT_POOL_SIZE: usize = 4;

/// Whether a participant may be sent back to a station they already played
///
/// Repeats are only allowed when the whole candidate pool or this block's
/// open set is smaller than [`STRICT_NO_REPEAT_POOL_SIZE`].
pub fn repeats_allowed(pool_size: usize, active_count: usize) -> bool {
    pool_size < STRICT_NO_REPEAT_POOL_SIZE || active_count < STRICT_NO_REPEAT_POOL_SIZE
}

/// Seats everyone the preference pass left over, ignoring preferences
///
/// Open stations are tried in block order. A fresh station is taken if one has
/// a seat; otherwise the first station with a seat is taken as a repeat, but
/// only when `repeats_allowed`. Anyone still without a seat stays unassigned.
///
/// Returns the number of participants placed.
pub fn allocate_fallback(
    participants: &[Participant],
    order: &[usize],
    pool: &mut BlockPool,
    history: &HistoryTracker,
    assignments: &mut BlockAssignments,
    pool_size: usize,
) -> usize {
    let allow_repeat = repeats_allowed(pool_size, pool.active().len());
    let mut placed = 0;

    for &idx in order {
        if assignments.is_assigned(idx) {
            continue;
        }
        let key = participants[idx].key();

        let fresh = pool
            .active()
            .iter()
            .find(|station| !history.has_played(&key, station) && pool.has_room(station))
            .cloned();

        let choice = match fresh {
            Some(station) => Some(station),
            None if allow_repeat => pool.active().iter().find(|station| pool.has_room(station)).cloned(),
            None => None,
        };

        if let Some(station) = choice {
            if pool.take_seat(&station) {
                assignments.assign(idx, &station);
                placed += 1;
            }
        }
    }

    placed
}
