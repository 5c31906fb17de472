use std::collections::HashMap;
use tracing::info;
use super::history::HistoryTracker;
use super::types::{BlockAssignments, BlockPool, Diagnostic, Participant};

/// Drops stations that ended the block below the minimum occupancy and
/// re-seats their participants at the surviving stations
///
/// A station is too small when `0 < headcount < min_occupancy`; empty stations
/// are never flagged. Each displaced participant tries, in turn:
/// 1. their own preferences, among surviving unplayed stations with a seat
/// 2. the first surviving unplayed station with a seat
/// 3. the first surviving station with a seat, played or not
///
/// Whoever finds nothing stays unassigned for the block. Returns one
/// diagnostic per dropped station.
pub fn enforce_min_occupancy(
    participants: &[Participant],
    order: &[usize],
    pool: &mut BlockPool,
    history: &HistoryTracker,
    assignments: &mut BlockAssignments,
    capacity: usize,
    min_occupancy: usize,
    block: u32,
) -> Vec<Diagnostic> {
    // Group by station, keeping processing order within each group
    let mut members: HashMap<String, Vec<usize>> = pool
        .active()
        .iter()
        .map(|s| (s.clone(), Vec::new()))
        .collect();
    for &idx in order {
        if let Some(station) = assignments.get(idx) {
            if let Some(list) = members.get_mut(station) {
                list.push(idx);
            }
        }
    }

    let too_small: Vec<String> = pool
        .active()
        .iter()
        .filter(|s| {
            let count = members.get(*s).map(Vec::len).unwrap_or(0);
            count > 0 && count < min_occupancy
        })
        .cloned()
        .collect();

    if too_small.is_empty() {
        return Vec::new();
    }

    let diagnostics: Vec<Diagnostic> = too_small
        .iter()
        .map(|station| {
            let count = members.get(station).map(Vec::len).unwrap_or(0);
            info!(block, station = %station, count, min_occupancy, "Dropping station with too little demand");
            Diagnostic::info(format!(
                "Block {}: station '{}' dropped, only {} of the required {} participants",
                block, station, count, min_occupancy
            ))
            .in_block(block)
            .for_station(station.as_str())
        })
        .collect();

    let displaced: Vec<usize> = too_small
        .iter()
        .flat_map(|s| members.get(s).cloned().unwrap_or_default())
        .collect();
    for &idx in &displaced {
        assignments.unassign(idx);
    }

    let headcount: HashMap<String, usize> = members
        .iter()
        .filter(|(station, _)| !too_small.contains(station))
        .map(|(station, list)| (station.clone(), list.len()))
        .collect();
    pool.close(&too_small, capacity, &headcount);

    for idx in displaced {
        let participant = &participants[idx];
        let key = participant.key();

        let by_preference = participant
            .preferences
            .iter()
            .find(|s| pool.is_active(s) && !history.has_played(&key, s) && pool.has_room(s))
            .cloned();

        let choice = by_preference
            .or_else(|| {
                pool.active()
                    .iter()
                    .find(|s| pool.has_room(s) && !history.has_played(&key, s))
                    .cloned()
            })
            .or_else(|| pool.active().iter().find(|s| pool.has_room(s)).cloned());

        if let Some(station) = choice {
            if pool.take_seat(&station) {
                assignments.assign(idx, &station);
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn crowd(count: usize, prefs: &[&str]) -> Vec<Participant> {
        (0..count)
            .map(|i| Participant::new(format!("P{i}"), "L", names(prefs)))
            .collect()
    }

    #[test]
    fn test_viable_stations_are_kept() {
        let participants = crowd(6, &[]);
        let order: Vec<usize> = (0..6).collect();
        let mut pool = BlockPool::new(names(&["A", "B"]), 5);
        let mut assignments = BlockAssignments::new();
        for idx in 0..3 {
            pool.take_seat("A");
            assignments.assign(idx, "A");
        }
        for idx in 3..6 {
            pool.take_seat("B");
            assignments.assign(idx, "B");
        }

        let diagnostics = enforce_min_occupancy(&participants, &order, &mut pool, &HistoryTracker::new(), &mut assignments, 5, 3, 1);
        assert!(diagnostics.is_empty());
        assert_eq!(pool.active().len(), 2);
    }

    #[test]
    fn test_small_station_dropped_and_reassigned() {
        let participants = crowd(5, &["B", "A"]);
        let order: Vec<usize> = (0..5).collect();
        let mut pool = BlockPool::new(names(&["A", "B"]), 5);
        let mut assignments = BlockAssignments::new();
        // A gets 4, B gets 1 (below minimum of 3)
        for idx in 0..4 {
            pool.take_seat("A");
            assignments.assign(idx, "A");
        }
        pool.take_seat("B");
        assignments.assign(4, "B");

        let diagnostics = enforce_min_occupancy(&participants, &order, &mut pool, &HistoryTracker::new(), &mut assignments, 5, 3, 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].station.as_deref(), Some("B"));
        assert_eq!(diagnostics[0].block, Some(2));
        assert_eq!(pool.active(), &names(&["A"]));
        assert_eq!(assignments.get(4), Some("A"));
        assert_eq!(pool.remaining("A"), 0);
    }

    #[test]
    fn test_displaced_participant_repeats_as_last_resort() {
        let participants = crowd(4, &[]);
        let mut history = HistoryTracker::new();
        let mut earlier = BlockAssignments::new();
        earlier.assign(3, "A");
        history.record_block(&participants, 1, &earlier);

        let order: Vec<usize> = (0..4).collect();
        let mut pool = BlockPool::new(names(&["A", "B"]), 4);
        let mut assignments = BlockAssignments::new();
        for idx in 0..3 {
            pool.take_seat("A");
            assignments.assign(idx, "A");
        }
        pool.take_seat("B");
        assignments.assign(3, "B");

        enforce_min_occupancy(&participants, &order, &mut pool, &history, &mut assignments, 4, 2, 2);
        assert_eq!(assignments.get(3), Some("A"));
    }

    #[test]
    fn test_displaced_participant_without_room_stays_unassigned() {
        let participants = crowd(4, &[]);
        let order: Vec<usize> = (0..4).collect();
        let mut pool = BlockPool::new(names(&["A", "B"]), 3);
        let mut assignments = BlockAssignments::new();
        for idx in 0..3 {
            pool.take_seat("A");
            assignments.assign(idx, "A");
        }
        pool.take_seat("B");
        assignments.assign(3, "B");

        let diagnostics = enforce_min_occupancy(&participants, &order, &mut pool, &HistoryTracker::new(), &mut assignments, 3, 2, 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(!assignments.is_assigned(3));
    }

    #[test]
    fn test_empty_station_can_end_short_after_taking_displaced() {
        let participants = crowd(7, &["C"]);
        let order: Vec<usize> = (0..7).collect();
        let mut pool = BlockPool::new(names(&["A", "B", "C"]), 6);
        let mut assignments = BlockAssignments::new();
        // A is full, B holds one, C is empty
        for idx in 0..6 {
            pool.take_seat("A");
            assignments.assign(idx, "A");
        }
        pool.take_seat("B");
        assignments.assign(6, "B");

        let diagnostics = enforce_min_occupancy(&participants, &order, &mut pool, &HistoryTracker::new(), &mut assignments, 6, 3, 1);
        // Only B is reported; C ends with one participant and stays open
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].station.as_deref(), Some("B"));
        assert_eq!(assignments.get(6), Some("C"));
        assert_eq!(pool.active(), &names(&["A", "C"]));
    }
}
