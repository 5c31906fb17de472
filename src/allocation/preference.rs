use super::history::HistoryTracker;
use super::types::{BlockAssignments, BlockPool, Participant};

/// Places participants at their most preferred open station
///
/// Walks `order` once. Each unassigned participant picks the first station in
/// their preference list that is open this block and not yet played. If that
/// station is already full the participant is left for the fallback pass; later
/// preferences are not tried.
///
/// Returns the number of participants placed.
pub fn allocate_by_preference(
    participants: &[Participant],
    order: &[usize],
    pool: &mut BlockPool,
    history: &HistoryTracker,
    assignments: &mut BlockAssignments,
) -> usize {
    let mut placed = 0;

    for &idx in order {
        if assignments.is_assigned(idx) {
            continue;
        }
        let participant = &participants[idx];
        let key = participant.key();

        let choice = participant
            .preferences
            .iter()
            .find(|station| pool.is_active(station) && !history.has_played(&key, station));

        if let Some(station) = choice {
            if pool.take_seat(station) {
                assignments.assign(idx, station);
                placed += 1;
            }
        }
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::fallback::allocate_fallback;

    fn prefs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_open_preference_wins() {
        let participants = vec![Participant::new("Ada", "L", prefs(&["X", "B", "A"]))];
        let mut pool = BlockPool::new(prefs(&["A", "B"]), 2);
        let mut assignments = BlockAssignments::new();

        let placed = allocate_by_preference(&participants, &[0], &mut pool, &HistoryTracker::new(), &mut assignments);
        assert_eq!(placed, 1);
        assert_eq!(assignments.get(0), Some("B"));
        assert_eq!(pool.remaining("B"), 1);
    }

    #[test]
    fn test_full_first_choice_is_left_for_fallback() {
        let participants = vec![
            Participant::new("Ada", "L", prefs(&["A", "C"])),
            Participant::new("Ben", "L", prefs(&["A", "C"])),
        ];
        let mut pool = BlockPool::new(prefs(&["A", "B", "C"]), 1);
        let mut assignments = BlockAssignments::new();
        let history = HistoryTracker::new();

        let placed = allocate_by_preference(&participants, &[0, 1], &mut pool, &history, &mut assignments);
        // Ben's first choice is full, C is not tried
        assert_eq!(placed, 1);
        assert_eq!(assignments.get(0), Some("A"));
        assert!(!assignments.is_assigned(1));
        assert_eq!(pool.remaining("C"), 1);

        // Fallback takes the first open station with a seat, in block order
        allocate_fallback(&participants, &[0, 1], &mut pool, &history, &mut assignments, 3);
        assert_eq!(assignments.get(1), Some("B"));
    }

    #[test]
    fn test_processing_order_decides_first_choice() {
        let participants = vec![
            Participant::new("Ada", "L", prefs(&["A", "B"])),
            Participant::new("Ben", "L", prefs(&["A", "B"])),
        ];
        let mut pool = BlockPool::new(prefs(&["A", "B"]), 1);
        let mut assignments = BlockAssignments::new();

        allocate_by_preference(&participants, &[1, 0], &mut pool, &HistoryTracker::new(), &mut assignments);
        assert_eq!(assignments.get(1), Some("A"));
        assert!(!assignments.is_assigned(0));
    }

    #[test]
    fn test_played_station_is_skipped() {
        let participants = vec![Participant::new("Ada", "L", prefs(&["A", "B"]))];
        let mut history = HistoryTracker::new();
        let mut first = BlockAssignments::new();
        first.assign(0, "A");
        history.record_block(&participants, 1, &first);

        let mut pool = BlockPool::new(prefs(&["A", "B"]), 3);
        let mut assignments = BlockAssignments::new();
        allocate_by_preference(&participants, &[0], &mut pool, &history, &mut assignments);
        assert_eq!(assignments.get(0), Some("B"));
    }

    #[test]
    fn test_no_matching_preference_stays_unassigned() {
        let participants = vec![Participant::new("Ada", "L", prefs(&["Z"]))];
        let mut pool = BlockPool::new(prefs(&["A"]), 3);
        let mut assignments = BlockAssignments::new();
        let placed = allocate_by_preference(&participants, &[0], &mut pool, &HistoryTracker::new(), &mut assignments);
        assert_eq!(placed, 0);
        assert!(assignments.is_empty());
    }
}
