use std::collections::{HashMap, HashSet};
use super::types::{AssignmentRecord, BlockAssignments, Participant, ParticipantKey, Placement};

/// Stations each participant has been placed at in the completed blocks of a run
///
/// Only `record_block` mutates the tracker, and only once per block, so every
/// pass inside a block sees the history as it stood when the block started.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    played: HashMap<ParticipantKey, HashSet<String>>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_played(&self, key: &ParticipantKey, station: &str) -> bool {
        self.played
            .get(key)
            .map(|stations| stations.contains(station))
            .unwrap_or(false)
    }

    pub fn stations_for(&self, key: &ParticipantKey) -> Option<&HashSet<String>> {
        self.played.get(key)
    }

    /// Closes a block: emits one record per participant (in input order) and
    /// adds every real placement to the participant's history
    pub fn record_block(
        &mut self,
        participants: &[Participant],
        block: u32,
        assignments: &BlockAssignments,
    ) -> Vec<AssignmentRecord> {
        let mut records = Vec::with_capacity(participants.len());

        for (idx, participant) in participants.iter().enumerate() {
            let key = participant.key();
            let record = match assignments.get(idx) {
                Some(station) => {
                    let stations = self.played.entry(key.clone()).or_default();
                    // insert() returns false when the station was already there
                    let repeated = !stations.insert(station.to_string());
                    AssignmentRecord {
                        participant: key,
                        block,
                        placement: Placement::Station(station.to_string()),
                        repeated,
                    }
                }
                None => AssignmentRecord {
                    participant: key,
                    block,
                    placement: Placement::Unassigned,
                    repeated: false,
                },
            };
            records.push(record);
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(first: &str) -> Participant {
        Participant::new(first, "Test", vec![])
    }

    #[test]
    fn test_repeat_flag_follows_history() {
        let participants = vec![participant("Ada"), participant("Ben")];
        let mut history = HistoryTracker::new();

        let mut block1 = BlockAssignments::new();
        block1.assign(0, "Chess");
        block1.assign(1, "Chess");
        let records = history.record_block(&participants, 1, &block1);
        assert!(records.iter().all(|r| !r.repeated));

        let mut block2 = BlockAssignments::new();
        block2.assign(0, "Chess");
        block2.assign(1, "Puzzle");
        let records = history.record_block(&participants, 2, &block2);
        assert!(records[0].repeated);
        assert!(!records[1].repeated);
        assert!(history.has_played(&participants[1].key(), "Chess"));
        assert!(history.has_played(&participants[1].key(), "Puzzle"));
    }

    #[test]
    fn test_unassigned_leaves_history_untouched() {
        let participants = vec![participant("Ada")];
        let mut history = HistoryTracker::new();

        let records = history.record_block(&participants, 1, &BlockAssignments::new());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].placement, Placement::Unassigned);
        assert!(!records[0].repeated);
        assert!(history.stations_for(&participants[0].key()).is_none());
        assert!(!history.has_played(&participants[0].key(), "Chess"));
    }
}
