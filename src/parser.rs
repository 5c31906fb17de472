use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::allocation::{Participant, ParticipantKey};
use crate::error::Result;

/// Column F: preferences separated by ';', most preferred first
const PREFERENCES_COL: usize = 5;
/// Column G
const FIRST_NAME_COL: usize = 6;
/// Column H
const LAST_NAME_COL: usize = 7;

/// Splits a raw preference cell into trimmed, non-empty station names
fn parse_preferences(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads participants from the exported preference form (CSV)
pub fn load_participants<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Participant>> {
    let file = std::fs::File::open(csv_path.as_ref())?;
    info!("Reading participants from {}", csv_path.as_ref().display());
    read_participants(file)
}

/// Reads participants from any CSV source
///
/// The first row is a header and is skipped. Rows without a first or last
/// name are ignored. If the same name appears twice, the later row's
/// preferences replace the earlier ones (resubmission) and the participant
/// keeps its original position.
pub fn read_participants<R: Read>(source: R) -> Result<Vec<Participant>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let mut participants: Vec<Participant> = Vec::new();
    // Track position by key for handling resubmissions
    let mut positions: HashMap<ParticipantKey, usize> = HashMap::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result?;

        let first_name = record.get(FIRST_NAME_COL).unwrap_or("").trim().to_string();
        let last_name = record.get(LAST_NAME_COL).unwrap_or("").trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            skipped += 1;
            continue;
        }

        let preferences = parse_preferences(record.get(PREFERENCES_COL).unwrap_or(""));
        let participant = Participant::new(first_name, last_name, preferences);

        match positions.get(&participant.key()) {
            Some(&pos) => {
                debug!("Replacing earlier entry for {}", participant.key());
                participants[pos] = participant;
            }
            None => {
                positions.insert(participant.key(), participants.len());
                participants.push(participant);
            }
        }
    }

    info!("Loaded {} participants ({} rows skipped)", participants.len(), skipped);
    Ok(participants)
}
