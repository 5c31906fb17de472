use std::collections::{HashMap, HashSet};
use crate::allocation::Participant;
use crate::error::AllocationError;

/// Points a preference earns for its station, by rank
fn rank_weight(rank: usize) -> u32 {
    match rank {
        0 => 5,
        1 => 3,
        2 => 2,
        _ => 1,
    }
}

/// Ranks every station named in any preference list by weighted popularity
/// Returns station names, highest score first; ties keep the order in which
/// the stations were first mentioned
pub fn rank_stations(participants: &[Participant]) -> Vec<String> {
    let mut scores: HashMap<&str, u32> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for participant in participants {
        for (rank, station) in participant.preferences.iter().enumerate() {
            let score = scores.entry(station.as_str()).or_insert_with(|| {
                first_seen.push(station.as_str());
                0
            });
            *score += rank_weight(rank);
        }
    }

    let mut ranked: Vec<(&str, u32)> = first_seen
        .into_iter()
        .map(|station| (station, scores.get(station).copied().unwrap_or(0)))
        .collect();
    // Stable sort, so equal scores stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked.into_iter().map(|(station, _)| station.to_string()).collect()
}

/// Builds the candidate pool: distinct names from `ranked`, cut to `station_count`
pub fn candidate_pool(ranked: &[String], station_count: usize) -> Result<Vec<String>, AllocationError> {
    if station_count < 1 {
        return Err(AllocationError::InvalidStationCount(station_count));
    }

    let mut seen = HashSet::new();
    let pool: Vec<String> = ranked
        .iter()
        .filter(|s| seen.insert(s.as_str()))
        .take(station_count)
        .cloned()
        .collect();

    if pool.is_empty() {
        return Err(AllocationError::NoStations);
    }
    Ok(pool)
}
