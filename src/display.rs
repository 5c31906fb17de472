use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use serde::Deserialize;
use crate::allocation::{AllocationOutcome, AssignmentRecord, DiagnosticLevel};

/// Formats a participant's full name
pub fn format_participant_name(first_name: &str, last_name: &str) -> String {
    if last_name.is_empty() {
        first_name.to_string()
    } else {
        format!("{} {}", first_name, last_name)
    }
}

fn format_record_line(record: &AssignmentRecord) -> String {
    let name = format_participant_name(&record.participant.first_name, &record.participant.last_name);
    let marker = if record.repeated { " (repeat)" } else { "" };
    format!("{} | block {} | {}{}", name, record.block, record.placement, marker)
}

/// Column filters; an empty filter matches everything
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub block: String,
    #[serde(default)]
    pub station: String,
}

impl RecordFilter {
    /// Case-insensitive substring match on every column
    pub fn matches(&self, record: &AssignmentRecord) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            let needle = needle.trim().to_lowercase();
            needle.is_empty() || haystack.to_lowercase().contains(&needle)
        }

        contains(&record.participant.first_name, &self.first_name)
            && contains(&record.participant.last_name, &self.last_name)
            && contains(&record.block.to_string(), &self.block)
            && contains(&record.placement.to_string(), &self.station)
    }
}

pub fn filter_records<'a>(records: &'a [AssignmentRecord], filter: &RecordFilter) -> Vec<&'a AssignmentRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    FirstName,
    LastName,
    Block,
    Station,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// First name, last name, then block
    #[default]
    Default,
    By(SortColumn, SortDirection),
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sorts records for presentation (stable)
pub fn sort_records(records: &mut [&AssignmentRecord], order: SortOrder) {
    match order {
        SortOrder::Default => records.sort_by(|a, b| {
            compare_text(&a.participant.first_name, &b.participant.first_name)
                .then_with(|| compare_text(&a.participant.last_name, &b.participant.last_name))
                .then_with(|| a.block.cmp(&b.block))
        }),
        SortOrder::By(column, direction) => records.sort_by(|a, b| {
            let ordering = match column {
                SortColumn::FirstName => compare_text(&a.participant.first_name, &b.participant.first_name),
                SortColumn::LastName => compare_text(&a.participant.last_name, &b.participant.last_name),
                SortColumn::Block => a.block.cmp(&b.block),
                SortColumn::Station => compare_text(&a.placement.to_string(), &b.placement.to_string()),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }),
    }
}

/// Writes all records to a text file, one line per participant and block
pub fn write_assignments_to_file(
    outcome: &AllocationOutcome,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** Station rotation ({} stations per block) **", outcome.plan.active_per_block)?;

    let mut rows: Vec<&AssignmentRecord> = outcome.records.iter().collect();
    sort_records(&mut rows, SortOrder::Default);
    for record in rows {
        writeln!(file, "{}", format_record_line(record))?;
    }

    Ok(())
}

/// Prints the plan, diagnostics and all assignments in default order
pub fn print_assignments(outcome: &AllocationOutcome) {
    let plan = &outcome.plan;
    println!("\n=== Station Rotation ===");
    println!(
        "Stations per block: {} (needed {}, viable {}), minimum occupancy: {}",
        plan.active_per_block, plan.min_stations, plan.max_stations, plan.min_occupancy
    );

    if !outcome.diagnostics.is_empty() {
        println!("\nNotes:");
        for diagnostic in &outcome.diagnostics {
            let tag = match diagnostic.level {
                DiagnosticLevel::Info => "info",
                DiagnosticLevel::Warn => "⚠️  warn",
            };
            println!("  [{}] {}", tag, diagnostic.message);
        }
    }

    let unassigned = outcome.records.iter().filter(|r| r.placement.is_unassigned()).count();
    let repeated = outcome.records.iter().filter(|r| r.repeated).count();
    println!(
        "\nAssignments: {} ({} unassigned, {} repeats)",
        outcome.records.len(),
        unassigned,
        repeated
    );

    let mut rows: Vec<&AssignmentRecord> = outcome.records.iter().collect();
    sort_records(&mut rows, SortOrder::Default);
    for record in rows {
        println!("  {}", format_record_line(record));
    }
}
