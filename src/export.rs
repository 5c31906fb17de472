use std::io::Write;
use std::path::Path;
use csv::WriterBuilder;
use crate::allocation::AssignmentRecord;
use crate::error::Result;

const HEADER: [&str; 5] = ["first_name", "last_name", "block", "station", "repeated"];

/// Writes assignment records as CSV; unassigned rows get an empty station cell
pub fn write_records_csv<W: Write>(records: &[AssignmentRecord], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for record in records {
        let block = record.block.to_string();
        let station = record.placement.station().unwrap_or("");
        let repeated = if record.repeated { "true" } else { "false" };
        wtr.write_record([
            record.participant.first_name.as_str(),
            record.participant.last_name.as_str(),
            block.as_str(),
            station,
            repeated,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports records to a CSV file, replacing any existing file
pub fn export_records_to_csv(records: &[AssignmentRecord], csv_path: &Path) -> Result<()> {
    let file = std::fs::File::create(csv_path)?;
    write_records_csv(records, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{ParticipantKey, Placement};

    #[test]
    fn test_csv_layout() {
        let key = ParticipantKey { first_name: "Ada".into(), last_name: "Weber".into() };
        let records = vec![
            AssignmentRecord { participant: key.clone(), block: 1, placement: Placement::Station("Chess".into()), repeated: false },
            AssignmentRecord { participant: key, block: 2, placement: Placement::Unassigned, repeated: false },
        ];

        let mut buffer = Vec::new();
        write_records_csv(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "first_name,last_name,block,station,repeated\nAda,Weber,1,Chess,false\nAda,Weber,2,,false\n"
        );
    }
}
