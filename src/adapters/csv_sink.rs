use crate::adapters::csv_source::DELIMITER;
use crate::domain::model::{OutputRecord, OUTPUT_HEADERS};
use crate::utils::error::{EtlError, Result};
use csv::WriterBuilder;

/// Serializes the consolidated price list. The header row is always written,
/// so an empty run still yields a valid file.
pub fn write_rows(records: &[OutputRecord]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(OUTPUT_HEADERS)?;
    for record in records {
        wtr.serialize(record)?;
    }

    wtr.into_inner()
        .map_err(|e| EtlError::IoError(std::io::Error::other(e.to_string())))
}
