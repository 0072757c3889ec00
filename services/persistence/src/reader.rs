//! Reading history files back

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

use types::errors::ServiceError;

/// One history line: its timestamp and the record fields after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub timestamp: String,
    pub fields: Vec<String>,
}

/// Read every line of a history file.
///
/// A line without a timestamp, or a file that cannot be read, is an error.
pub fn read_history(path: &Path) -> Result<Vec<HistoryLine>, ServiceError> {
    let file = File::open(path).map_err(|e| ServiceError::io(path.display(), &e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut lines = Vec::new();
    let mut record = StringRecord::new();
    let mut line = 0u64;
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => line += 1,
            Ok(false) => break,
            Err(err) => return Err(ServiceError::parse(line + 1, err.to_string())),
        }

        let mut fields = record.iter().map(str::to_string);
        let timestamp = match fields.next() {
            Some(ts) if !ts.is_empty() => ts,
            _ => return Err(ServiceError::parse(line, "missing timestamp")),
        };
        lines.push(HistoryLine {
            timestamp,
            fields: fields.collect(),
        });
    }
    Ok(lines)
}
