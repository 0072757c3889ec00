//! Journal connector: timestamped CSV lines appended to a history file
//!
//! # Line format
//! ```text
//! 2022-12-01 09:30:00.000,<record fields...>
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use soa::{format_timestamp, Clock, Connector, CsvFileSink};
use types::errors::ServiceError;
use types::record::CsvRecord;

/// The persisted streams and the files they land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Position,
    Risk,
    Execution,
    Streaming,
    Inquiry,
}

impl HistoryKind {
    pub const ALL: [HistoryKind; 5] = [
        HistoryKind::Position,
        HistoryKind::Risk,
        HistoryKind::Execution,
        HistoryKind::Streaming,
        HistoryKind::Inquiry,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            HistoryKind::Position => "positions.txt",
            HistoryKind::Risk => "risk.txt",
            HistoryKind::Execution => "executions.txt",
            HistoryKind::Streaming => "streaming.txt",
            HistoryKind::Inquiry => "allinquiries.txt",
        }
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HistoryKind::Position => "position",
            HistoryKind::Risk => "risk",
            HistoryKind::Execution => "execution",
            HistoryKind::Streaming => "streaming",
            HistoryKind::Inquiry => "inquiry",
        };
        f.write_str(s)
    }
}

/// Publish-only connector appending one line per persisted value.
pub struct JournalConnector<V> {
    sink: CsvFileSink,
    clock: Arc<dyn Clock>,
    lines_written: u64,
    _record: PhantomData<fn(&V)>,
}

impl<V> JournalConnector<V> {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink: CsvFileSink::new(path),
            clock,
            lines_written: 0,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        self.sink.path()
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

impl<V: CsvRecord> Connector<V> for JournalConnector<V> {
    fn name(&self) -> &'static str {
        "JournalConnector"
    }

    fn publish(&mut self, data: &V) -> Result<(), ServiceError> {
        let fields = data.fields();
        let mut line = Vec::with_capacity(fields.len() + 1);
        line.push(format_timestamp(self.clock.now_millis()));
        line.extend(fields);

        self.sink.append(&line)?;
        self.lines_written += 1;
        debug!(
            path = %self.sink.path().display(),
            lines = self.lines_written,
            "Journal line appended"
        );
        Ok(())
    }
}
