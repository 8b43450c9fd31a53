//! Single-slot cache for data file records.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::common::{RecordId, Result};
use crate::storage::read_nth_line;

/// Keeps the most recently read data file line in memory.
///
/// Records are read-only: the index never writes the data file, so the
/// slot is never dirty and a miss simply replaces it.
pub struct RecordCache {
    path: PathBuf,
    slot: Option<(RecordId, String)>,
}

impl RecordCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            slot: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Id of the resident record, if any.
    pub fn resident(&self) -> Option<RecordId> {
        self.slot.as_ref().map(|(id, _)| *id)
    }

    /// Return data file line `record` (1-based, header included).
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, or with
    /// `ErrorKind::UnexpectedEof` if the line does not exist.
    pub fn access(&mut self, record: RecordId) -> Result<&str> {
        if self.resident() != Some(record) {
            self.slot = None;
            let line = Self::load(&self.path, record)?;
            trace!(record, "loaded data record");
            self.slot = Some((record, line));
        }

        match &self.slot {
            Some((_, line)) => Ok(line.as_str()),
            None => Err(missing_record(record).into()),
        }
    }

    fn load(path: &Path, record: RecordId) -> Result<String> {
        let file = File::open(path)?;
        let line_number = usize::try_from(record).map_err(|_| missing_record(record))?;
        read_nth_line(BufReader::new(file), line_number)?.ok_or_else(|| missing_record(record).into())
    }
}

fn missing_record(record: RecordId) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("data file has no line {}", record),
    )
}
