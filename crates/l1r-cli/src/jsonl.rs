//! JSON-lines event source: one serialized [`Event`] per line.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use l1r_core::{Error, Event, Result};
use l1r_rates::EventSource;

/// Streams events from a JSON-lines file without buffering the run.
pub struct JsonlSource {
    lines: Lines<BufReader<File>>,
    line_no: u64,
}

impl JsonlSource {
    /// Open a JSON-lines event file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self { lines: BufReader::new(file).lines(), line_no: 0 })
    }
}

impl EventSource for JsonlSource {
    fn next_event(&mut self) -> Result<Option<Event>> {
        loop {
            let Some(line) = self.lines.next() else { return Ok(None) };
            let line = line?;
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line)
                .map(Some)
                .map_err(|e| Error::EventSource(format!("line {}: {e}", self.line_no)));
        }
    }
}
