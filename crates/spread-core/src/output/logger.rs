//! Snapshot Logger
//!
//! Append-only JSONL step logging.

use spread_events::StepSnapshot;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one snapshot per line to a JSONL file
pub struct SnapshotLogger {
    writer: Option<BufWriter<File>>,
    snapshot_count: u64,
}

impl SnapshotLogger {
    /// Create a logger writing to the specified path, creating parent
    /// directories as needed
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            snapshot_count: 0,
        })
    }

    /// Create a logger that discards snapshots (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            snapshot_count: 0,
        }
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshot_count
    }

    /// Log a snapshot to the file
    pub fn log(&mut self, snapshot: &StepSnapshot) -> std::io::Result<()> {
        self.snapshot_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = snapshot.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for SnapshotLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush snapshot logger: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spread_events::{SimTime, StepSnapshot};
    use std::collections::BTreeMap;
    use std::io::BufRead;

    fn empty_step(time: u64) -> StepSnapshot {
        StepSnapshot {
            time: SimTime::new(time),
            agents: Vec::new(),
            action_counts: BTreeMap::new(),
        }
    }

    #[test]
    fn test_snapshot_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("steps.jsonl");

        let mut logger = SnapshotLogger::new(&path).unwrap();
        logger.log(&empty_step(0)).unwrap();
        logger.log(&empty_step(1)).unwrap();
        logger.flush().unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        let parsed = StepSnapshot::from_jsonl(&lines[1]).unwrap();
        assert_eq!(parsed.time, SimTime::new(1));
    }

    #[test]
    fn test_null_logger() {
        let mut logger = SnapshotLogger::null();
        logger.log(&empty_step(0)).unwrap();
        assert_eq!(logger.snapshot_count(), 1);
    }
}
