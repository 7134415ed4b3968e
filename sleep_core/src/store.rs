//! Append-only sleep record store.
//!
//! Records live in a single CSV file with a header row, one row per
//! submission, columns in record field order. Appends take an exclusive
//! file lock so concurrent writers can't interleave rows; reads take a
//! shared lock.

use crate::{Error, Result, SleepRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// File name of the record store inside the data directory
pub const STORE_FILE_NAME: &str = "sleep_data.csv";

/// Timestamp layout written by older exports (no offset, taken as UTC)
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ordered collection of sleep records supporting append and full reads
pub trait RecordStore {
    fn append(&mut self, record: &SleepRecord) -> Result<()>;
    fn read_all(&self) -> Result<Vec<SleepRecord>>;
}

/// In-memory store, handy for dry runs and tests
impl RecordStore for Vec<SleepRecord> {
    fn append(&mut self, record: &SleepRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<SleepRecord>> {
        Ok(self.clone())
    }
}

/// A row in the CSV file
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    timestamp: String,
    name: String,
    age: u32,
    heart_rate: u32,
    activity_level: u32,
    sleep_duration: f64,
    room_temperature: f64,
    caffeine_consumption: u32,
    alcohol_consumption: u32,
    screen_time: f64,
    sleep_quality: f64,
}

impl From<&SleepRecord> for CsvRow {
    fn from(record: &SleepRecord) -> Self {
        CsvRow {
            timestamp: record.timestamp.to_rfc3339(),
            name: record.name.clone(),
            age: record.age,
            heart_rate: record.heart_rate,
            activity_level: record.activity_level,
            sleep_duration: record.sleep_duration,
            room_temperature: record.room_temperature,
            caffeine_consumption: record.caffeine_consumption,
            alcohol_consumption: record.alcohol_consumption,
            screen_time: record.screen_time,
            sleep_quality: record.sleep_quality,
        }
    }
}

impl TryFrom<CsvRow> for SleepRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let timestamp = parse_timestamp(&row.timestamp)?;

        Ok(SleepRecord {
            timestamp,
            name: row.name,
            age: row.age,
            heart_rate: row.heart_rate,
            activity_level: row.activity_level,
            sleep_duration: row.sleep_duration,
            room_temperature: row.room_temperature,
            caffeine_consumption: row.caffeine_consumption,
            alcohol_consumption: row.alcohol_consumption,
            screen_time: row.screen_time,
            sleep_quality: row.sleep_quality,
        })
    }
}

/// Parse an RFC 3339 timestamp, falling back to the legacy naive layout
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, LEGACY_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::InvalidInput(format!("Invalid timestamp {:?}: {}", s, e)))
}

/// CSV-backed record store with file locking
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the conventional file name inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Close off a row left unterminated by an interrupted write, so the next
/// row starts on its own line
fn terminate_partial_row(mut file: &File) -> Result<()> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;

    if last[0] != b'\n' {
        tracing::warn!("Record store ends mid-row, terminating it before appending");
        file.write_all(b"\n")?;
    }
    Ok(())
}

impl RecordStore for CsvRecordStore {
    fn append(&mut self, record: &SleepRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Checked under the lock so two first writers can't both add a header
        let needs_headers = file.metadata()?.len() == 0;
        if !needs_headers {
            terminate_partial_row(&file)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_headers)
            .from_writer(&file);
        writer.serialize(CsvRow::from(record))?;
        writer.flush()?;
        drop(writer);

        file.sync_all()?;
        file.unlock()?;

        tracing::info!(
            "Appended record for {} at {} (quality {:.1})",
            record.name,
            record.timestamp,
            record.sleep_quality
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<SleepRecord>> {
        if !self.path.exists() {
            tracing::debug!("No record store at {:?}, history is empty", self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(&file);

        let mut records = Vec::new();
        for (row_num, result) in reader.deserialize::<CsvRow>().enumerate() {
            match result {
                Ok(row) => match SleepRecord::try_from(row) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!("Skipping CSV row {}: {}", row_num + 1, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to deserialize CSV row {}: {}", row_num + 1, e);
                }
            }
        }

        file.unlock()?;
        tracing::debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}
