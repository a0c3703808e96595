use super::config::LogConfig;
use super::record::LogRecord;
use crate::error::LogError;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// The friendship log: an append-only file of fixed-width edge records.
///
/// Record `n` (1-based, its *slot*) always lives at byte offset
/// `record_size * (n - 1)`. Removing an edge overwrites its record in place
/// with a tombstone, so every other record keeps its offset and deletion is a
/// single positional write.
///
/// Slots are assigned sequentially and are never reused while the log is open,
/// tombstoned or not.
pub struct FriendshipLog {
    path: PathBuf,
    file: File,
    config: LogConfig,
    record_count: u32,
}

impl FriendshipLog {
    /// Opens an existing log or creates an empty one.
    ///
    /// The file length must be a whole number of records.
    pub fn open(path: impl AsRef<Path>, config: LogConfig) -> Result<Self, LogError> {
        if config.field_width == 0 {
            return Err(LogError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "log field width must be at least 1",
            )));
        }

        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let len = file.metadata()?.len();
        let record_size = config.record_size() as u64;
        if len % record_size != 0 {
            return Err(LogError::Corrupted(format!(
                "log length {len} is not a multiple of the {record_size}-byte record size"
            )));
        }
        let record_count = u32::try_from(len / record_size).map_err(|_| {
            LogError::Corrupted(format!("log holds more than {} records", u32::MAX))
        })?;

        #[cfg(feature = "logging")]
        log::info!(
            "opened friendship log {} with {record_count} records",
            path.display()
        );

        Ok(Self {
            path,
            file,
            config,
            record_count,
        })
    }

    /// Returns the path the log was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the log configuration.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Returns the size of one record in bytes.
    pub fn record_size(&self) -> usize {
        self.config.record_size()
    }

    /// Returns the number of records, tombstones included.
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// Returns the slot the next appended record will receive.
    pub fn next_slot(&self) -> u32 {
        self.record_count + 1
    }

    /// Appends a live record for the edge `from -> to`.
    ///
    /// Returns the slot assigned to the record. The slot counter only advances
    /// once the write (and sync, if enabled) has succeeded. On failure the
    /// file is cut back to its previous length, so a reopen never sees the
    /// record either; if that also fails the log is reported corrupted.
    pub fn append(&mut self, from: u32, to: u32) -> Result<u32, LogError> {
        let slot = self.next_slot();
        let bytes = LogRecord::new(slot, from, to).encode(self.config.field_width)?;
        if let Err(err) = self.write_at(slot, &bytes) {
            return Err(match self.truncate_to(slot) {
                Ok(()) => err,
                Err(undo) => LogError::Corrupted(format!(
                    "append to slot {slot} failed ({err}) and could not be undone: {undo}"
                )),
            });
        }
        self.record_count = slot;

        #[cfg(feature = "logging")]
        log::debug!("friendship log: slot {slot} = {from} -> {to}");

        Ok(slot)
    }

    /// Overwrites the record at `slot` with a tombstone.
    ///
    /// If the write or sync fails, the previous record is written back before
    /// the error is returned.
    pub fn tombstone(&mut self, slot: u32) -> Result<(), LogError> {
        self.check_slot(slot)?;
        let bytes = LogRecord::TOMBSTONE.encode(self.config.field_width)?;
        let previous = self.read_raw(slot)?;
        if let Err(err) = self.write_at(slot, &bytes) {
            return Err(match self.write_at(slot, &previous) {
                Ok(()) => err,
                Err(undo) => LogError::Corrupted(format!(
                    "tombstone of slot {slot} failed ({err}) and could not be undone: {undo}"
                )),
            });
        }

        #[cfg(feature = "logging")]
        log::debug!("friendship log: slot {slot} tombstoned");

        Ok(())
    }

    /// Reads the record stored at `slot`.
    pub fn read_record(&self, slot: u32) -> Result<LogRecord, LogError> {
        self.check_slot(slot)?;
        LogRecord::decode(&self.read_raw(slot)?, self.config.field_width)
    }

    /// Reads every record in slot order, tombstones included.
    ///
    /// The record at index `i` is the one stored in slot `i + 1`.
    pub fn read_all(&self) -> Result<Vec<LogRecord>, LogError> {
        let record_size = self.record_size();
        let mut buf = vec![0u8; record_size * self.record_count as usize];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut buf)?;

        buf.chunks_exact(record_size)
            .map(|chunk| LogRecord::decode(chunk, self.config.field_width))
            .collect()
    }

    /// Reads every record that has not been tombstoned.
    pub fn live_records(&self) -> Result<Vec<LogRecord>, LogError> {
        let mut records = self.read_all()?;
        records.retain(|record| !record.is_tombstone());
        Ok(records)
    }

    /// Flushes all writes to disk.
    pub fn sync(&self) -> Result<(), LogError> {
        self.file.sync_data()?;
        Ok(())
    }

    fn check_slot(&self, slot: u32) -> Result<(), LogError> {
        if slot == 0 || slot > self.record_count {
            return Err(LogError::SlotOutOfRange(slot));
        }
        Ok(())
    }

    fn offset(&self, slot: u32) -> u64 {
        u64::from(slot - 1) * self.record_size() as u64
    }

    fn read_raw(&self, slot: u32) -> Result<Vec<u8>, LogError> {
        let mut buf = vec![0u8; self.record_size()];
        let mut file = &self.file;
        file.seek(SeekFrom::Start(self.offset(slot)))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Drops anything written at or after `slot`.
    fn truncate_to(&mut self, slot: u32) -> Result<(), LogError> {
        let len = self.offset(slot);
        if self.file.metadata()?.len() > len {
            self.file.set_len(len)?;
            if self.config.sync_on_write {
                self.file.sync_data()?;
            }
        }
        Ok(())
    }

    fn write_at(&mut self, slot: u32, bytes: &[u8]) -> Result<(), LogError> {
        let offset = self.offset(slot);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(bytes)?;
        if self.config.sync_on_write {
            self.file.sync_data()?;
        }
        Ok(())
    }
}

impl Drop for FriendshipLog {
    fn drop(&mut self) {
        // Best effort flush on drop
        let _ = self.sync();
    }
}
