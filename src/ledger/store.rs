use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::schema::{LEDGER_COLUMNS, encode_row, read_transactions};
use crate::core::{AutonomoError, LedgerEntry, Transaction};

/// Append-only CSV ledger.
///
/// Rows are never updated or deleted. Appends from one process are
/// serialized by an internal lock; the file is opened in append mode so
/// existing rows are never rewritten.
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All persisted rows, in file order.
    ///
    /// A missing ledger is created with just the header row and an empty
    /// snapshot is returned.
    pub fn load(&self) -> Result<Vec<Transaction>, AutonomoError> {
        let _guard = self.lock();
        if self.ensure_header()? {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let rows = read_transactions(file)?;
        log::debug!("loaded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    /// Persist a draft and return its new id.
    ///
    /// Derived amounts are recomputed, the quarter is derived from the date
    /// when unset (current quarter when there is no date), and the status
    /// defaults to pending.
    pub fn append(&self, entry: LedgerEntry) -> Result<String, AutonomoError> {
        let _guard = self.lock();
        self.ensure_header()?;

        let id = uuid::Uuid::new_v4().to_string();
        let tx = entry.into_transaction(id.clone());

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            log::warn!("terminating unfinished last line of {}", self.path.display());
            file.write_all(b"\n")?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(encode_row(&tx))?;
        writer.flush()?;

        log::debug!(
            "appended {} {} {} to {}",
            tx.kind.code(),
            tx.id,
            tx.total,
            self.path.display()
        );
        Ok(id)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Returns true when the file was just created.
    fn ensure_header(&self) -> Result<bool, AutonomoError> {
        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if !is_empty {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(LEDGER_COLUMNS)?;
        writer.flush()?;
        log::info!("initialised empty ledger at {}", self.path.display());
        Ok(true)
    }
}

// Appending after an unterminated last line would merge two rows.
fn ends_with_newline(file: &mut File) -> Result<bool, AutonomoError> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
