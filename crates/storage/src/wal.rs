// Path: crates/storage/src/wal.rs
//! Write-Ahead Log (WAL) for ledger persistence.
//!
//! Every committed change set is appended as one entry before it is applied to the
//! in-memory store. Opening a ledger replays the entries in order.
//!
//! Entry layout: `sequence: u64 LE | data_len: u64 LE | crc32: u32 LE | data`, where
//! `data` is the bincode-encoded list of inserts.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const HEADER_LEN: usize = 20;
/// Upper bound on a single entry body; a larger length means the header is corrupt.
const MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// One committed change set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WalEntry {
    /// The commit sequence, starting at 1 and increasing by one per entry.
    pub sequence: u64,
    /// The key-value pairs written by the commit, in key order.
    pub inserts: Vec<(Vec<u8>, Vec<u8>)>,
}

struct WalFile {
    file: File,
    len: u64,
    /// Set when a failed append could not be rolled back; the file may end in a
    /// partial frame, so nothing more may be appended.
    poisoned: bool,
}

/// Appends commits to the log. Appends are serialized by an internal lock.
pub struct WalWriter {
    path: PathBuf,
    sync: bool,
    file: Mutex<WalFile>,
}

impl WalWriter {
    /// Opens (or creates) the log for appending. When `sync` is set, every append is
    /// fsynced before it returns.
    pub fn open(path: &Path, sync: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open WAL at {}", path.display()))?;
        Self::from_file(path, file, sync)
    }

    /// Wraps an already opened log file. New entries are written at its current end.
    pub fn from_file(path: &Path, file: File, sync: bool) -> Result<Self> {
        let len = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            sync,
            file: Mutex::new(WalFile {
                file,
                len,
                poisoned: false,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one commit and returns the number of bytes written. On failure the
    /// file is truncated back to its previous length so a half-written entry never
    /// precedes a later one. If that truncation fails too, the writer refuses every
    /// later append.
    pub fn append_commit(&self, sequence: u64, inserts: &[(Vec<u8>, Vec<u8>)]) -> Result<u64> {
        let data = bincode::serialize(inserts)?;
        let crc = crc32fast::hash(&data);
        let mut frame = Vec::with_capacity(HEADER_LEN + data.len());
        frame.extend_from_slice(&sequence.to_le_bytes());
        frame.extend_from_slice(&(data.len() as u64).to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&data);

        let mut guard = self.file.lock().map_err(|_| anyhow!("WAL lock poisoned"))?;
        let wal = &mut *guard;
        if wal.poisoned {
            bail!(
                "WAL {} ends in an unrecovered partial entry; refusing entry {}",
                self.path.display(),
                sequence
            );
        }

        let outcome = wal.file.write_all(&frame).and_then(|_| {
            if self.sync {
                wal.file.sync_data()
            } else {
                Ok(())
            }
        });
        if let Err(e) = outcome {
            if let Err(trunc) = wal.file.set_len(wal.len) {
                tracing::error!(target: "storage", "WAL rollback to {} bytes failed: {}", wal.len, trunc);
                wal.poisoned = true;
            }
            return Err(anyhow!(e).context(format!("failed to append WAL entry {}", sequence)));
        }
        let written = frame.len() as u64;
        wal.len += written;
        Ok(written)
    }
}

/// Reads complete entries from a log, stopping at a torn (partially written) tail.
pub struct WalIterator {
    reader: BufReader<File>,
    valid_len: u64,
    torn: bool,
    done: bool,
}

impl WalIterator {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            valid_len: 0,
            torn: false,
            done: false,
        })
    }

    /// The byte length covered by the complete entries read so far.
    pub fn valid_len(&self) -> u64 {
        self.valid_len
    }

    /// True if iteration stopped at an incomplete trailing entry.
    pub fn is_torn(&self) -> bool {
        self.torn
    }

    fn read_entry(&mut self) -> Result<Option<WalEntry>> {
        let mut header = [0u8; HEADER_LEN];
        let got = read_full(&mut self.reader, &mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < HEADER_LEN {
            self.torn = true;
            return Ok(None);
        }

        let (seq_bytes, rest) = header.split_at(8);
        let (len_bytes, crc_bytes) = rest.split_at(8);
        let sequence = u64::from_le_bytes(seq_bytes.try_into()?);
        let data_len = u64::from_le_bytes(len_bytes.try_into()?);
        let crc = u32::from_le_bytes(crc_bytes.try_into()?);

        if data_len > MAX_ENTRY_BYTES {
            return Err(anyhow!(
                "corrupt WAL header at offset {}: entry length {}",
                self.valid_len,
                data_len
            ));
        }
        let mut data = vec![0u8; data_len as usize];
        if read_full(&mut self.reader, &mut data)? < data.len() {
            self.torn = true;
            return Ok(None);
        }
        if crc32fast::hash(&data) != crc {
            return Err(anyhow!(
                "WAL checksum mismatch for entry {} at offset {}",
                sequence,
                self.valid_len
            ));
        }
        let inserts: Vec<(Vec<u8>, Vec<u8>)> = bincode::deserialize(&data)
            .map_err(|e| anyhow!("Failed to deserialize WAL entry {}: {}", sequence, e))?;

        self.valid_len += (HEADER_LEN as u64) + data_len;
        Ok(Some(WalEntry { sequence, inserts }))
    }
}

impl Iterator for WalIterator {
    type Item = Result<WalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Reads every complete entry of the log at `path`, truncating a torn tail left by an
/// interrupted append. A missing file is an empty log.
pub fn recover(path: &Path) -> Result<Vec<WalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut iter = WalIterator::new(path)?;
    let mut entries = Vec::new();
    for entry in iter.by_ref() {
        entries.push(entry?);
    }
    if iter.is_torn() {
        let file_len = std::fs::metadata(path)?.len();
        tracing::warn!(
            target: "storage",
            "WAL {} has a torn tail; truncating {} bytes after the last complete entry",
            path.display(),
            file_len.saturating_sub(iter.valid_len())
        );
        OpenOptions::new()
            .write(true)
            .open(path)?
            .set_len(iter.valid_len())?;
    }
    Ok(entries)
}

/// Fills `buf` as far as possible, returning the number of bytes read (short only at EOF).
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while let Some(remaining) = buf.get_mut(filled..) {
        if remaining.is_empty() {
            break;
        }
        match reader.read(remaining) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
