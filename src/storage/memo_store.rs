// src/storage/memo_store.rs
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::entity::{Memo, MemoDraft, MemoId, MemoUpdate};
use crate::error::{MemoError, Result};
use crate::frontmatter::{self, FormatError};
use crate::warnings::{check_thresholds, format_warning};

use super::scan::scan_memo_ids;
use super::sequence::SequenceCache;

const MEMOS_DIR: &str = "memos";

/// Prefix of in-flight writes; never a canonical memo file name
const STAGING_PREFIX: &str = ".memo-";

/// How many consecutive ids `create` tries when it keeps finding files
/// that already exist.
pub const MAX_ID_ATTEMPTS: u32 = 100;

/// File-backed memo store: one `<id>.md` file per memo in `<data_dir>/memos`.
///
/// A single reader-writer lock covers the sequence cache and the directory.
/// `get`, `list` and `tags` share it; `create`, `update` and `delete` take it
/// exclusively, so ids are handed out strictly one at a time.
pub struct MemoStore {
    dir: PathBuf,
    sequences: RwLock<SequenceCache>,
    clock: Arc<dyn Clock>,
}

impl MemoStore {
    /// Open the store under `data_dir`, creating `memos/` if needed
    pub fn open(data_dir: &Path) -> Result<Self> {
        Self::open_with_clock(data_dir, Arc::new(SystemClock))
    }

    pub fn open_with_clock(data_dir: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        let dir = data_dir.join(MEMOS_DIR);
        fs::create_dir_all(&dir).map_err(|e| MemoError::io("create", dir_label(&dir), e))?;

        let ids = scan_all(&dir)?;
        for warning in check_thresholds(ids.len()) {
            warn!("{}", format_warning(&warning));
        }

        let memo_count = ids.len();
        let sequences = SequenceCache::from_ids(ids);
        info!(
            dir = %dir.display(),
            memos = memo_count,
            dates = sequences.dates(),
            "Opened memo store"
        );

        Ok(Self {
            dir,
            sequences: RwLock::new(sequences),
            clock,
        })
    }

    /// Directory holding the memo files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a memo dated today with the next free sequence number.
    pub fn create(&self, draft: MemoDraft) -> Result<Memo> {
        let mut sequences = self.sequences.write();

        let now = self.clock.now();
        let date = now.date_naive();
        let mut seq = sequences.next(date);

        let mut memo = Memo::new(MemoId::new(date, seq), draft, now.with_timezone(&Utc));
        memo.content = frontmatter::trim_blank_lines(&memo.content).to_string();

        for _ in 0..MAX_ID_ATTEMPTS {
            memo.id = MemoId::new(date, seq);
            if self.write_new(&memo)? {
                sequences.record(memo.id);
                info!(id = %memo.id, "Created memo");
                return Ok(memo);
            }

            // Someone else owns this file; the cache was behind
            warn!(id = %memo.id, "Memo file already exists, trying next id");
            sequences.record(memo.id);
            seq = seq.saturating_add(1);
        }

        Err(MemoError::Conflict {
            date,
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    pub fn get(&self, id: &str) -> Result<Memo> {
        let _guard = self.sequences.read();
        let id = parse_id(id)?;
        let memo = self.read(id)?;
        debug!(id = %id, "Read memo");
        Ok(memo)
    }

    /// Apply a sparse patch and bump `updated_at`. Re-`get` to see the result.
    pub fn update(&self, id: &str, patch: MemoUpdate) -> Result<()> {
        let _guard = self.sequences.write();
        let id = parse_id(id)?;

        let mut memo = self.read(id)?;
        patch.apply_to(&mut memo);
        memo.content = frontmatter::trim_blank_lines(&memo.content).to_string();
        memo.updated_at = self.next_update_time(memo.updated_at);

        self.write(&memo)?;
        info!(id = %id, "Updated memo");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut sequences = self.sequences.write();
        let id = parse_id(id)?;

        match fs::remove_file(self.path_for(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MemoError::not_found(id.to_string()))
            }
            Err(e) => return Err(MemoError::io("delete", id.to_string(), e)),
        }

        // The second-highest surviving number is only known from disk
        if sequences.holds_max(id) {
            match scan_all(&self.dir) {
                Ok(ids) => sequences.recompute(id.date(), ids),
                Err(e) => warn!(
                    id = %id,
                    error = %e,
                    "Rescan after delete failed, keeping previous sequence maximum"
                ),
            }
        }

        info!(id = %id, "Deleted memo");
        Ok(())
    }

    /// Every memo in the directory, in no particular order.
    pub fn list(&self) -> Result<Vec<Memo>> {
        let _guard = self.sequences.read();

        let memos = scan_all(&self.dir)?
            .into_iter()
            .map(|id| self.read(id))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = memos.len(), "Listed memos");
        Ok(memos)
    }

    /// Distinct tags across all memos, sorted
    pub fn tags(&self) -> Result<Vec<String>> {
        let tags: BTreeSet<String> = self
            .list()?
            .into_iter()
            .flat_map(|memo| memo.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Throw the sequence cache away and rebuild it from the directory.
    pub fn rebuild_sequences(&self) -> Result<()> {
        let mut sequences = self.sequences.write();
        *sequences = SequenceCache::from_ids(scan_all(&self.dir)?);
        info!(dates = sequences.dates(), "Rebuilt sequence cache");
        Ok(())
    }

    fn path_for(&self, id: MemoId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    fn read(&self, id: MemoId) -> Result<Memo> {
        let bytes = match fs::read(self.path_for(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MemoError::not_found(id.to_string()))
            }
            Err(e) => return Err(MemoError::io("read", id.to_string(), e)),
        };

        let format_error = |source: FormatError| MemoError::Format {
            id: id.to_string(),
            source,
        };
        let memo = frontmatter::parse_bytes(&bytes).map_err(format_error)?;
        if memo.id != id {
            return Err(format_error(FormatError::IdMismatch {
                expected: id,
                found: memo.id,
            }));
        }
        Ok(memo)
    }

    /// Write a brand-new memo file. Returns `false` if the file already exists.
    fn write_new(&self, memo: &Memo) -> Result<bool> {
        let text = frontmatter::format(memo)?;
        let id = memo.id.to_string();

        let staged = self.stage(&text).map_err(|e| MemoError::io("create", &id, e))?;
        match staged.persist_noclobber(self.path_for(memo.id)) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(MemoError::io("create", id, e.error)),
        }
    }

    /// Replace an existing memo file. On failure the previous version stays in place.
    fn write(&self, memo: &Memo) -> Result<()> {
        let text = frontmatter::format(memo)?;
        let id = memo.id.to_string();

        let staged = self.stage(&text).map_err(|e| MemoError::io("write", &id, e))?;
        staged
            .persist(self.path_for(memo.id))
            .map_err(|e| MemoError::io("write", id, e.error))?;
        Ok(())
    }

    /// Write `text` to a hidden temp file in the memo directory. The scan never
    /// sees it, and it is removed if dropped before being persisted.
    fn stage(&self, text: &str) -> io::Result<NamedTempFile> {
        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        staged.write_all(text.as_bytes())?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }

    /// `updated_at` must move forward even if the clock did not.
    fn next_update_time(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.clock.now().with_timezone(&Utc);
        if now > previous {
            now
        } else {
            previous + Duration::nanoseconds(1)
        }
    }
}

/// Ids that are not canonical can never name a file, so they are simply missing.
fn parse_id(id: &str) -> Result<MemoId> {
    id.parse().map_err(|_| MemoError::not_found(id))
}

fn scan_all(dir: &Path) -> Result<Vec<MemoId>> {
    let scan_error = |e: io::Error| MemoError::io("scan", dir_label(dir), e);
    scan_memo_ids(dir)
        .map_err(scan_error)?
        .collect::<io::Result<Vec<_>>>()
        .map_err(scan_error)
}

fn dir_label(dir: &Path) -> String {
    dir.display().to_string()
}
