use crate::config::{StoreConfig, UserConfig};
use crate::error::{Error, Result};
use crate::hashing::{derive_commit_id, hash_file};
use crate::index::TrackedIndex;
use crate::lock::StoreLock;
use crate::log::CommitLog;
use crate::models::{CommitId, CommitOutcome, CommitSummary, FileDigest, LogEntry};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

pub struct Storage {
    config: StoreConfig,
    log: CommitLog,
    index: TrackedIndex,
    user: UserConfig,
}

impl Storage {
    pub fn new(config: StoreConfig) -> Result<Self> {
        let storage = Self {
            log: CommitLog::new(config.log_path()),
            index: TrackedIndex::new(config.index_path()),
            user: UserConfig::new(config.config_path()),
            config,
        };
        storage.initialize()?;
        Ok(storage)
    }

    fn initialize(&self) -> Result<()> {
        fs::create_dir_all(self.config.commits_dir())?;
        fs::create_dir_all(self.config.staging_dir())?;
        Ok(())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // Index and user operations
    pub fn tracked_files(&self) -> Result<Vec<String>> {
        self.index.read()
    }

    pub fn add(&self, name: &str) -> Result<bool> {
        let _lock = StoreLock::acquire(&self.config.lock_path())?;
        self.index.add(&self.config.work_dir, name)
    }

    pub fn username(&self) -> Result<Option<String>> {
        self.user.username()
    }

    pub fn set_username(&self, name: &str) -> Result<()> {
        let _lock = StoreLock::acquire(&self.config.lock_path())?;
        self.user.set_username(name)
    }

    // History
    pub fn history(&self) -> Result<Vec<LogEntry>> {
        self.log.list()
    }

    /// Most recent commit id.
    ///
    /// The log append is the commit point, so the answer always comes from the
    /// last log entry. `HEAD` is an advisory pointer for outside tooling; it is
    /// only compared against the log here.
    pub fn head(&self) -> Result<Option<CommitId>> {
        let logged = self.log.latest()?.map(|entry| entry.commit_id);
        let head = self.read_head();

        if head != logged {
            tracing::warn!(
                head = ?head.as_ref().map(CommitId::as_str),
                logged = ?logged.as_ref().map(CommitId::as_str),
                "HEAD disagrees with the commit log, using the log"
            );
        }

        Ok(logged)
    }

    pub fn snapshot_path(&self, id: &CommitId) -> PathBuf {
        self.config.commits_dir().join(id.as_str())
    }

    /// File names stored in a snapshot, sorted.
    pub fn snapshot_files(&self, id: &CommitId) -> Result<Vec<String>> {
        let dir = self.snapshot_path(id);
        if !dir.is_dir() {
            return Err(Error::CommitNotFound(id.to_string()));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    // Commit operations
    pub fn commit(&self, message: &str) -> Result<CommitOutcome> {
        validate_message(message)?;

        let _lock = StoreLock::acquire(&self.config.lock_path())?;

        let tracked = self.index.read()?;
        if tracked.is_empty() {
            return Err(Error::NoTrackedFiles);
        }

        let digests = self.collect_digests(&tracked)?;
        if digests.is_empty() {
            return Err(Error::NoTrackedFiles);
        }

        let commit_id = derive_commit_id(digests.iter().map(FileDigest::to_hex));
        let latest = self.head()?;

        if latest.as_ref() == Some(&commit_id) {
            tracing::info!(commit = %commit_id, "nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }

        // Everything fallible except the log append happens before publishing.
        let author = self
            .user
            .username()?
            .map(|name| name.split_whitespace().collect::<Vec<_>>().join("_"))
            .unwrap_or_default();
        let entry = LogEntry::new(commit_id.clone(), author, message.to_string());

        let reused_snapshot = self.materialize(&commit_id, &digests)?;

        self.log.append(&entry)?;
        if let Err(e) = self.write_head(&commit_id) {
            tracing::warn!(
                commit = %commit_id,
                error = %e,
                "commit recorded but HEAD not updated"
            );
        }

        let files = digests
            .iter()
            .filter_map(|d| d.path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        tracing::info!(
            commit = %commit_id,
            author = %entry.author,
            reused_snapshot,
            "changes committed"
        );

        Ok(CommitOutcome::Committed(CommitSummary {
            entry,
            files,
            reused_snapshot,
        }))
    }

    /// Digests of tracked top-level files in the work dir, sorted by name.
    fn collect_digests(&self, tracked: &[String]) -> Result<Vec<FileDigest>> {
        let tracked: BTreeSet<&str> = tracked.iter().map(String::as_str).collect();
        let mut matched = Vec::new();

        for entry in fs::read_dir(&self.config.work_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = entry.file_name();
            if let Some(name) = name.to_str() {
                if tracked.contains(name) {
                    matched.push((name.to_string(), path));
                }
            }
        }

        matched.sort_by(|a, b| a.0.cmp(&b.0));

        matched
            .into_iter()
            .map(|(_, path)| hash_file(&path))
            .collect()
    }

    /// Publish the snapshot for `id`. Returns true if it already existed.
    fn materialize(&self, id: &CommitId, digests: &[FileDigest]) -> Result<bool> {
        let target = self.snapshot_path(id);
        if target.is_dir() {
            tracing::debug!(commit = %id, "snapshot already present, reusing");
            return Ok(true);
        }

        let staging = tempfile::Builder::new()
            .prefix("snapshot-")
            .tempdir_in(self.config.staging_dir())?;

        for digest in digests {
            let name = digest
                .path
                .file_name()
                .ok_or_else(|| Error::FileNotFound(digest.path.clone()))?;
            copy_verified(digest, &staging.path().join(name))?;
        }

        sync_dir(staging.path())?;
        fs::rename(staging.path(), &target)?;
        // The directory now lives at `target`; stop the guard from cleaning up.
        let _ = staging.keep();
        sync_dir(&self.config.commits_dir())?;

        tracing::debug!(commit = %id, files = digests.len(), "snapshot published");
        Ok(false)
    }

    fn read_head(&self) -> Option<CommitId> {
        let content = match fs::read_to_string(self.config.head_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable HEAD");
                return None;
            }
        };

        match CommitId::parse(content.trim()) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed HEAD");
                None
            }
        }
    }

    fn write_head(&self, id: &CommitId) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.config.store_root)?;
        writeln!(tmp, "{}", id)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.config.head_path()).map_err(io::Error::from)?;
        Ok(())
    }
}

fn validate_message(message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(Error::MissingMessage);
    }
    if message.contains(['\n', '\r']) {
        return Err(Error::InvalidMessage("message must fit on a single line".to_string()));
    }
    Ok(())
}

/// Copy a file, fsync the copy, and check it still matches its digest.
fn copy_verified(digest: &FileDigest, dst: &Path) -> Result<()> {
    let mut src = File::open(&digest.path)?;
    let mut out = File::create(dst)?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];

    loop {
        let n = src.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        out.write_all(&buf[..n])?;
    }
    out.sync_all()?;

    let mut copied = [0u8; 16];
    hasher.finalize_xof().fill(&mut copied);
    if copied != digest.digest {
        return Err(Error::ConcurrentModification(digest.path.clone()));
    }

    Ok(())
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> Result<()> {
    File::open(path)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> Result<()> {
    Ok(())
}
