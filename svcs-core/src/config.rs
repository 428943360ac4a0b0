use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_DIR: &str = "vcs";

const COMMITS_DIR: &str = "commits";
const STAGING_DIR: &str = "staging";
const LOG_FILE: &str = "log.txt";
const INDEX_FILE: &str = "index.txt";
const CONFIG_FILE: &str = "config.txt";
const HEAD_FILE: &str = "HEAD";
const LOCK_FILE: &str = "lock";

/// Where a store lives and which directory it snapshots.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub store_root: PathBuf,
    pub work_dir: PathBuf,
}

impl StoreConfig {
    pub fn new<S: Into<PathBuf>, W: Into<PathBuf>>(store_root: S, work_dir: W) -> Self {
        Self {
            store_root: store_root.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Store at `<work_dir>/vcs`.
    pub fn for_work_dir<W: Into<PathBuf>>(work_dir: W) -> Self {
        let work_dir = work_dir.into();
        Self {
            store_root: work_dir.join(DEFAULT_STORE_DIR),
            work_dir,
        }
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.store_root.join(COMMITS_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.store_root.join(STAGING_DIR)
    }

    pub fn log_path(&self) -> PathBuf {
        self.store_root.join(LOG_FILE)
    }

    pub fn index_path(&self) -> PathBuf {
        self.store_root.join(INDEX_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.store_root.join(CONFIG_FILE)
    }

    pub fn head_path(&self) -> PathBuf {
        self.store_root.join(HEAD_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.store_root.join(LOCK_FILE)
    }
}

/// The single-line username file.
pub struct UserConfig {
    path: PathBuf,
}

impl UserConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Configured username, `None` when the file is missing or blank.
    pub fn username(&self) -> Result<Option<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let name = content.lines().next().unwrap_or("").trim();
        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }

    /// Overwrite the username. Whitespace would break the log's field split.
    pub fn set_username(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidUsername(name.to_string()));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&self.path)?;
        file.write_all(name.as_bytes())?;
        file.sync_all()?;

        tracing::debug!(username = name, "username updated");
        Ok(())
    }
}
