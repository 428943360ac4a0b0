//! Store-wide writer lock.
//!
//! A non-blocking exclusive `flock` on `<store>/lock`. The kernel drops it
//! when the process exits, so a crashed writer never leaves a stale lock.

use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

pub struct StoreLock {
    path: PathBuf,
    #[cfg(unix)]
    _guard: nix::fcntl::Flock<File>,
    #[cfg(not(unix))]
    _file: File,
}

impl StoreLock {
    /// Take the lock, failing with `Error::Locked` if another writer holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;

        let lock = Self::lock_file(path, file)?;
        tracing::debug!(path = %path.display(), "store lock acquired");
        Ok(lock)
    }

    #[cfg(unix)]
    fn lock_file(path: &Path, file: File) -> Result<Self> {
        use nix::errno::Errno;
        use nix::fcntl::{Flock, FlockArg};

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(guard) => Ok(Self {
                path: path.to_path_buf(),
                _guard: guard,
            }),
            Err((_, Errno::EWOULDBLOCK)) => Err(Error::Locked(path.to_path_buf())),
            Err((_, errno)) => Err(std::io::Error::from(errno).into()),
        }
    }

    // TODO: use LockFileEx on Windows; until then writers are not serialized there.
    #[cfg(not(unix))]
    fn lock_file(path: &Path, file: File) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "store lock released");
    }
}
