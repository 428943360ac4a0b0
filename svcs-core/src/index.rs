//! The tracked file index: one file name per line, in the order added.

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

pub struct TrackedIndex {
    path: PathBuf,
}

impl TrackedIndex {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Tracked names in insertion order. A missing index reads as empty.
    pub fn read(&self) -> Result<Vec<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names: Vec<String> = Vec::new();
        for line in content.lines() {
            let name = line.trim();
            if name.is_empty() {
                continue;
            }
            if names.iter().any(|n| n == name) {
                tracing::warn!(name, "duplicate entry in tracked file index");
                continue;
            }
            names.push(name.to_string());
        }

        Ok(names)
    }

    /// Track `name`, resolved against `work_dir`. Returns false if it was
    /// already tracked.
    pub fn add(&self, work_dir: &Path, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::FileNotFound(PathBuf::from(name)));
        }
        // Commits only snapshot top-level entries, matched by bare name.
        if !is_bare_file_name(name) {
            return Err(Error::InvalidPath(name.to_string()));
        }

        let candidate = work_dir.join(name);
        if !candidate.is_file() {
            return Err(Error::FileNotFound(PathBuf::from(name)));
        }

        if self.read()?.iter().any(|n| n == name) {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", name)?;
        file.sync_all()?;

        tracing::debug!(name, "file tracked");
        Ok(true)
    }
}

fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_index_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = TrackedIndex::new(dir.path().join("index.txt"));

        assert!(index.read().unwrap().is_empty());
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let index = TrackedIndex::new(dir.path().join("vcs").join("index.txt"));

        assert!(index.add(dir.path(), "b.txt").unwrap());
        assert!(index.add(dir.path(), "a.txt").unwrap());
        assert!(!index.add(dir.path(), "b.txt").unwrap());

        assert_eq!(index.read().unwrap(), vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_add_missing_file() {
        let dir = TempDir::new().unwrap();
        let index = TrackedIndex::new(dir.path().join("index.txt"));

        let err = index.add(dir.path(), "ghost.txt").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(ref p) if p == Path::new("ghost.txt")));
        assert!(!dir.path().join("index.txt").exists());
    }

    #[test]
    fn test_add_rejects_nested_and_prefixed_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("a.txt"), "nested").unwrap();
        std::fs::write(dir.path().join("a.txt"), "top").unwrap();
        let index = TrackedIndex::new(dir.path().join("index.txt"));
        let absolute = dir.path().join("a.txt");

        for name in ["sub/a.txt", "./a.txt", "../a.txt", absolute.to_str().unwrap()] {
            let err = index.add(dir.path(), name).unwrap_err();
            assert!(matches!(err, Error::InvalidPath(_)), "{} was accepted", name);
            assert!(err.is_usage());
        }

        assert!(index.read().unwrap().is_empty());
        assert!(index.add(dir.path(), "a.txt").unwrap());
    }

    #[test]
    fn test_add_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let index = TrackedIndex::new(dir.path().join("index.txt"));

        assert!(index.add(dir.path(), "sub").is_err());
    }

    #[test]
    fn test_read_skips_duplicates_and_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.txt");
        std::fs::write(&path, "a.txt\n\nb.txt\na.txt\n").unwrap();

        let index = TrackedIndex::new(&path);
        assert_eq!(index.read().unwrap(), vec!["a.txt", "b.txt"]);
    }
}
