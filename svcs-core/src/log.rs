//! Append-only commit history, one `<id> <author> <message>` line per commit.

use crate::error::{Error, Result};
use crate::models::{CommitId, LogEntry};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct CommitLog {
    path: PathBuf,
}

impl CommitLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let line = format!("{} {} {}\n", entry.commit_id, entry.author, entry.message);
        file.write_all(line.as_bytes())?;
        file.sync_all()?;

        tracing::debug!(commit = %entry.commit_id, "log entry appended");
        Ok(())
    }

    /// All entries, most recent first. Empty when nothing was committed.
    pub fn list(&self) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_chronological()?;
        entries.reverse();
        Ok(entries)
    }

    /// The last entry written, if any.
    pub fn latest(&self) -> Result<Option<LogEntry>> {
        Ok(self.read_chronological()?.pop())
    }

    fn read_chronological(&self) -> Result<Vec<LogEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(parse_line(&line, idx + 1)?);
        }

        Ok(entries)
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<LogEntry> {
    let mut parts = line.splitn(3, ' ');
    let (Some(id), Some(author), Some(message)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::CorruptLog {
            line: line_no,
            reason: "expected '<commit> <author> <message>'".to_string(),
        });
    };

    let commit_id = CommitId::parse(id).map_err(|_| Error::CorruptLog {
        line: line_no,
        reason: format!("invalid commit id '{}'", id),
    })?;

    Ok(LogEntry::new(
        commit_id,
        author.to_string(),
        message.to_string(),
    ))
}
