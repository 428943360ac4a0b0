use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Length of a hex-encoded SHA-256 commit id.
pub const COMMIT_ID_HEX_LEN: usize = 64;

/// 256-bit fingerprint naming a snapshot, stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    pub fn parse(s: &str) -> Result<Self> {
        let valid = s.len() == COMMIT_ID_HEX_LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::InvalidCommitId(s.to_string()))
        }
    }

    pub(crate) fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` hex characters, for compact display.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CommitId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

/// Change-detection digest of one tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub path: PathBuf,
    pub digest: [u8; 16],
}

impl FileDigest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub commit_id: CommitId,
    pub author: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(commit_id: CommitId, author: String, message: String) -> Self {
        Self {
            commit_id,
            author,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    pub entry: LogEntry,
    pub files: Vec<String>,
    /// True when an identical snapshot already existed and was reused.
    pub reused_snapshot: bool,
}

#[derive(Debug, Clone)]
pub enum CommitOutcome {
    Committed(CommitSummary),
    NothingToCommit,
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}
