//! # svcs-core
//!
//! Core library for svcs - a minimal local version control engine.
//!
//! Tracked files are hashed into a content-addressed commit id. When the id
//! differs from the latest commit, the files are copied into an immutable
//! snapshot directory and the commit is appended to the history log.

pub mod config;
pub mod error;
pub mod hashing;
pub mod index;
pub mod lock;
pub mod log;
pub mod models;
pub mod storage;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use models::{CommitId, CommitOutcome, CommitSummary, FileDigest, LogEntry};
pub use storage::Storage;
