//! Content digests and commit id derivation.
//!
//! File digests only detect change, so a 128-bit BLAKE3 output is plenty.
//! The commit id is a SHA-256 over the concatenated hex digests.

use crate::error::Result;
use crate::models::{CommitId, FileDigest};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Stream a file through the hasher and return its 128-bit digest.
pub fn hash_file(path: &Path) -> Result<FileDigest> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let bytes = io::copy(&mut file, &mut hasher)?;

    let mut digest = [0u8; 16];
    hasher.finalize_xof().fill(&mut digest);

    tracing::debug!(path = %path.display(), bytes, "hashed file");

    Ok(FileDigest {
        path: path.to_path_buf(),
        digest,
    })
}

/// Derive a commit id from hex digests, in the order given.
pub fn derive_commit_id<I, S>(digests: I) -> CommitId
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for digest in digests {
        hasher.update(digest.as_ref().as_bytes());
    }
    CommitId::from_digest(&hasher.finalize())
}
