use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// SHA-256 hex digest of a listing's text, used as the dedup key.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Durable record of content fingerprints already processed.
///
/// Backed by an append-only file of hex digest lines, loaded into an
/// in-memory set at startup. Membership is monotonic: a recorded
/// fingerprint is never removed. Single-writer assumption; the file is
/// created empty if absent.
pub struct SeenLog {
    path: PathBuf,
    file: File,
    seen: HashSet<String>,
}

impl SeenLog {
    /// Open (or create) the log at `path` and load all recorded digests.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open seen-log file: {}", path.display()))?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read seen-log file: {}", path.display()))?;
        let seen: HashSet<String> = content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        debug!("Loaded {} fingerprints from {}", seen.len(), path.display());
        Ok(Self { path, file, seen })
    }

    pub fn contains(&self, digest: &str) -> bool {
        self.seen.contains(digest)
    }

    /// Append a fingerprint to the durable log.
    ///
    /// Must be called before any side effect visible outside the pipeline:
    /// a crash right after recording loses at most the one listing, a crash
    /// before it permits reprocessing on the next run.
    pub fn record(&mut self, digest: &str) -> Result<()> {
        if !self.seen.insert(digest.to_string()) {
            // Duplicate lines in the file would be harmless, but there is
            // no reason to write them.
            return Ok(());
        }
        writeln!(self.file, "{digest}")
            .with_context(|| format!("Failed to append to seen-log file: {}", self.path.display()))?;
        self.file.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
