//! The write side of a release: an abstraction over "where do rendered
//! pixels, label text and metadata land", so the
//! orchestrator and its tests don't depend on a real filesystem.

use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Everything the orchestrator needs to materialize a release. A
/// `SinkFailed` from any method aborts only the variant that triggered it;
/// whether the whole release continues is caller policy.
pub trait FileSink: Send + Sync {
    fn ensure_dir(&self, path: &Path) -> Result<()>;
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()>;
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
    /// Unlinks a partially written file; used to clean up after a
    /// cancelled or failed variant.
    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// The production `FileSink`: plain filesystem writes rooted at
/// `release_root`.
pub struct FsSink {
    pub release_root: PathBuf,
}

impl FsSink {
    pub fn new(release_root: impl Into<PathBuf>) -> Self {
        Self { release_root: release_root.into() }
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.release_root.join(relative)
    }
}

impl FileSink for FsSink {
    fn ensure_dir(&self, path: &Path) -> Result<()> {
        let full = self.resolve(path);
        std::fs::create_dir_all(&full)
            .map_err(|source| ReleaseError::SinkFailed { path: full.display().to_string(), source })
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let full = self.resolve(path);
        let to_sink_failed = |source: std::io::Error| ReleaseError::SinkFailed {
            path: full.display().to_string(),
            source,
        };
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(to_sink_failed)?;
        }
        std::fs::write(&full, bytes).map_err(to_sink_failed)
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        self.write_bytes(path, text.as_bytes())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let full = self.resolve(path);
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ReleaseError::SinkFailed { path: full.display().to_string(), source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_remove_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path());
        let rel = Path::new("images/train/a.jpg");
        sink.write_bytes(rel, b"hello").unwrap();
        assert!(sink.resolve(rel).exists());
        sink.remove_file(rel).unwrap();
        assert!(!sink.resolve(rel).exists());
    }

    #[test]
    fn remove_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path());
        assert!(sink.remove_file(Path::new("nothing.txt")).is_ok());
    }
}
