//! Scoped temporary artifacts for uploaded audio.
//!
//! A [`TempArtifact`] is a uniquely named file on disk whose lifetime is
//! bound to one in-flight request. Deletion happens in `Drop`, so the file
//! is removed on every exit path of the owning scope: success, error return,
//! and panic/unwind. Deletion failures are logged and never propagated —
//! by the time the artifact is released the response already reflects the
//! transcription outcome.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// A temporary on-disk file owned by exactly one request.
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Create a new empty artifact in `dir`, tagged with `extension`.
    ///
    /// The name embeds a v4 UUID and the file is opened with `create_new`,
    /// so concurrent acquisitions cannot collide on a path.
    pub fn create(dir: &Path, extension: &str) -> io::Result<Self> {
        let path = dir.join(format!("upload-{}.{}", Uuid::new_v4(), extension));
        OpenOptions::new().write(true).create_new(true).open(&path)?;
        debug!(path = %path.display(), "created temp artifact");
        Ok(Self { path })
    }

    /// Write the full uploaded byte buffer into the artifact.
    pub fn write(&self, contents: &[u8]) -> io::Result<()> {
        fs::write(&self.path, contents)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "temp artifact removed"),
            // Already gone: nothing left to clean up.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to delete temp artifact"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn test_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("artifact-test-{tag}-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_create_write_read_back() {
        let dir = test_dir("rw");
        let artifact = TempArtifact::create(&dir, "wav").unwrap();
        artifact.write(b"fake audio bytes").unwrap();
        let read = fs::read(artifact.path()).unwrap();
        assert_eq!(read, b"fake audio bytes");
        assert!(artifact.path().to_string_lossy().ends_with(".wav"));
        drop(artifact);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = test_dir("drop");
        let path = {
            let artifact = TempArtifact::create(&dir, "mp3").unwrap();
            artifact.write(b"bytes").unwrap();
            let path = artifact.path().to_path_buf();
            assert!(path.exists());
            path
        };
        assert!(!path.exists(), "artifact must be unlinked on drop");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_drop_runs_on_panic() {
        let dir = test_dir("panic");
        let path = Arc::new(Mutex::new(PathBuf::new()));
        let path_clone = Arc::clone(&path);
        let dir_clone = dir.clone();
        let result = std::panic::catch_unwind(move || {
            let artifact = TempArtifact::create(&dir_clone, "wav").unwrap();
            *path_clone.lock().unwrap() = artifact.path().to_path_buf();
            panic!("simulated processing failure");
        });
        assert!(result.is_err());
        assert!(
            !path.lock().unwrap().exists(),
            "artifact must be unlinked even when the owning scope panics"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_drop_tolerates_already_deleted_file() {
        let dir = test_dir("gone");
        let artifact = TempArtifact::create(&dir, "m4a").unwrap();
        fs::remove_file(artifact.path()).unwrap();
        // Must not panic
        drop(artifact);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sequential_acquisitions_never_collide() {
        let dir = test_dir("unique");
        let mut paths = HashSet::new();
        let artifacts: Vec<_> = (0..32)
            .map(|_| TempArtifact::create(&dir, "wav").unwrap())
            .collect();
        for artifact in &artifacts {
            assert!(paths.insert(artifact.path().to_path_buf()));
        }
        assert_eq!(paths.len(), 32);
        drop(artifacts);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_concurrent_acquisitions_never_collide() {
        let dir = test_dir("concurrent");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dir = dir.clone();
                thread::spawn(move || {
                    let artifact = TempArtifact::create(&dir, "mp3").unwrap();
                    artifact.path().to_path_buf()
                })
            })
            .collect();
        let paths: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(paths.len(), 8, "each concurrent acquisition gets its own path");
        fs::remove_dir_all(&dir).unwrap();
    }
}
