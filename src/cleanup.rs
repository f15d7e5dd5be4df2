use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// RAII guard for an in-progress download.
///
/// The file at `path` is removed when the guard drops, unless the operation
/// calls [`PartialFile::success`] first.
pub struct PartialFile<'a, R: Runtime + ?Sized> {
    runtime: &'a R,
    path: PathBuf,
    armed: bool,
}

impl<'a, R: Runtime + ?Sized> PartialFile<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self {
            runtime,
            path,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mark the file as finished; it will no longer be removed.
    pub fn success(mut self) {
        self.armed = false;
    }
}

impl<R: Runtime + ?Sized> Drop for PartialFile<'_, R> {
    fn drop(&mut self) {
        if !self.armed || !self.runtime.exists(&self.path) {
            return;
        }
        debug!("Cleaning up: {:?}", self.path);
        if let Err(e) = self.runtime.remove_file(&self.path) {
            warn!("Failed to remove partial download {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_removed_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qp.part");
        fs::write(&path, "half").unwrap();

        {
            let _guard = PartialFile::new(&RealRuntime, path.clone());
        }

        assert!(!path.exists());
    }

    #[test]
    fn test_partial_file_kept_after_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qp.part");
        fs::write(&path, "whole").unwrap();

        let guard = PartialFile::new(&RealRuntime, path.clone());
        assert_eq!(guard.path(), path.as_path());
        guard.success();

        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_never_created() {
        // Nothing on disk: drop must not attempt a removal
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/tmp/qp.part")))
            .returning(|_| false);

        let _guard = PartialFile::new(&runtime, PathBuf::from("/tmp/qp.part"));
    }

    #[test]
    fn test_partial_file_removal_failure_is_logged_not_raised() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_remove_file()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("busy")));

        let _guard = PartialFile::new(&runtime, PathBuf::from("/tmp/qp.part"));
    }
}
