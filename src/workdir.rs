//! Scoped change of the process working directory.

use anyhow::Context;
use std::path::{Path, PathBuf};

/// Enters a directory and restores the previous one when dropped.
///
/// Restoration runs on every exit path, including `?` returns and panics.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct WorkingDir {
    previous: PathBuf,
}

impl WorkingDir {
    pub fn enter(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let previous = std::env::current_dir().context("Failed to read current directory")?;
        std::env::set_current_dir(path)
            .with_context(|| format!("Failed to enter {}", path.display()))?;
        log::debug!("entered {}", path.display());
        Ok(Self { previous })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            log::warn!(
                "failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
