//! Filesystem probes.
//!
//! The walker never touches the filesystem directly; it asks a probe whether a
//! candidate path is a regular file. Errors are folded into `false`.

use futures::future::{self, BoxFuture, FutureExt};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Synchronous "is this a regular file" check.
pub trait FileProbe: Send + Sync {
    /// Return `true` only for an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Asynchronous counterpart of [`FileProbe`].
pub trait AsyncFileProbe: Send + Sync {
    /// Resolve to `true` only for an existing regular file.
    fn is_file_async<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool>;
}

/// Probe backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl FileProbe for OsProbe {
    fn is_file(&self, path: &Path) -> bool {
        revolver_util::fs::is_regular_file(path)
    }
}

/// Probe backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProbe;

impl AsyncFileProbe for TokioProbe {
    fn is_file_async<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        async move {
            tokio::fs::metadata(path)
                .await
                .is_ok_and(|meta| meta.is_file())
        }
        .boxed()
    }
}

/// In-memory probe over a fixed set of files.
///
/// Records every probed path in order, which lets callers assert on probe
/// ordering and on the absence of filesystem access.
#[derive(Debug, Default)]
pub struct MemoryProbe {
    files: BTreeSet<PathBuf>,
    probed: Mutex<Vec<PathBuf>>,
}

impl MemoryProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    /// Add several files.
    #[must_use]
    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Paths probed so far, in order.
    #[must_use]
    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Forget recorded probes.
    pub fn clear_probed(&self) {
        if let Ok(mut log) = self.probed.lock() {
            log.clear();
        }
    }

    fn record(&self, path: &Path) -> bool {
        if let Ok(mut log) = self.probed.lock() {
            log.push(path.to_path_buf());
        }
        self.files.contains(path)
    }
}

impl FileProbe for MemoryProbe {
    fn is_file(&self, path: &Path) -> bool {
        self.record(path)
    }
}

impl AsyncFileProbe for MemoryProbe {
    fn is_file_async<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, bool> {
        future::ready(self.record(path)).boxed()
    }
}
