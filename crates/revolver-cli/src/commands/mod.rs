pub mod explain;
pub mod init;
pub mod resolve;
pub mod version;

use miette::{IntoDiagnostic, Result};
use revolver_core::config::{discover, ResolverConfig};
use revolver_util::path::join_normalized;
use std::path::{Path, PathBuf};

/// A request plus the config it is resolved under.
pub struct RequestInput {
    pub request: String,
    /// Requesting directory, absolute.
    pub from: PathBuf,
    pub config_path: PathBuf,
    pub config: ResolverConfig,
}

impl RequestInput {
    /// Resolve `from` and locate the config.
    ///
    /// An explicit config path (flag or `REVOLVER_CONFIG`) wins over
    /// discovery from the working directory.
    pub fn new(
        cwd: &Path,
        request: String,
        from: Option<PathBuf>,
        config: Option<PathBuf>,
    ) -> Result<Self> {
        let from = absolute(cwd, from.as_deref().unwrap_or(Path::new(".")));

        let (config_path, config) = match config {
            Some(path) => {
                let path = absolute(cwd, &path);
                tracing::debug!(path = %path.display(), "Loading config");
                let config = ResolverConfig::load(&path).into_diagnostic()?;
                (path, config)
            }
            None => {
                let (path, config) = discover(cwd).into_diagnostic()?;
                tracing::debug!(path = %path.display(), "Discovered config");
                (path, config)
            }
        };

        Ok(Self {
            request,
            from,
            config_path,
            config,
        })
    }
}

/// Absolute, canonical when the path exists.
fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        join_normalized(path, "")
    } else {
        join_normalized(cwd, path)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}
