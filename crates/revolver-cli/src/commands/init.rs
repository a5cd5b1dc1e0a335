//! `revolver init` command implementation.
//!
//! Writes a starter `revolver.json` listing the project's `src` directory.
//! An existing file is kept unless `--force` is given.

use miette::{IntoDiagnostic, Result};
use revolver_core::config::{
    DirectoryEntryOption, RevolverOptions, CONFIG_FILE_NAME, DEFAULT_EXCLUDE,
    DEFAULT_FILE_EXTENSION, DEFAULT_MAIN_FILE_NAME, DEFAULT_NEXT_DIRECTORY_PREFIX,
};
use revolver_util::fs::atomic_write;
use std::path::Path;

/// Starter options with every default spelled out.
fn starter_options() -> RevolverOptions {
    RevolverOptions {
        exclude_path: Some(DEFAULT_EXCLUDE.to_string()),
        exclude_request: Some(DEFAULT_EXCLUDE.to_string()),
        file_extension: Some(DEFAULT_FILE_EXTENSION.to_string()),
        next_directory_prefix: Some(DEFAULT_NEXT_DIRECTORY_PREFIX.to_string()),
        main_file_name: Some(DEFAULT_MAIN_FILE_NAME.to_string()),
        ..RevolverOptions::with_directories(vec![DirectoryEntryOption::Path("./src".to_string())])
    }
}

pub fn run(cwd: &Path, force: bool, json: bool) -> Result<()> {
    let path = cwd.join(CONFIG_FILE_NAME);
    let existed = path.exists();

    if existed && !force {
        return Err(miette::miette!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let mut contents = serde_json::to_string_pretty(&starter_options()).into_diagnostic()?;
    contents.push('\n');
    atomic_write(&path, contents.as_bytes())
        .map_err(|e| miette::miette!("Failed to write {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), overwritten = existed, "Wrote config");

    if json {
        let output = serde_json::json!({
            "ok": true,
            "path": path.display().to_string(),
            "overwritten": existed,
        });
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("Created {}", path.display());
    }

    Ok(())
}
