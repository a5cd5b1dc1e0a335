//! Candidate path computation: extension inference and main-file substitution.
//!
//! For one base directory the rules are, in order:
//!
//! 1. `full_dir_path = base_dir / sub_directory`
//! 2. `full_file_path = full_dir_path / request` (lexically normalized)
//! 3. a request extension that is in the configured set is kept as is;
//!    any other request gets `file_extension` appended
//! 4. only a request with no extension at all may be a directory: if
//!    `full_file_path + main_file_name + ext` is a file, the main file
//!    name is inserted before the extension
//!
//! `./Button.json` is therefore probed as `Button.json.js` and never as a
//! directory.

use super::probe::FileProbe;
use crate::config::ResolverConfig;
use revolver_util::path::{extname, join_normalized, with_suffix};
use std::path::{Path, PathBuf};

/// Candidate computed for one directory-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePathInfo {
    /// Entry path joined with the requesting sub-directory.
    pub full_dir_path: PathBuf,
    /// File to probe.
    pub full_file_path: PathBuf,
    /// Whether the request resolved to a directory's main file.
    pub has_main_file: bool,
}

/// A candidate whose main-file probe has not run yet.
///
/// Splitting here lets sync and async walkers share the path rules and
/// differ only in how they probe.
#[derive(Debug)]
pub(crate) struct CandidatePlan<'c> {
    full_dir_path: PathBuf,
    joined: PathBuf,
    effective_ext: &'c str,
    main_file_name: &'c str,
    main_file: Option<PathBuf>,
}

impl<'c> CandidatePlan<'c> {
    pub(crate) fn new(
        config: &'c ResolverConfig,
        base_dir: &Path,
        sub_directory: &Path,
        request: &str,
    ) -> Self {
        let full_dir_path = join_normalized(base_dir, sub_directory);
        let joined = join_normalized(&full_dir_path, request);

        let current_ext = extname(&joined);
        let effective_ext = match current_ext {
            Some(ext) if config.is_known_extension(ext) => "",
            _ => config.file_extension(),
        };
        let main_file = current_ext.is_none().then(|| {
            with_suffix(
                &with_suffix(&joined, config.main_file_name()),
                effective_ext,
            )
        });

        Self {
            full_dir_path,
            joined,
            effective_ext,
            main_file_name: config.main_file_name(),
            main_file,
        }
    }

    /// Main-file path to probe, for extensionless requests only.
    pub(crate) fn main_file(&self) -> Option<&Path> {
        self.main_file.as_deref()
    }

    pub(crate) fn finish(self, has_main_file: bool) -> CandidatePathInfo {
        let stem = if has_main_file {
            with_suffix(&self.joined, self.main_file_name)
        } else {
            self.joined
        };

        CandidatePathInfo {
            full_dir_path: self.full_dir_path,
            full_file_path: with_suffix(&stem, self.effective_ext),
            has_main_file,
        }
    }
}

/// Compute the candidate for `request` under `base_dir / sub_directory`.
///
/// Probes the main file for extensionless requests; does not probe the
/// returned `full_file_path`.
pub fn resolve_candidate_path<P: FileProbe + ?Sized>(
    config: &ResolverConfig,
    base_dir: &Path,
    sub_directory: &Path,
    request: &str,
    probe: &P,
) -> CandidatePathInfo {
    let plan = CandidatePlan::new(config, base_dir, sub_directory, request);
    let has_main_file = plan.main_file().is_some_and(|main| probe.is_file(main));
    plan.finish(has_main_file)
}
