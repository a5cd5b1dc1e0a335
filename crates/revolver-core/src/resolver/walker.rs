//! Ordered probing of candidate directories.
//!
//! Indices are visited strictly ascending from `range.start`, one probe at a
//! time, and the first hit wins. The walk ends after at most
//! `range.len()` entries.

use super::candidate::{CandidatePathInfo, CandidatePlan};
use super::probe::{AsyncFileProbe, FileProbe};
use super::trace::{steps, ResolveTrace, ResolveTraceStep};
use crate::config::{DirectoryEntry, ResolverConfig};
use std::ops::Range;
use std::path::Path;

/// The entry that produced a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedDirectory {
    pub index: usize,
    pub candidate: CandidatePathInfo,
}

/// Walk `range` of the directory list looking for `request`.
///
/// Out-of-range indices are skipped, so an empty or past-the-end range
/// returns `None` without probing.
pub fn walk<P: FileProbe + ?Sized>(
    config: &ResolverConfig,
    range: Range<usize>,
    sub_directory: &Path,
    request: &str,
    probe: &P,
) -> Option<MatchedDirectory> {
    walk_traced(
        config,
        range,
        sub_directory,
        request,
        probe,
        &mut ResolveTrace::disabled(),
    )
}

pub(crate) fn walk_traced<P: FileProbe + ?Sized>(
    config: &ResolverConfig,
    range: Range<usize>,
    sub_directory: &Path,
    request: &str,
    probe: &P,
    trace: &mut ResolveTrace,
) -> Option<MatchedDirectory> {
    for (index, entry) in entries_in(config, &range) {
        let plan = CandidatePlan::new(config, &entry.path, sub_directory, request);

        let has_main_file = match plan.main_file() {
            Some(main) => {
                let hit = probe.is_file(main);
                trace.record(|| probe_step(steps::PROBE_MAIN_FILE, hit, index, main));
                hit
            }
            None => false,
        };

        let candidate = plan.finish(has_main_file);
        // A main-file hit already is the probe of `full_file_path`.
        let hit = has_main_file || probe.is_file(&candidate.full_file_path);
        if !has_main_file {
            trace.record(|| {
                probe_step(steps::PROBE_CANDIDATE, hit, index, &candidate.full_file_path)
            });
        }

        if hit {
            return Some(MatchedDirectory { index, candidate });
        }
    }

    None
}

/// Async walk. Each probe is awaited before the next one starts.
pub async fn walk_async<A: AsyncFileProbe + ?Sized>(
    config: &ResolverConfig,
    range: Range<usize>,
    sub_directory: &Path,
    request: &str,
    probe: &A,
) -> Option<MatchedDirectory> {
    for (index, entry) in entries_in(config, &range) {
        let plan = CandidatePlan::new(config, &entry.path, sub_directory, request);

        let has_main_file = match plan.main_file() {
            Some(main) => probe.is_file_async(main).await,
            None => false,
        };

        let candidate = plan.finish(has_main_file);
        if has_main_file || probe.is_file_async(&candidate.full_file_path).await {
            return Some(MatchedDirectory { index, candidate });
        }
    }

    None
}

fn entries_in<'c>(
    config: &'c ResolverConfig,
    range: &Range<usize>,
) -> impl Iterator<Item = (usize, &'c DirectoryEntry)> {
    config
        .directory_list()
        .iter()
        .enumerate()
        .skip(range.start)
        .take(range.end.saturating_sub(range.start))
}

fn probe_step(step: &'static str, hit: bool, index: usize, path: &Path) -> ResolveTraceStep {
    let detail = if hit { "File exists" } else { "Not a file" };
    ResolveTraceStep::new(step, hit, detail)
        .with_path(path)
        .with_index(index)
}
