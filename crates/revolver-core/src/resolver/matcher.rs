//! Request eligibility and search-range selection.

use super::outcome::DeferReason;
use super::trace::{steps, ResolveTrace, ResolveTraceStep};
use crate::config::ResolverConfig;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// The request as the host hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Module specifier (`./Button`).
    pub request: String,
    /// Absolute directory of the requesting file.
    pub path: PathBuf,
}

impl RequestContext {
    pub fn new(request: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            request: request.into(),
            path: path.into(),
        }
    }
}

/// Where the requesting file sits inside the directory list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryData {
    /// Index of the entry whose path is a prefix of the requesting directory.
    pub index: usize,
    /// Requesting directory relative to that entry.
    pub sub_directory: PathBuf,
}

/// How the search range was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Whole list from index 0.
    Full,
    /// After the owning entry (`*/Button`).
    NextDirectory,
    /// Exactly one named entry (`base/Button`).
    Pinned,
}

/// Everything the walker needs for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    /// Request to probe with (prefix already rewritten to `./`).
    pub request: String,
    /// Whether `request` differs from what the host sent.
    pub rewritten: bool,
    pub directory: DirectoryData,
    pub start: usize,
    pub end: usize,
    pub mode: SearchMode,
}

impl SearchPlan {
    /// Directory-list indices to walk. May be empty.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Matcher verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    Search(SearchPlan),
    Defer(DeferReason),
}

/// First entry (list order) whose path is a prefix of `path`.
///
/// Prefixes compare whole components rather than raw string prefixes:
/// `/app/src` owns `/app/src/widgets` but not `/app/src2`, and an entry
/// written as `/app/src/` owns the same directories as `/app/src`.
#[must_use]
pub fn find_owning_directory(config: &ResolverConfig, path: &Path) -> Option<DirectoryData> {
    config
        .directory_list()
        .iter()
        .enumerate()
        .find_map(|(index, entry)| {
            path.strip_prefix(&entry.path)
                .ok()
                .map(|rest| DirectoryData {
                    index,
                    sub_directory: rest.to_path_buf(),
                })
        })
}

/// Decide whether `ctx` is ours and which entries to search.
#[must_use]
pub fn match_request(config: &ResolverConfig, ctx: &RequestContext) -> MatchDecision {
    match_request_traced(config, ctx, &mut ResolveTrace::disabled())
}

enum Syntax<'r> {
    Relative,
    NextDirectory(&'r str),
    Container(usize, &'r str),
}

fn classify<'r>(config: &ResolverConfig, request: &'r str) -> Option<Syntax<'r>> {
    if let Some(rest) = request.strip_prefix(config.next_directory_prefix()) {
        return Some(Syntax::NextDirectory(rest));
    }
    if request.starts_with("./") || request.starts_with("../") {
        return Some(Syntax::Relative);
    }
    config
        .directory_list()
        .iter()
        .enumerate()
        .find_map(|(index, entry)| {
            let name = entry.name.as_deref()?;
            let rest = request.strip_prefix(name)?.strip_prefix('/')?;
            Some(Syntax::Container(index, rest))
        })
}

pub(crate) fn match_request_traced(
    config: &ResolverConfig,
    ctx: &RequestContext,
    trace: &mut ResolveTrace,
) -> MatchDecision {
    let Some(syntax) = classify(config, &ctx.request) else {
        trace.failure(
            steps::MATCH_REQUEST,
            format!("Not a relative request: {}", ctx.request),
        );
        return MatchDecision::Defer(DeferReason::NotRelative);
    };
    trace.success(steps::MATCH_REQUEST, format!("Request: {}", ctx.request));

    if config.exclude_path().is_match(&ctx.path.to_string_lossy()) {
        trace.record(|| {
            ResolveTraceStep::new(
                steps::CHECK_EXCLUDES,
                false,
                format!(
                    "Requesting path matches excludePath `{}`",
                    config.exclude_path().as_str()
                ),
            )
            .with_path(&ctx.path)
        });
        return MatchDecision::Defer(DeferReason::ExcludedPath);
    }
    if config.exclude_request().is_match(&ctx.request) {
        trace.failure(
            steps::CHECK_EXCLUDES,
            format!(
                "Request matches excludeRequest `{}`",
                config.exclude_request().as_str()
            ),
        );
        return MatchDecision::Defer(DeferReason::ExcludedRequest);
    }
    trace.success(steps::CHECK_EXCLUDES, "Not excluded");

    let Some(directory) = find_owning_directory(config, &ctx.path) else {
        trace.record(|| {
            ResolveTraceStep::new(
                steps::FIND_OWNING_DIRECTORY,
                false,
                "Requesting directory is outside every directory-list entry",
            )
            .with_path(&ctx.path)
        });
        return MatchDecision::Defer(DeferReason::NoOwningDirectory);
    };
    trace.record(|| {
        ResolveTraceStep::new(
            steps::FIND_OWNING_DIRECTORY,
            true,
            format!("Owned by entry {}", directory.index),
        )
        .with_path(&config.directory_list()[directory.index].path)
        .with_index(directory.index)
    });

    let len = config.directory_list().len();
    let plan = match syntax {
        Syntax::Relative => SearchPlan {
            request: ctx.request.clone(),
            rewritten: false,
            directory,
            start: 0,
            end: len,
            mode: SearchMode::Full,
        },
        Syntax::NextDirectory(rest) => {
            let start = directory.index + 1;
            trace.record(|| {
                ResolveTraceStep::new(
                    steps::NEXT_DIRECTORY,
                    start < len,
                    format!("Searching from entry {start}"),
                )
                .with_index(start)
            });
            SearchPlan {
                request: format!("./{rest}"),
                rewritten: true,
                directory,
                start,
                end: len,
                mode: SearchMode::NextDirectory,
            }
        }
        Syntax::Container(index, rest) => {
            trace.record(|| {
                ResolveTraceStep::new(
                    steps::CONTAINER_PREFIX,
                    true,
                    format!("Pinned to entry {index}"),
                )
                .with_path(&config.directory_list()[index].path)
                .with_index(index)
            });
            SearchPlan {
                request: format!("./{rest}"),
                rewritten: true,
                directory,
                start: index,
                end: index + 1,
                mode: SearchMode::Pinned,
            }
        }
    };

    MatchDecision::Search(plan)
}
