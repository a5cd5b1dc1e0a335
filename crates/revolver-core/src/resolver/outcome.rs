use std::path::PathBuf;

/// Provenance label handed to the host with every match.
pub const MATCH_MESSAGE: &str = "Match found: source file";

/// Why a request was handed back to the host unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// Not `./`, `../`, a next-directory escape, or a container prefix.
    NotRelative,
    ExcludedPath,
    ExcludedRequest,
    /// The requesting directory is outside every directory-list entry.
    NoOwningDirectory,
    /// Every candidate directory was probed without a hit.
    Exhausted,
}

impl DeferReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRelative => "NOT_RELATIVE",
            Self::ExcludedPath => "EXCLUDED_PATH",
            Self::ExcludedRequest => "EXCLUDED_REQUEST",
            Self::NoOwningDirectory => "NO_OWNING_DIRECTORY",
            Self::Exhausted => "EXHAUSTED",
        }
    }
}

impl std::fmt::Display for DeferReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A match, expressed as the request the host should continue with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Directory-list index that matched.
    pub index: usize,
    /// New base path for the host (the matched candidate directory).
    pub path: PathBuf,
    /// Request to continue with, relative to `path`. Carries the main file
    /// name when the match was a directory-style request.
    pub request: String,
    /// The file that was found.
    pub file: PathBuf,
    /// Whether the main file was substituted.
    pub has_main_file: bool,
    /// Request after prefix rewriting, when a prefix was rewritten.
    pub rewritten_request: Option<String>,
    /// Provenance message.
    pub message: &'static str,
}

/// A pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferral {
    pub reason: DeferReason,
    /// Request after a next-directory rewrite. The host must keep using it.
    pub rewritten_request: Option<String>,
}

/// Result of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched(Resolution),
    Deferred(Deferral),
}

impl Outcome {
    pub(crate) fn deferred(reason: DeferReason) -> Self {
        Self::Deferred(Deferral {
            reason,
            rewritten_request: None,
        })
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Self::Matched(found) => Some(found),
            Self::Deferred(_) => None,
        }
    }

    /// Resolved file, if any.
    #[must_use]
    pub fn file(&self) -> Option<&PathBuf> {
        self.resolution().map(|r| &r.file)
    }

    #[must_use]
    pub fn defer_reason(&self) -> Option<DeferReason> {
        match self {
            Self::Matched(_) => None,
            Self::Deferred(deferral) => Some(deferral.reason),
        }
    }

    /// The prefix-rewritten request the host's shared record must adopt.
    #[must_use]
    pub fn rewritten_request(&self) -> Option<&str> {
        match self {
            Self::Matched(found) => found.rewritten_request.as_deref(),
            Self::Deferred(deferral) => deferral.rewritten_request.as_deref(),
        }
    }
}
