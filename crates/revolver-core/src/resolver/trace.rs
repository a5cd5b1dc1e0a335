//! Resolution tracing for `revolver explain`.
//!
//! Records each decision the resolver makes for one request: eligibility,
//! the owning directory, every candidate probed, and the final outcome.

use serde::Serialize;
use std::path::PathBuf;

/// Schema version for the explain output format.
/// Bump when the trace structure changes incompatibly.
pub const EXPLAIN_SCHEMA_VERSION: u32 = 1;

/// A single step in the resolution trace.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveTraceStep {
    /// Step name (see [`steps`]).
    pub step: &'static str,
    /// Whether this step succeeded
    pub ok: bool,
    /// Human-readable description of what happened
    pub detail: String,
    /// File path involved in this step, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Directory-list index involved in this step, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ResolveTraceStep {
    pub fn new(step: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok,
            detail: detail.into(),
            path: None,
            index: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Ordered resolution trace.
///
/// A disabled trace drops every step, so untraced resolution shares the
/// traced code path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveTrace {
    pub steps: Vec<ResolveTraceStep>,
    #[serde(skip)]
    enabled: bool,
}

impl ResolveTrace {
    /// Create a recording trace.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            enabled: true,
        }
    }

    /// Create a trace that records nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Add a step built lazily, only when recording.
    pub fn record(&mut self, step: impl FnOnce() -> ResolveTraceStep) {
        if self.enabled {
            self.steps.push(step());
        }
    }

    pub fn success(&mut self, step: &'static str, detail: impl Into<String>) {
        if self.enabled {
            self.steps.push(ResolveTraceStep::new(step, true, detail));
        }
    }

    pub fn failure(&mut self, step: &'static str, detail: impl Into<String>) {
        if self.enabled {
            self.steps.push(ResolveTraceStep::new(step, false, detail));
        }
    }

    /// Step names in order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step).collect()
    }
}

/// Step names used in resolution tracing.
pub mod steps {
    pub const MATCH_REQUEST: &str = "match_request";
    pub const CHECK_EXCLUDES: &str = "check_excludes";
    pub const FIND_OWNING_DIRECTORY: &str = "find_owning_directory";
    pub const NEXT_DIRECTORY: &str = "next_directory";
    pub const CONTAINER_PREFIX: &str = "container_prefix";
    pub const PROBE_MAIN_FILE: &str = "probe_main_file";
    pub const PROBE_CANDIDATE: &str = "probe_candidate";
    pub const FINAL_PATH: &str = "final_path";
    pub const DEFER: &str = "defer";
}
