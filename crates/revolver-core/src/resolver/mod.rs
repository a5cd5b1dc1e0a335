//! Directory-fallback module resolution.
//!
//! A relative request is looked up in an ordered list of root directories,
//! keeping the requester's position relative to the root that owns it. The
//! first directory holding a matching file wins; otherwise the request is
//! deferred to the host.

mod candidate;
mod matcher;
mod outcome;
mod probe;
mod revolver;
pub mod trace;
mod walker;

pub use candidate::{resolve_candidate_path, CandidatePathInfo};
pub use matcher::{
    find_owning_directory, match_request, DirectoryData, MatchDecision, RequestContext,
    SearchMode, SearchPlan,
};
pub use outcome::{DeferReason, Deferral, Outcome, Resolution, MATCH_MESSAGE};
pub use probe::{AsyncFileProbe, FileProbe, MemoryProbe, OsProbe, TokioProbe};
pub use revolver::{OutcomeWithTrace, Revolver};
pub use trace::{steps as trace_steps, ResolveTrace, ResolveTraceStep, EXPLAIN_SCHEMA_VERSION};
pub use walker::{walk, walk_async, MatchedDirectory};
