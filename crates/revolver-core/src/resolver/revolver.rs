//! The directory-fallback resolver: matcher, walker, and handoff composed.

use super::matcher::{match_request_traced, MatchDecision, RequestContext, SearchMode, SearchPlan};
use super::outcome::{DeferReason, Deferral, Outcome, Resolution, MATCH_MESSAGE};
use super::probe::{AsyncFileProbe, FileProbe, OsProbe, TokioProbe};
use super::trace::{steps, ResolveTrace, ResolveTraceStep};
use super::walker::{walk_async, walk_traced, MatchedDirectory};
use crate::config::ResolverConfig;

/// Outcome plus the steps that led to it.
#[derive(Debug, Clone)]
pub struct OutcomeWithTrace {
    pub outcome: Outcome,
    pub trace: ResolveTrace,
}

/// Directory-fallback resolver.
///
/// Holds only read-only configuration; one instance can serve any number of
/// concurrent requests (`Revolver: Send + Sync`).
#[derive(Debug, Clone)]
pub struct Revolver {
    config: ResolverConfig,
}

impl Revolver {
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve against the real filesystem.
    #[must_use]
    pub fn resolve(&self, ctx: &RequestContext) -> Outcome {
        self.resolve_with(ctx, &OsProbe)
    }

    /// Resolve with an injected probe.
    pub fn resolve_with<P: FileProbe + ?Sized>(&self, ctx: &RequestContext, probe: &P) -> Outcome {
        self.run(ctx, probe, &mut ResolveTrace::disabled())
    }

    /// Resolve and record every step.
    pub fn resolve_with_trace<P: FileProbe + ?Sized>(
        &self,
        ctx: &RequestContext,
        probe: &P,
    ) -> OutcomeWithTrace {
        let mut trace = ResolveTrace::new();
        let outcome = self.run(ctx, probe, &mut trace);
        OutcomeWithTrace { outcome, trace }
    }

    /// Resolve against the filesystem through `tokio::fs`.
    pub async fn resolve_async(&self, ctx: &RequestContext) -> Outcome {
        self.resolve_async_with(ctx, &TokioProbe).await
    }

    /// Async resolve with an injected probe. Probes run one at a time.
    pub async fn resolve_async_with<A: AsyncFileProbe + ?Sized>(
        &self,
        ctx: &RequestContext,
        probe: &A,
    ) -> Outcome {
        let plan = match match_request_traced(&self.config, ctx, &mut ResolveTrace::disabled()) {
            MatchDecision::Search(plan) => plan,
            MatchDecision::Defer(reason) => return Outcome::deferred(reason),
        };

        let matched = walk_async(
            &self.config,
            plan.range(),
            &plan.directory.sub_directory,
            &plan.request,
            probe,
        )
        .await;

        self.handoff(plan, matched)
    }

    fn run<P: FileProbe + ?Sized>(
        &self,
        ctx: &RequestContext,
        probe: &P,
        trace: &mut ResolveTrace,
    ) -> Outcome {
        let plan = match match_request_traced(&self.config, ctx, trace) {
            MatchDecision::Search(plan) => plan,
            MatchDecision::Defer(reason) => {
                trace.failure(steps::DEFER, format!("Deferred: {reason}"));
                return Outcome::deferred(reason);
            }
        };

        let matched = walk_traced(
            &self.config,
            plan.range(),
            &plan.directory.sub_directory,
            &plan.request,
            probe,
            trace,
        );

        let outcome = self.handoff(plan, matched);
        match &outcome {
            Outcome::Matched(found) => trace.record(|| {
                ResolveTraceStep::new(steps::FINAL_PATH, true, found.message)
                    .with_path(&found.file)
                    .with_index(found.index)
            }),
            Outcome::Deferred(deferral) => {
                trace.failure(steps::DEFER, format!("Deferred: {}", deferral.reason));
            }
        }
        outcome
    }

    /// Turn the walk result into what the host continues with.
    fn handoff(&self, plan: SearchPlan, matched: Option<MatchedDirectory>) -> Outcome {
        let rewritten_request = plan.rewritten.then(|| plan.request.clone());

        // A pinned `name/rest` request only means something to this resolver,
        // so on exhaustion the host keeps the original specifier.
        let Some(MatchedDirectory { index, candidate }) = matched else {
            return Outcome::Deferred(Deferral {
                reason: DeferReason::Exhausted,
                rewritten_request: rewritten_request
                    .filter(|_| plan.mode == SearchMode::NextDirectory),
            });
        };

        let request = if candidate.has_main_file {
            format!("{}{}", plan.request, self.config.main_file_name())
        } else {
            plan.request
        };

        Outcome::Matched(Resolution {
            index,
            path: candidate.full_dir_path,
            request,
            file: candidate.full_file_path,
            has_main_file: candidate.has_main_file,
            rewritten_request,
            message: MATCH_MESSAGE,
        })
    }
}
