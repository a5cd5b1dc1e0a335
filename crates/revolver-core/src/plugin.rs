//! Host-facing hook interface.
//!
//! A host resolver runs its plugins at a "before resolve" point. Each plugin
//! either declines (`Continue`) or hands a parsed request to the host's
//! "parsed resolve" continuation, which skips the plugins and cannot recurse.
//!
//! ```ignore
//! use revolver_core::plugin::{HookAction, HookResult, ResolvePlugin, ResolveRequest};
//!
//! struct Alias;
//!
//! impl ResolvePlugin for Alias {
//!     fn name(&self) -> &str { "alias" }
//!
//!     fn before_resolve(&self, req: &mut ResolveRequest) -> HookResult<HookAction> {
//!         if let Some(rest) = req.request.strip_prefix("@/") {
//!             req.request = format!("./{rest}");
//!         }
//!         Ok(HookAction::Continue)
//!     }
//! }
//! ```

use crate::config::ResolverConfig;
use crate::resolver::{FileProbe, OsProbe, Outcome, RequestContext, Revolver};
use std::path::PathBuf;
use thiserror::Error;

/// Hook name reported in [`PluginError`].
pub const BEFORE_RESOLVE_HOOK: &str = "before_resolve";

/// Result type for plugin hooks.
pub type HookResult<T> = Result<T, PluginError>;

/// Error from a plugin.
#[derive(Debug, Error)]
#[error("[{plugin}] {hook}: {message}")]
pub struct PluginError {
    /// Plugin name that caused the error.
    pub plugin: String,
    /// Hook that failed.
    pub hook: &'static str,
    pub message: String,
}

impl PluginError {
    pub fn before_resolve(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            hook: BEFORE_RESOLVE_HOOK,
            message: message.into(),
        }
    }
}

/// Plugin enforcement ordering.
///
/// Controls where a plugin runs relative to others in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PluginEnforce {
    /// Runs before normal plugins.
    Pre,
    #[default]
    Normal,
    /// Runs after normal plugins.
    Post,
}

/// The shared per-request record.
///
/// Plugins may rewrite `request` in place; later plugins and the
/// continuation see the rewritten value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub request: String,
    /// Directory the request is resolved from.
    pub path: PathBuf,
    /// Provenance label attached by the plugin that handed off.
    pub message: Option<String>,
}

impl ResolveRequest {
    pub fn new(request: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            request: request.into(),
            path: path.into(),
            message: None,
        }
    }
}

/// What the host does after a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Decline; the next plugin (or the continuation) sees the request.
    Continue,
    /// Resolve this request with the parsed-resolve continuation.
    Handoff(ResolveRequest),
}

/// A "before resolve" plugin.
pub trait ResolvePlugin: Send + Sync {
    fn name(&self) -> &str;

    fn enforce(&self) -> PluginEnforce {
        PluginEnforce::Normal
    }

    fn before_resolve(&self, request: &mut ResolveRequest) -> HookResult<HookAction>;
}

/// Directory-fallback resolution as a host plugin.
#[derive(Debug)]
pub struct RevolverPlugin<P: FileProbe = OsProbe> {
    revolver: Revolver,
    probe: P,
}

impl RevolverPlugin {
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_probe(config, OsProbe)
    }
}

impl<P: FileProbe> RevolverPlugin<P> {
    pub fn with_probe(config: ResolverConfig, probe: P) -> Self {
        Self {
            revolver: Revolver::new(config),
            probe,
        }
    }
}

impl<P: FileProbe> ResolvePlugin for RevolverPlugin<P> {
    fn name(&self) -> &str {
        "revolver"
    }

    fn enforce(&self) -> PluginEnforce {
        PluginEnforce::Pre
    }

    fn before_resolve(&self, request: &mut ResolveRequest) -> HookResult<HookAction> {
        let ctx = RequestContext::new(request.request.clone(), request.path.clone());
        let outcome = self.revolver.resolve_with(&ctx, &self.probe);

        // A next-directory rewrite sticks even when the walk comes up empty.
        if let Some(rewritten) = outcome.rewritten_request() {
            request.request = rewritten.to_string();
        }

        Ok(match outcome {
            Outcome::Matched(found) => HookAction::Handoff(ResolveRequest {
                request: found.request,
                path: found.path,
                message: Some(found.message.to_string()),
            }),
            Outcome::Deferred(_) => HookAction::Continue,
        })
    }
}
