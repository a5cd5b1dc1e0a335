#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod plugin;
pub mod resolver;
pub mod version;

pub use config::{discover, DirectoryEntry, ResolverConfig, RevolverOptions, CONFIG_FILE_NAME};
pub use error::Error;
pub use pipeline::{ResolveError, Resolved, ResolverPipeline};
pub use plugin::{HookAction, PluginEnforce, ResolvePlugin, ResolveRequest, RevolverPlugin};
pub use resolver::{DeferReason, Outcome, RequestContext, Revolver};
pub use version::VERSION;
