//! A minimal host resolver: ordered plugins followed by a parsed-resolve
//! continuation.
//!
//! The continuation tries `path/request` as an exact file, then with each
//! extension, then as a directory main file. It never re-enters the
//! plugins, so a plugin handing off cannot recurse.

use crate::config::ResolverConfig;
use crate::plugin::{HookAction, ResolvePlugin, ResolveRequest};
use crate::resolver::{FileProbe, OsProbe};
use revolver_util::path::{join_normalized, with_suffix};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions the continuation probes, in order.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".json"];

/// Name reported as [`Resolved::source`] when no plugin handed off.
pub const PARSED_RESOLVE: &str = "parsed-resolve";

const INDEX_FILE: &str = "/index";

/// Host-level resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Cannot resolve '{specifier}' from '{from}': {message}")]
    NotFound {
        specifier: String,
        from: String,
        message: String,
    },
    #[error(transparent)]
    Plugin(#[from] crate::plugin::PluginError),
}

/// A resolved module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    /// Plugin that handed off, or [`PARSED_RESOLVE`].
    pub source: String,
    /// Provenance label from the handing-off plugin.
    pub message: Option<String>,
}

/// Ordered plugins plus the parsed-resolve continuation.
pub struct ResolverPipeline<P: FileProbe = OsProbe> {
    plugins: Vec<Box<dyn ResolvePlugin>>,
    extensions: Vec<String>,
    probe: P,
}

impl Default for ResolverPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(OsProbe)
    }
}

impl<P: FileProbe> ResolverPipeline<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            plugins: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            probe,
        }
    }

    /// Add a plugin. Plugins run by `enforce`, then in insertion order.
    pub fn plugin(mut self, plugin: impl ResolvePlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self.plugins.sort_by_key(|p| p.enforce());
        self
    }

    /// Replace the continuation's extension list.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Put the resolver's extensions ahead of the current list, so a file
    /// the plugin matched with a custom `fileExtension` is found again.
    pub fn with_config_extensions(mut self, config: &ResolverConfig) -> Self {
        let mut extensions: Vec<String> = config
            .known_extensions()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        for ext in self.extensions {
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        self.extensions = extensions;
        self
    }

    /// Plugin names in run order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Resolve `specifier` from the directory `from`.
    pub fn resolve(&self, specifier: &str, from: &Path) -> Result<Resolved, ResolveError> {
        let mut request = ResolveRequest::new(specifier, from);

        for plugin in &self.plugins {
            let HookAction::Handoff(target) = plugin.before_resolve(&mut request)? else {
                continue;
            };
            let Some(path) = self.parsed_resolve(&target) else {
                return Err(not_found(
                    specifier,
                    from,
                    format!("'{}' handed off a missing file", plugin.name()),
                ));
            };
            return Ok(Resolved {
                path,
                source: plugin.name().to_string(),
                message: target.message,
            });
        }

        self.parsed_resolve(&request)
            .map(|path| Resolved {
                path,
                source: PARSED_RESOLVE.to_string(),
                message: None,
            })
            .ok_or_else(|| not_found(specifier, from, "No matching file"))
    }

    fn parsed_resolve(&self, request: &ResolveRequest) -> Option<PathBuf> {
        let base = join_normalized(&request.path, &request.request);
        if self.probe.is_file(&base) {
            return Some(base);
        }

        let index = with_suffix(&base, INDEX_FILE);
        for stem in [&base, &index] {
            let hit = self
                .extensions
                .iter()
                .map(|ext| with_suffix(stem, ext))
                .find(|candidate| self.probe.is_file(candidate));
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

fn not_found(specifier: &str, from: &Path, message: impl Into<String>) -> ResolveError {
    ResolveError::NotFound {
        specifier: specifier.to_string(),
        from: from.display().to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DirectoryEntry;
    use crate::plugin::{HookResult, PluginEnforce, PluginError, RevolverPlugin};
    use crate::resolver::{MemoryProbe, MATCH_MESSAGE};
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    struct Named(&'static str, PluginEnforce);

    impl ResolvePlugin for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn enforce(&self) -> PluginEnforce {
            self.1
        }

        fn before_resolve(&self, _request: &mut ResolveRequest) -> HookResult<HookAction> {
            Ok(HookAction::Continue)
        }
    }

    struct Failing;

    impl ResolvePlugin for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn before_resolve(&self, _request: &mut ResolveRequest) -> HookResult<HookAction> {
            Err(PluginError::before_resolve("failing", "boom"))
        }
    }

    fn config() -> ResolverConfig {
        ResolverConfig::new(vec![
            DirectoryEntry::new("/app/src"),
            DirectoryEntry::new("/app/fallback"),
        ])
        .unwrap()
    }

    #[test]
    fn test_plugins_sorted_by_enforce_stably() {
        let pipeline = ResolverPipeline::with_probe(MemoryProbe::new())
            .plugin(Named("post", PluginEnforce::Post))
            .plugin(Named("a", PluginEnforce::Normal))
            .plugin(Named("pre", PluginEnforce::Pre))
            .plugin(Named("b", PluginEnforce::Normal));
        assert_eq!(pipeline.plugin_names(), vec!["pre", "a", "b", "post"]);
    }

    #[test]
    fn test_handoff_resolves_in_fallback_directory() {
        let probe = MemoryProbe::new().with_file("/app/fallback/widgets/Button.js");
        let files = MemoryProbe::new().with_file("/app/fallback/widgets/Button.js");
        let pipeline = ResolverPipeline::with_probe(files)
            .plugin(RevolverPlugin::with_probe(config(), probe));

        let resolved = pipeline
            .resolve("./Button", Path::new("/app/src/widgets"))
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/app/fallback/widgets/Button.js"));
        assert_eq!(resolved.source, "revolver");
        assert_eq!(resolved.message.as_deref(), Some(MATCH_MESSAGE));
    }

    #[test]
    fn test_main_file_handoff() {
        let file = "/app/fallback/widgets/Button/index.js";
        let pipeline = ResolverPipeline::with_probe(MemoryProbe::new().with_file(file))
            .plugin(RevolverPlugin::with_probe(
                config(),
                MemoryProbe::new().with_file(file),
            ));

        let resolved = pipeline
            .resolve("./Button", Path::new("/app/src/widgets"))
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from(file));
    }

    #[test]
    fn test_deferral_falls_back_to_continuation() {
        let files = MemoryProbe::new().with_file("/app/src/widgets/theme.ts");
        let pipeline = ResolverPipeline::with_probe(files)
            .plugin(RevolverPlugin::with_probe(config(), MemoryProbe::new()));

        let resolved = pipeline
            .resolve("./theme", Path::new("/app/src/widgets"))
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/app/src/widgets/theme.ts"));
        assert_eq!(resolved.source, PARSED_RESOLVE);
        assert!(resolved.message.is_none());
    }

    #[test]
    fn test_continuation_sees_rewritten_request() {
        // exhausted next-directory search still rewrites `*/Button`
        let files = MemoryProbe::new().with_file("/app/fallback/widgets/Button.js");
        let pipeline = ResolverPipeline::with_probe(files)
            .plugin(RevolverPlugin::with_probe(config(), MemoryProbe::new()));

        let resolved = pipeline
            .resolve("*/Button", Path::new("/app/fallback/widgets"))
            .unwrap();
        assert_eq!(resolved.path, PathBuf::from("/app/fallback/widgets/Button.js"));
    }

    #[test]
    fn test_custom_file_extension_handoff() {
        let config = config().with_file_extension(".vue");
        let files = [
            "/app/fallback/widgets/Button.vue",
            "/app/fallback/widgets/Card/index.vue",
        ];
        let pipeline = ResolverPipeline::with_probe(MemoryProbe::new().with_files(files))
            .with_config_extensions(&config)
            .plugin(RevolverPlugin::with_probe(
                config,
                MemoryProbe::new().with_files(files),
            ));

        let button = pipeline
            .resolve("./Button", Path::new("/app/src/widgets"))
            .unwrap();
        assert_eq!(button.path, PathBuf::from(files[0]));
        assert_eq!(button.source, "revolver");

        let card = pipeline
            .resolve("./Card", Path::new("/app/src/widgets"))
            .unwrap();
        assert_eq!(card.path, PathBuf::from(files[1]));
    }

    #[test]
    fn test_config_extensions_come_first_without_repeats() {
        let config = config()
            .with_file_extension(".es6")
            .with_extensions(vec![".es6".into(), ".js".into()]);
        let probe = Arc::new(MemoryProbe::new());
        let pipeline = ResolverPipeline::with_probe(ArcProbe(Arc::clone(&probe)))
            .with_extensions(vec![".js".into(), ".json".into()])
            .with_config_extensions(&config);
        let _ = pipeline.resolve("./lib", Path::new("/app"));
        assert_eq!(
            probe.probed()[..4],
            [
                PathBuf::from("/app/lib"),
                PathBuf::from("/app/lib.es6"),
                PathBuf::from("/app/lib.js"),
                PathBuf::from("/app/lib.json"),
            ]
        );
    }

    #[test]
    fn test_not_found_message() {
        let pipeline = ResolverPipeline::with_probe(MemoryProbe::new());
        let err = pipeline
            .resolve("./Missing", Path::new("/app/src"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot resolve './Missing' from '/app/src': No matching file"
        );
    }

    #[test]
    fn test_plugin_error_propagates() {
        let pipeline = ResolverPipeline::with_probe(MemoryProbe::new()).plugin(Failing);
        let err = pipeline.resolve("./x", Path::new("/app")).unwrap_err();
        assert!(matches!(err, ResolveError::Plugin(_)));
        assert_eq!(err.to_string(), "[failing] before_resolve: boom");
    }

    #[test]
    fn test_continuation_order() {
        let probe = Arc::new(MemoryProbe::new());
        let pipeline = ResolverPipeline::with_probe(ArcProbe(Arc::clone(&probe)))
            .with_extensions(vec![".js".into(), ".json".into()]);
        let _ = pipeline.resolve("./lib", Path::new("/app"));
        assert_eq!(
            probe.probed(),
            vec![
                PathBuf::from("/app/lib"),
                PathBuf::from("/app/lib.js"),
                PathBuf::from("/app/lib.json"),
                PathBuf::from("/app/lib/index.js"),
                PathBuf::from("/app/lib/index.json"),
            ]
        );
    }

    struct ArcProbe(Arc<MemoryProbe>);

    impl FileProbe for ArcProbe {
        fn is_file(&self, path: &Path) -> bool {
            self.0.is_file(path)
        }
    }

    #[test]
    fn test_real_filesystem_pipeline() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let fallback = dir.path().join("fallback");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(fallback.join("Card")).unwrap();
        fs::write(fallback.join("Card/index.js"), "").unwrap();

        let config = ResolverConfig::new(vec![
            DirectoryEntry::new(&src),
            DirectoryEntry::new(&fallback),
        ])
        .unwrap();
        let pipeline = ResolverPipeline::new().plugin(RevolverPlugin::new(config));

        let resolved = pipeline.resolve("./Card", &src).unwrap();
        assert_eq!(resolved.path, fallback.join("Card").join("index.js"));
        assert_eq!(resolved.source, "revolver");
    }
}
