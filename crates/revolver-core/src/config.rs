//! Resolver configuration.
//!
//! [`RevolverOptions`] is the raw, serde-facing shape of `revolver.json`.
//! [`ResolverConfig`] is the validated form the resolver runs against: the
//! directory list is non-empty, exclude patterns are compiled, and every
//! default has been filled in. It is built once and never mutated afterwards.
//!
//! ```json
//! {
//!   "directoryList": [
//!     { "path": "./src", "name": "app" },
//!     { "path": "./themes/base", "name": "base" }
//!   ],
//!   "fileExtension": ".js",
//!   "nextDirectoryPrefix": "*/"
//! }
//! ```

use crate::error::Error;
use regex_lite::Regex;
use revolver_util::fs::read_to_string_lossy;
use revolver_util::path::join_normalized;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default pattern for both `excludePath` and `excludeRequest`.
pub const DEFAULT_EXCLUDE: &str = "node_modules";

/// Default extension appended to extensionless requests.
pub const DEFAULT_FILE_EXTENSION: &str = ".js";

/// Default next-directory escape token.
pub const DEFAULT_NEXT_DIRECTORY_PREFIX: &str = "*/";

/// Default main file probed for directory-style requests.
pub const DEFAULT_MAIN_FILE_NAME: &str = "/index";

/// Config file name looked up by [`find_config_file`].
pub const CONFIG_FILE_NAME: &str = "revolver.json";

/// One candidate base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Absolute directory.
    pub path: PathBuf,
    /// Alias for container-prefix requests (`name/Button`).
    pub name: Option<String>,
}

impl DirectoryEntry {
    /// Create an unnamed entry.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
        }
    }

    /// Create a named entry.
    pub fn named(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
        }
    }
}

// =============================================================================
// Raw options (revolver.json)
// =============================================================================

/// `directoryList` accepts a single path or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectoryListOption {
    One(String),
    Many(Vec<DirectoryEntryOption>),
}

/// A list item: a bare path or `{ "path": ..., "name": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectoryEntryOption {
    Path(String),
    Entry {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// Options as written in `revolver.json`.
///
/// Missing and empty-string values fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevolverOptions {
    pub directory_list: DirectoryListOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_request: Option<String>,
    #[serde(
        default,
        alias = "jsFileExtension",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_directory_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_file_name: Option<String>,
}

impl RevolverOptions {
    /// Options with the given directories and every other value defaulted.
    #[must_use]
    pub fn with_directories(directories: Vec<DirectoryEntryOption>) -> Self {
        Self {
            directory_list: DirectoryListOption::Many(directories),
            exclude_path: None,
            exclude_request: None,
            file_extension: None,
            extensions: None,
            next_directory_prefix: None,
            main_file_name: None,
        }
    }
}

/// Treat `Some("")` like `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// Validated config
// =============================================================================

/// Validated, read-only resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    directory_list: Vec<DirectoryEntry>,
    exclude_path: Regex,
    exclude_request: Regex,
    file_extension: String,
    extensions: Option<Vec<String>>,
    next_directory_prefix: String,
    main_file_name: String,
}

impl ResolverConfig {
    /// Build a config over `directory_list` with every other option defaulted.
    pub fn new(directory_list: Vec<DirectoryEntry>) -> Result<Self, Error> {
        if directory_list.is_empty() {
            return Err(Error::EmptyDirectoryList);
        }

        let mut seen = HashSet::new();
        for name in directory_list.iter().filter_map(|e| e.name.as_deref()) {
            if !seen.insert(name) {
                return Err(Error::DuplicateDirectoryName {
                    name: name.to_string(),
                });
            }
        }

        Ok(Self {
            directory_list,
            exclude_path: compile("excludePath", DEFAULT_EXCLUDE)?,
            exclude_request: compile("excludeRequest", DEFAULT_EXCLUDE)?,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            extensions: None,
            next_directory_prefix: DEFAULT_NEXT_DIRECTORY_PREFIX.to_string(),
            main_file_name: DEFAULT_MAIN_FILE_NAME.to_string(),
        })
    }

    /// Build from raw options. Relative directories resolve against `base_dir`.
    pub fn from_options(options: RevolverOptions, base_dir: &Path) -> Result<Self, Error> {
        let raw = match options.directory_list {
            DirectoryListOption::One(path) => vec![DirectoryEntryOption::Path(path)],
            DirectoryListOption::Many(list) => list,
        };

        let entries = raw
            .into_iter()
            .map(|item| {
                let (path, name) = match item {
                    DirectoryEntryOption::Path(path) => (path, None),
                    DirectoryEntryOption::Entry { path, name } => (path, non_empty(name)),
                };
                DirectoryEntry {
                    path: absolutize(base_dir, Path::new(&path)),
                    name,
                }
            })
            .collect();

        let mut config = Self::new(entries)?;

        if let Some(pattern) = non_empty(options.exclude_path) {
            config = config.with_exclude_path(&pattern)?;
        }
        if let Some(pattern) = non_empty(options.exclude_request) {
            config = config.with_exclude_request(&pattern)?;
        }
        if let Some(ext) = non_empty(options.file_extension) {
            config = config.with_file_extension(ext);
        }
        if let Some(exts) = options.extensions.filter(|e| !e.is_empty()) {
            config = config.with_extensions(exts);
        }
        if let Some(prefix) = non_empty(options.next_directory_prefix) {
            config = config.with_next_directory_prefix(prefix)?;
        }
        if let Some(name) = non_empty(options.main_file_name) {
            config = config.with_main_file_name(name);
        }

        Ok(config)
    }

    /// Read and validate a `revolver.json` file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let source = read_to_string_lossy(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let options: RevolverOptions =
            serde_json::from_str(&source).map_err(|source| Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::from_options(options, base_dir)
    }

    /// Set the requesting-path exclude pattern (unanchored regex).
    pub fn with_exclude_path(mut self, pattern: &str) -> Result<Self, Error> {
        self.exclude_path = compile("excludePath", pattern)?;
        Ok(self)
    }

    /// Set the request exclude pattern (unanchored regex).
    pub fn with_exclude_request(mut self, pattern: &str) -> Result<Self, Error> {
        self.exclude_request = compile("excludeRequest", pattern)?;
        Ok(self)
    }

    /// Set the extension appended to extensionless requests.
    #[must_use]
    pub fn with_file_extension(mut self, ext: impl Into<String>) -> Self {
        self.file_extension = ext.into();
        self
    }

    /// Set the extensions a request may already carry without getting
    /// `file_extension` appended.
    #[must_use]
    pub fn with_extensions(mut self, exts: Vec<String>) -> Self {
        self.extensions = Some(exts);
        self
    }

    /// Set the next-directory escape token.
    pub fn with_next_directory_prefix(mut self, prefix: impl Into<String>) -> Result<Self, Error> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(Error::EmptyNextDirectoryPrefix);
        }
        self.next_directory_prefix = prefix;
        Ok(self)
    }

    /// Set the main file name. A missing leading `/` is added.
    #[must_use]
    pub fn with_main_file_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.main_file_name = if name.starts_with('/') {
            name
        } else {
            format!("/{name}")
        };
        self
    }

    #[must_use]
    pub fn directory_list(&self) -> &[DirectoryEntry] {
        &self.directory_list
    }

    #[must_use]
    pub fn exclude_path(&self) -> &Regex {
        &self.exclude_path
    }

    #[must_use]
    pub fn exclude_request(&self) -> &Regex {
        &self.exclude_request
    }

    #[must_use]
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Whether `ext` (with its leading dot) counts as already valid.
    #[must_use]
    pub fn is_known_extension(&self, ext: &str) -> bool {
        match &self.extensions {
            Some(exts) => exts.iter().any(|e| e == ext),
            None => self.file_extension == ext,
        }
    }

    /// `file_extension` followed by the already-valid set, without repeats.
    #[must_use]
    pub fn known_extensions(&self) -> Vec<&str> {
        let mut exts = vec![self.file_extension.as_str()];
        for ext in self.extensions.iter().flatten() {
            if !exts.contains(&ext.as_str()) {
                exts.push(ext);
            }
        }
        exts
    }

    #[must_use]
    pub fn next_directory_prefix(&self) -> &str {
        &self.next_directory_prefix
    }

    #[must_use]
    pub fn main_file_name(&self) -> &str {
        &self.main_file_name
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

fn absolutize(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        join_normalized(path, "")
    } else {
        join_normalized(base_dir, path)
    }
}

/// Walk up from `start` looking for [`CONFIG_FILE_NAME`].
#[must_use]
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }

    None
}

/// Find and load the nearest `revolver.json` above `start`.
pub fn discover(start: &Path) -> Result<(PathBuf, ResolverConfig), Error> {
    let path = find_config_file(start).ok_or_else(|| Error::ConfigNotFound {
        start: start.to_path_buf(),
    })?;
    let config = ResolverConfig::load(&path)?;
    Ok((path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(json: &str) -> RevolverOptions {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::new(vec![DirectoryEntry::new("/app/src")]).unwrap();
        assert_eq!(config.file_extension(), ".js");
        assert_eq!(config.next_directory_prefix(), "*/");
        assert_eq!(config.main_file_name(), "/index");
        assert!(config.exclude_path().is_match("/app/node_modules/react"));
        assert!(config.exclude_request().is_match("./node_modules/x"));
        assert!(config.is_known_extension(".js"));
        assert!(!config.is_known_extension(".json"));
    }

    #[test]
    fn test_empty_directory_list() {
        let err = ResolverConfig::new(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyDirectoryList));
    }

    #[test]
    fn test_duplicate_names() {
        let err = ResolverConfig::new(vec![
            DirectoryEntry::named("/a", "core"),
            DirectoryEntry::named("/b", "core"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateDirectoryName { name } if name == "core"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ResolverConfig::new(vec![DirectoryEntry::new("/a")]).unwrap();
        let err = config.with_exclude_path("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { field: "excludePath", .. }));
    }

    #[test]
    fn test_empty_next_prefix_rejected() {
        let config = ResolverConfig::new(vec![DirectoryEntry::new("/a")]).unwrap();
        assert!(matches!(
            config.with_next_directory_prefix(""),
            Err(Error::EmptyNextDirectoryPrefix)
        ));
    }

    #[test]
    fn test_main_file_name_gets_slash() {
        let config = ResolverConfig::new(vec![DirectoryEntry::new("/a")])
            .unwrap()
            .with_main_file_name("main");
        assert_eq!(config.main_file_name(), "/main");
    }

    #[test]
    fn test_directory_list_as_string() {
        let options = parse(r#"{"directoryList": "/app/src"}"#);
        let config = ResolverConfig::from_options(options, Path::new("/")).unwrap();
        assert_eq!(config.directory_list(), &[DirectoryEntry::new("/app/src")]);
    }

    #[test]
    fn test_directory_list_mixed() {
        let options = parse(
            r#"{
                "directoryList": ["/app/src", {"path": "/app/base", "name": "base"}],
                "jsFileExtension": ".jsx",
                "mainFileName": "/main"
            }"#,
        );
        let config = ResolverConfig::from_options(options, Path::new("/")).unwrap();
        assert_eq!(
            config.directory_list(),
            &[
                DirectoryEntry::new("/app/src"),
                DirectoryEntry::named("/app/base", "base"),
            ]
        );
        assert_eq!(config.file_extension(), ".jsx");
        assert_eq!(config.main_file_name(), "/main");
    }

    #[test]
    fn test_empty_strings_fall_back_to_defaults() {
        let options = parse(
            r#"{"directoryList": "/a", "excludePath": "", "fileExtension": "", "nextDirectoryPrefix": ""}"#,
        );
        let config = ResolverConfig::from_options(options, Path::new("/")).unwrap();
        assert!(config.exclude_path().is_match("node_modules"));
        assert_eq!(config.file_extension(), ".js");
        assert_eq!(config.next_directory_prefix(), "*/");
    }

    #[test]
    fn test_explicit_extensions() {
        let options = parse(r#"{"directoryList": "/a", "extensions": [".js", ".jsx"]}"#);
        let config = ResolverConfig::from_options(options, Path::new("/")).unwrap();
        assert!(config.is_known_extension(".jsx"));
        assert!(!config.is_known_extension(".ts"));
    }

    #[test]
    fn test_known_extensions_lead_with_file_extension() {
        let config = ResolverConfig::new(vec![DirectoryEntry::new("/a")])
            .unwrap()
            .with_file_extension(".vue")
            .with_extensions(vec![".js".into(), ".vue".into()]);
        assert_eq!(config.known_extensions(), vec![".vue", ".js"]);
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let options = parse(r#"{"directoryList": ["./src", "../shared/./base"]}"#);
        let config = ResolverConfig::from_options(options, Path::new("/work/app")).unwrap();
        let paths: Vec<_> = config.directory_list().iter().map(|e| &e.path).collect();
        assert_eq!(
            paths,
            vec![
                &PathBuf::from("/work/app/src"),
                &PathBuf::from("/work/shared/base")
            ]
        );
    }

    #[test]
    fn test_load_and_discover() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("src").join("widgets");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"directoryList": ["./src", "./fallback"]}"#,
        )
        .unwrap();

        let (path, config) = discover(&nested).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.directory_list().len(), 2);
        assert_eq!(config.directory_list()[0].path, dir.path().join("src"));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = ResolverConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ResolverConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_options_serialize_skips_defaults() {
        let options =
            RevolverOptions::with_directories(vec![DirectoryEntryOption::Path("./src".into())]);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"directoryList":["./src"]}"#);
    }
}
