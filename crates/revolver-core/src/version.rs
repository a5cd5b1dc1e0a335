use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version for JSON output of `resolve`.
/// Bump when the output structure changes incompatibly.
pub const RESOLVE_SCHEMA_VERSION: u32 = 1;

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("revolver {VERSION}");

    if let Some(hash) = option_env!("REVOLVER_BUILD_GIT_HASH") {
        let _ = write!(s, " ({hash})");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string_contains_version() {
        let vs = version_string();
        assert!(vs.contains(VERSION));
        assert!(vs.starts_with("revolver "));
    }

    #[test]
    fn test_schema_version_positive() {
        const { assert!(RESOLVE_SCHEMA_VERSION > 0) };
    }
}
