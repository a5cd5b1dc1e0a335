//! Lexical path helpers.
//!
//! These never touch the filesystem. `join_normalized` collapses `.` and `..`
//! the way bundler hosts do when they join a base directory with a request.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Join `rel` onto `base` and collapse `.` / `..` components lexically.
///
/// Unlike [`Path::join`], a rooted `rel` is appended rather than replacing `base`,
/// and `..` never climbs above the root of `base`.
#[must_use]
pub fn join_normalized(base: &Path, rel: impl AsRef<Path>) -> PathBuf {
    let mut out = PathBuf::new();
    push_components(&mut out, base.components());
    push_components(
        &mut out,
        rel.as_ref()
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_))),
    );
    out
}

fn push_components<'a>(out: &mut PathBuf, components: impl Iterator<Item = Component<'a>>) {
    for component in components {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                );
                if at_root {
                    // Relative base: keep the `..`; rooted base: clamp at root.
                    if out.as_os_str().is_empty() {
                        out.push("..");
                    }
                } else if out.ends_with("..") {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
}

/// Extension of the final segment, including the leading dot.
///
/// Mirrors Node's `path.extname`: `Button.js` gives `.js`, `Button.` gives `.`,
/// and `Button` or `.eslintrc` give `None`.
#[must_use]
pub fn extname(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx..]),
    }
}

/// Append a raw suffix to the last segment (`/a/Button` + `.js` = `/a/Button.js`).
#[must_use]
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_normalized_current_dir() {
        let p = join_normalized(Path::new("/app/src/widgets"), "./Button");
        assert_eq!(p, PathBuf::from("/app/src/widgets/Button"));
    }

    #[test]
    fn test_join_normalized_parent_dir() {
        let p = join_normalized(Path::new("/app/src/widgets"), "../shared/./theme");
        assert_eq!(p, PathBuf::from("/app/src/shared/theme"));
    }

    #[test]
    fn test_join_normalized_clamps_at_root() {
        let p = join_normalized(Path::new("/app"), "../../../etc");
        assert_eq!(p, PathBuf::from("/etc"));
    }

    #[test]
    fn test_join_normalized_empty_rel() {
        let p = join_normalized(Path::new("/app/fallback"), "");
        assert_eq!(p, PathBuf::from("/app/fallback"));
    }

    #[test]
    fn test_join_normalized_rooted_rel_appends() {
        let p = join_normalized(Path::new("/app"), "/widgets");
        assert_eq!(p, PathBuf::from("/app/widgets"));
    }

    #[test]
    fn test_extname() {
        assert_eq!(extname(Path::new("/a/Button.js")), Some(".js"));
        assert_eq!(extname(Path::new("/a/Button.test.tsx")), Some(".tsx"));
        assert_eq!(extname(Path::new("/a/Button.")), Some("."));
        assert_eq!(extname(Path::new("/a/Button")), None);
        assert_eq!(extname(Path::new("/a/.eslintrc")), None);
        assert_eq!(extname(Path::new("/a.dir/Button")), None);
    }

    #[test]
    fn test_with_suffix() {
        let p = with_suffix(Path::new("/a/Button"), "/index");
        assert_eq!(with_suffix(&p, ".js"), PathBuf::from("/a/Button/index.js"));
    }
}
