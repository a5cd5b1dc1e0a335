use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Report whether `path` names a regular file.
///
/// Any metadata error (missing entry, permission denied, broken symlink) is
/// reported as `false`. Symlinks are followed.
#[must_use]
pub fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

/// Read a config or source file, replacing invalid UTF-8 with U+FFFD.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// Sibling temp path used by [`atomic_write`].
fn temp_sibling(path: &Path) -> PathBuf {
    let dir = path.parent().unwrap_or(Path::new("."));
    let stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("revolver");
    dir.join(format!(".{stem}.{}.partial", std::process::id()))
}

/// Write `bytes` to `path` through a temp file in the same directory and a rename.
///
/// Readers observe either the previous contents or the new contents.
///
/// # Errors
/// Returns an error if the temp file cannot be written or renamed into place.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp = temp_sibling(path);

    {
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    if let Err(err) = fs::rename(&temp, path) {
        // Windows refuses to rename over an existing file.
        if cfg!(windows) {
            let copied = fs::copy(&temp, path).map(|_| ());
            let _ = fs::remove_file(&temp);
            return copied;
        }
        let _ = fs::remove_file(&temp);
        return Err(err);
    }

    Ok(())
}
