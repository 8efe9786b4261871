//! Crash-safe file writes for exports.
//!
//! Exports are written to a sibling temporary file which is then renamed over
//! the target, so a reader never sees a half-written MAT or JSON file. On
//! POSIX systems a rename within one filesystem is atomic.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Atomically replaces `path` with `bytes`.
///
/// # Errors
///
/// Returns an IO error if the temporary file cannot be written or renamed.
/// On failure the original file (if any) is left unchanged and the temporary
/// file is removed on a best-effort basis.
///
/// # Examples
///
/// ```no_run
/// use praat_text::export::write_atomic;
///
/// # fn example() -> praat_text::Result<()> {
/// write_atomic("speaker01.formant.json", b"{}")?;
/// # Ok(())
/// # }
/// ```
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    fs::rename(&temp_path, path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote export");
    Ok(())
}

/// Appends `.tmp` to the file name, keeping any existing extension.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

fn write_to_temp_file(temp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn make_temp_path_with_extension() {
        let temp = make_temp_path(Path::new("/data/a.formant.mat"));
        assert_eq!(temp, Path::new("/data/a.formant.mat.tmp"));
    }

    #[test]
    fn make_temp_path_without_extension() {
        let temp = make_temp_path(Path::new("/data/report"));
        assert_eq!(temp, Path::new("/data/report.tmp"));
    }

    #[test]
    fn writes_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        write_atomic(&target, b"{\"a\":1}").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"{\"a\":1}");
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        fs::write(&target, b"old contents").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("out.json");
        let err = write_atomic(&target, b"x").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
