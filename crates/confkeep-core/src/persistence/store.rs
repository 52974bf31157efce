//! Raw textual file read/write primitives.
//!
//! # Design Notes
//!
//! - **Missing is not an error**: `read_text` reports an absent file as
//!   `Ok(None)`, leaving only genuine I/O failures in the `Err` channel.
//! - **Atomic overwrite**: `write_text` stages into a `.tmp` sibling and
//!   renames it over the primary, rotating the previous snapshot into
//!   `.bak` first. The backup consumed by fallback loading is produced
//!   here, not by the persistence core.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Append `suffix` to the full file name, extension included.
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// The backup sibling of `path`: a literal `.bak` appended to the file name
/// (`config.json` becomes `config.json.bak`).
pub fn backup_path(path: &Path) -> PathBuf {
    suffixed(path, ".bak")
}

/// Read the full contents of a text file.
///
/// Returns `Ok(None)` if the file does not exist, `Ok(Some(text))` otherwise
/// (an existing zero-length file reads as `Some("")` — emptiness is the
/// caller's signal, not this layer's). Any other I/O failure is returned
/// as an error.
pub fn read_text(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrite `path` with `text` as one full snapshot.
///
/// # Write Strategy
///
/// 1. Write `text` to `path.tmp`
/// 2. Copy the current primary to `path.bak` if it exists and is non-empty
/// 3. Rename `path.tmp` onto `path`
///
/// The rename keeps a reader from ever observing a half-written primary,
/// and the rotation keeps the previous snapshot reachable for fallback
/// loading should the new primary not survive a crash.
pub fn write_text(path: &Path, text: &str) -> io::Result<()> {
    // Ensure the directory exists before writing
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = suffixed(path, ".tmp");
    fs::write(&temp_path, text)?;

    if let Err(e) = rotate_and_replace(path, &temp_path) {
        // The staged snapshot is useless once the replace fails; a stray
        // `.tmp` must not outlive the write that created it.
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

/// Rotate the outgoing snapshot into the backup, then move the staged file
/// over the primary. An empty primary holds nothing worth keeping, so it is
/// replaced without a rotation.
fn rotate_and_replace(path: &Path, temp_path: &Path) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {
            fs::copy(path, backup_path(path))?;
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    fs::rename(temp_path, path)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let result = read_text(&dir.path().join("absent.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn read_empty_file_is_some_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "").unwrap();

        let result = read_text(&path).unwrap();
        assert_eq!(result.as_deref(), Some(""));
    }

    #[cfg(unix)]
    #[test]
    fn read_unreadable_path_is_err() {
        let dir = tempdir().unwrap();
        // A directory exists but cannot be read as text
        let err = read_text(dir.path()).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        write_text(&path, "{\"x\":1}").unwrap();

        assert_eq!(read_text(&path).unwrap().as_deref(), Some("{\"x\":1}"));
    }

    #[test]
    fn write_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/state.json");

        write_text(&path, "data").unwrap();

        assert_eq!(read_text(&path).unwrap().as_deref(), Some("data"));
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        write_text(&path, "data").unwrap();

        assert!(!suffixed(&path, ".tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_rotation_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "previous").unwrap();
        // The backup path is a directory, so the rotation copy fails.
        fs::create_dir(backup_path(&path)).unwrap();

        assert!(write_text(&path, "next").is_err());

        assert!(!suffixed(&path, ".tmp").exists());
        assert_eq!(read_text(&path).unwrap().as_deref(), Some("previous"));
    }

    #[test]
    fn overwrite_rotates_previous_snapshot_into_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        write_text(&path, "first").unwrap();
        write_text(&path, "second").unwrap();

        assert_eq!(read_text(&path).unwrap().as_deref(), Some("second"));
        assert_eq!(
            read_text(&backup_path(&path)).unwrap().as_deref(),
            Some("first")
        );
    }

    #[test]
    fn empty_primary_is_not_rotated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "").unwrap();

        write_text(&path, "fresh").unwrap();

        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn first_write_creates_no_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        write_text(&path, "only").unwrap();

        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn backup_path_appends_to_full_name() {
        let path = Path::new("/var/lib/app/config.json");
        assert_eq!(
            backup_path(path),
            PathBuf::from("/var/lib/app/config.json.bak")
        );
    }
}
