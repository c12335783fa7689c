//! Directory walking and file I/O helpers.
//!
//! Every failure is mapped onto the typed [`Error`] so callers can tell an
//! unreadable corpus from an unwritable destination.

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List regular files under `root`, as paths relative to `root`, sorted.
///
/// With `recursive` unset only the direct children of `root` are listed.
pub fn list_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::UnreadableSource {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    // glob normalizes `./` and `..` away, so match against the resolved root.
    let root = fs::canonicalize(root).map_err(|source| Error::UnreadableSource {
        path: root.to_path_buf(),
        source,
    })?;
    let escaped = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = Path::new(&escaped).join(if recursive { "**/*" } else { "*" });
    let pattern = pattern.to_string_lossy().to_string();

    let entries = glob::glob(&pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::UnreadableSource {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        if !path.is_file() {
            continue;
        }
        let relative = path.strip_prefix(&root).map_err(|e| Error::UnreadableSource {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        files.push(relative.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::UnwritableDestination {
        path: dir.to_path_buf(),
        source,
    })
}

/// Remove `dir` with everything under it. A missing directory is fine.
pub fn remove_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    fs::remove_dir_all(dir).map_err(|source| Error::UnwritableDestination {
        path: dir.to_path_buf(),
        source,
    })
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `contents` to `path`, creating the parent directory first.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, contents).map_err(|source| Error::UnwritableDestination {
        path: path.to_path_buf(),
        source,
    })
}
