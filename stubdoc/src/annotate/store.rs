//! Fragment lookup.

use crate::error::Result;
use crate::walk;
use std::path::{Path, PathBuf};

/// Source of extracted fragments, keyed by declaration key.
///
/// `Ok(None)` means no documentation exists for the key, which is normal.
pub trait FragmentStore {
    fn fragment(&self, key: &str) -> Result<Option<String>>;
}

/// Fragments stored as `<dir>/<key>.html`, as written by the extractor.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl FragmentStore for DirStore {
    fn fragment(&self, key: &str) -> Result<Option<String>> {
        // Manual file names are lowercase; declarations keep their case.
        let lowered = key.to_ascii_lowercase();
        let candidates = if lowered == key { vec![key] } else { vec![key, lowered.as_str()] };
        for candidate in candidates {
            let path = self.dir.join(format!("{candidate}.html"));
            if path.is_file() {
                return walk::read_text(&path).map(Some);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
impl FragmentStore for std::collections::HashMap<String, String> {
    fn fragment(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).cloned())
    }
}
