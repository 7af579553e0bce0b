//! Memoized signature checks.
//!
//! Owned by whichever stage needs it (verify, repair, the pipeline); there
//! is no process-wide instance. Keys are paths exactly as passed in, so a
//! missing file can be cached too.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use super::{Signature, classify};

/// Cache of file classifications keyed by path.
#[derive(Debug, Default)]
pub struct ImageCache {
    verdicts: FxHashMap<PathBuf, Signature>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Signature> {
        self.verdicts.get(path).copied()
    }

    pub fn set(&mut self, path: &Path, signature: Signature) {
        self.verdicts.insert(path.to_path_buf(), signature);
    }

    /// Forget one path (after deleting or replacing the file).
    pub fn invalidate(&mut self, path: &Path) {
        self.verdicts.remove(path);
    }

    pub fn clear(&mut self) {
        self.verdicts.clear();
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Cached classification, computing and storing it on a miss.
    pub fn check(&mut self, path: &Path) -> Signature {
        if let Some(signature) = self.get(path) {
            return signature;
        }
        let signature = classify(path);
        self.set(path, signature);
        signature
    }
}
