//! Verify the lock snapshot against the files on disk.
//!
//! Every path is checked, and every failure is collected, before the
//! command decides its exit status. One run lists everything that needs
//! fixing.

mod report;

use std::fmt;
use std::path::Path;

use crate::asset::{ImageCache, Signature};
use crate::config::ImgregConfig;
use crate::error::ToolError;
use crate::lock::LockSnapshot;
use crate::registry::{EntryRef, ImageLists};
use crate::utils::path::resolve_registry_path;

pub use report::VerifyReport;

/// Why a registry path failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Not on disk (never uploaded, renamed, or a directory).
    Missing,
    /// On disk, but not JPEG/PNG content (e.g. a saved HTML 404 page).
    InvalidImage,
}

impl FailureReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "MISSING",
            Self::InvalidImage => "NOT_A_VALID_IMAGE",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path that failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyFailure {
    pub entry: EntryRef,
    pub path: String,
    pub reason: FailureReason,
}

/// Check one registry path. `None` means the file is a real image.
pub fn diagnose(
    public: &Path,
    registry_path: &str,
    cache: &mut ImageCache,
) -> Option<FailureReason> {
    let file = resolve_registry_path(public, registry_path);
    match cache.check(&file) {
        Signature::Missing => Some(FailureReason::Missing),
        signature if signature.is_real_image() => None,
        _ => Some(FailureReason::InvalidImage),
    }
}

/// Check every path in `lists` (groups and projects alike).
pub fn verify_lists(lists: &ImageLists, public: &Path, cache: &mut ImageCache) -> VerifyReport {
    let mut report = VerifyReport::default();
    for (entry, path) in lists.entries() {
        report.checked += 1;
        if let Some(reason) = diagnose(public, path, cache) {
            report.failures.push(VerifyFailure {
                entry,
                path: path.to_string(),
                reason,
            });
        }
    }
    report
}

/// Load the lock snapshot and verify it.
pub fn verify_lock(
    config: &ImgregConfig,
    cache: &mut ImageCache,
) -> Result<VerifyReport, ToolError> {
    let snapshot = LockSnapshot::load(&config.lock_path())?;
    Ok(verify_lists(&snapshot.lists, &config.public_dir(), cache))
}
