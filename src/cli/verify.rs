//! `imgreg verify`: check the lock against disk.

use anyhow::Result;

use crate::asset::ImageCache;
use crate::config::ImgregConfig;
use crate::error::ToolError;
use crate::log;
use crate::verify::{VerifyReport, verify_lock};

/// Verify the lock snapshot, printing every failure before failing.
pub fn run_verify(config: &ImgregConfig) -> Result<()> {
    let mut cache = ImageCache::new();
    let report = verify_lock(config, &mut cache)?;
    finish(&report)
}

/// Print `report` and turn failures into the command's error.
pub(super) fn finish(report: &VerifyReport) -> Result<()> {
    report.print();
    log!("verify"; "{}", report);
    if report.is_clean() {
        Ok(())
    } else {
        Err(ToolError::VerifyFailed {
            count: report.failures.len(),
        }
        .into())
    }
}
