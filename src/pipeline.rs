//! Build, lock and verify in one run, with optional repair.
//!
//! ```text
//! build -> lock -> verify ──ok──> done
//!                    │
//!                 failures + --repair
//!                    │
//!                 repair ──applied──> lock -> verify
//! ```
//!
//! One [`ImageCache`] is shared by every stage, so each file's signature
//! is read at most once per run.

use std::fmt;

use crate::asset::ImageCache;
use crate::config::ImgregConfig;
use crate::error::ToolError;
use crate::lock::{LockSnapshot, write_lock};
use crate::registry::build::{BuildReport, build_registry};
use crate::repair::{RepairReport, run_repair};
use crate::utils::plural_count;
use crate::verify::{VerifyReport, verify_lock};
use crate::{debug, log};

/// A step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Lock,
    Verify,
    Repair,
    Relock,
    Reverify,
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Lock => "lock",
            Self::Verify => "verify",
            Self::Repair => "repair",
            Self::Relock => "relock",
            Self::Reverify => "reverify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Fail the build on routes that match no images.
    pub strict: bool,
    /// Attempt a repair when verification fails.
    pub repair: bool,
    /// Write repairs instead of only proposing them.
    pub apply: bool,
}

/// Aggregated outcome of every stage that ran.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub stages: Vec<Stage>,
    pub build: BuildReport,
    pub lock: LockSnapshot,
    pub verify: VerifyReport,
    pub repair: Option<RepairReport>,
    /// Verification after an applied repair.
    pub final_verify: Option<VerifyReport>,
}

impl PipelineReport {
    /// The verification that decides the exit status.
    pub fn outcome(&self) -> &VerifyReport {
        self.final_verify.as_ref().unwrap_or(&self.verify)
    }

    pub fn is_clean(&self) -> bool {
        self.outcome().is_clean()
    }
}

/// Run the pipeline against `config`.
///
/// Stage errors (missing route file, strict empty routes) abort the run;
/// verification failures do not, they are carried in the report.
pub fn run(config: &ImgregConfig, opts: PipelineOptions) -> Result<PipelineReport, ToolError> {
    let mut cache = ImageCache::new();
    let mut stages = vec![Stage::Build];

    let build = build_registry(config, opts.strict, &mut cache)?;

    stages.push(Stage::Lock);
    let lock = write_lock(config)?;

    stages.push(Stage::Verify);
    let verify = verify_lock(config, &mut cache)?;

    let mut report = PipelineReport {
        stages,
        build,
        lock,
        verify,
        repair: None,
        final_verify: None,
    };
    if report.verify.is_clean() || !opts.repair {
        return Ok(report);
    }
    debug!(
        "check";
        "{} failed, attempting repair",
        plural_count(report.verify.failures.len(), "path")
    );

    report.stages.push(Stage::Repair);
    let repair = run_repair(config, opts.apply, &mut cache)?;
    let applied = repair.applied;
    report.repair = Some(repair);
    if !applied {
        return Ok(report);
    }
    log!("check"; "repair applied, locking again");

    report.stages.push(Stage::Relock);
    report.lock = write_lock(config)?;

    report.stages.push(Stage::Reverify);
    let final_verify = verify_lock(config, &mut cache)?;
    report.final_verify = Some(final_verify);

    Ok(report)
}
