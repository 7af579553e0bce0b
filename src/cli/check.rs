//! `imgreg check`: the whole pipeline in one command.

use anyhow::Result;

use super::CheckArgs;
use super::build::strict_routes;
use crate::config::ImgregConfig;
use crate::log;
use crate::pipeline::{self, PipelineOptions};

/// Run build, lock and verify (and repair, if asked), then exit with the
/// final verification status.
pub fn run_check(config: &ImgregConfig, args: &CheckArgs) -> Result<()> {
    let opts = PipelineOptions {
        strict: strict_routes(config, args.strict),
        repair: args.repair,
        apply: args.apply,
    };
    let report = pipeline::run(config, opts)?;

    if let Some(repair) = &report.repair {
        repair.print();
        if !repair.applied && !repair.proposals.is_empty() {
            log!("repair"; "dry run, pass --apply to write these changes");
        }
    }

    let stages: Vec<_> = report.stages.iter().map(|s| s.name()).collect();
    log!("check"; "ran {}", stages.join(" -> "));

    super::verify::finish(report.outcome())
}
