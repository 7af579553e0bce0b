//! Commands that fix things: `repair` and `clean`.

use anyhow::Result;

use crate::asset::ImageCache;
use crate::asset::clean::{find_impostors, remove_impostors};
use crate::config::ImgregConfig;
use crate::log;
use crate::repair::run_repair;
use crate::utils::plural_count;

/// Propose replacements for broken registry paths; write them with `apply`.
pub fn run_repair_command(config: &ImgregConfig, apply: bool) -> Result<()> {
    let mut cache = ImageCache::new();
    let report = run_repair(config, apply, &mut cache)?;
    report.print();

    for path in &report.unresolved {
        log!("repair"; "no match found for {}", path);
    }
    if report.broken == 0 {
        log!("repair"; "nothing to repair");
    } else if report.applied {
        log!(
            "repair";
            "applied {}, run `imgreg lock` to refresh the lock",
            plural_count(report.proposals.len(), "replacement")
        );
    } else if !report.proposals.is_empty() {
        log!("repair"; "dry run, pass --apply to write these changes");
    }
    Ok(())
}

/// List HTML impostors under the public directory; delete them with `apply`.
pub fn run_clean(config: &ImgregConfig, apply: bool) -> Result<()> {
    let public = config.public_dir();
    let mut cache = ImageCache::new();
    let impostors = find_impostors(&public, &public, &mut cache);

    if impostors.is_empty() {
        log!("clean"; "no impostors found");
        return Ok(());
    }
    for asset in &impostors {
        log!("clean"; "{} is an HTML page", asset.relative);
    }

    if apply {
        let removed = remove_impostors(&impostors, &mut cache)?;
        log!("clean"; "removed {}", plural_count(removed, "file"));
    } else {
        log!(
            "clean";
            "found {}, pass --apply to delete",
            plural_count(impostors.len(), "impostor")
        );
    }
    Ok(())
}
