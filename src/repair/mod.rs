//! Repair broken registry paths by fuzzy file-name matching.
//!
//! ```text
//! scan registry -> diagnose each path -> propose replacements -> dry-run | apply
//! ```
//!
//! Applying writes `<registry>.bak` first and never re-locks; run
//! `imgreg lock` (or `imgreg check --repair --apply`) afterwards.

mod score;

use std::fs;
use std::path::PathBuf;

use owo_colors::OwoColorize;

use crate::asset::{AssetFile, ImageCache, collect_images};
use crate::config::ImgregConfig;
use crate::error::ToolError;
use crate::registry::{IMAGES_PREFIX, ImageLists, Registry};
use crate::utils::{plural_count, plural_s};
use crate::verify::diagnose;
use crate::{debug, log};

pub use score::{Candidate, DEFAULT_MAX_CANDIDATES, rank_candidates};

/// A broken path and the replacement chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub old: String,
    pub new: String,
    pub score: i32,
    /// Runner-up candidates, best first.
    pub alternatives: Vec<Candidate>,
}

/// Outcome of a repair run.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Distinct registry paths checked.
    pub checked: usize,
    /// Paths that are missing or not real images.
    pub broken: usize,
    pub proposals: Vec<Proposal>,
    /// Broken paths with no candidate above zero.
    pub unresolved: Vec<String>,
    /// Whether the registry was rewritten.
    pub applied: bool,
    /// Backup written before applying.
    pub backup: Option<PathBuf>,
}

impl RepairReport {
    /// Print proposals and unresolved paths to stderr.
    pub fn print(&self) {
        if self.proposals.is_empty() && self.unresolved.is_empty() {
            return;
        }
        eprintln!();
        for p in &self.proposals {
            eprintln!("{}{}{}", "[".dimmed(), p.old.cyan(), "]".dimmed());
            eprintln!(
                "{} {} {}",
                "→".green(),
                p.new,
                format!("(score {})", p.score).dimmed()
            );
            for alt in &p.alternatives {
                eprintln!("  {} {}", alt.path.dimmed(), format!("({})", alt.score).dimmed());
            }
        }
        for path in &self.unresolved {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            eprintln!("{} {}", "→".red(), "no match found".dimmed());
        }
        eprintln!();
    }
}

/// Diagnose every distinct `/images/...` path and propose replacements.
///
/// The candidate index is only built once a broken path is found.
pub fn plan_repairs(
    config: &ImgregConfig,
    lists: &ImageLists,
    cache: &mut ImageCache,
) -> RepairReport {
    let public = config.public_dir();
    let max = config.repair.max_candidates;
    let mut report = RepairReport::default();
    let mut index: Option<Vec<AssetFile>> = None;

    for path in lists
        .unique_paths()
        .into_iter()
        .filter(|p| p.starts_with(IMAGES_PREFIX))
    {
        report.checked += 1;
        let Some(reason) = diagnose(&public, path, cache) else {
            continue;
        };
        report.broken += 1;
        debug!("repair"; "{} is {}", path, reason);

        let index = index.get_or_insert_with(|| {
            let found = collect_images(&public, &config.scan_roots(), cache);
            debug!("repair"; "indexed {}", plural_count(found.len(), "candidate"));
            found
        });

        let mut ranked = rank_candidates(path, index, max);
        if ranked.is_empty() {
            report.unresolved.push(path.to_string());
            continue;
        }
        let best = ranked.remove(0);
        report.proposals.push(Proposal {
            old: path.to_string(),
            new: best.path,
            score: best.score,
            alternatives: ranked,
        });
    }

    report
}

/// Back up the registry verbatim, then rewrite every proposed path.
///
/// Returns the backup location.
pub fn apply_repairs(
    config: &ImgregConfig,
    registry: &mut Registry,
    proposals: &[Proposal],
) -> Result<PathBuf, ToolError> {
    let registry_path = config.registry_path();
    let backup = config.backup_path();
    fs::copy(&registry_path, &backup).map_err(|err| ToolError::Io(backup.clone(), err))?;

    for p in proposals {
        let count = registry.lists.replace_path(&p.old, &p.new);
        debug!("repair"; "{} -> {} ({} occurrence{})", p.old, p.new, count, plural_s(count));
    }
    registry.save(&registry_path)?;
    Ok(backup)
}

/// Repair the registry. Dry-run unless `apply` is set.
pub fn run_repair(
    config: &ImgregConfig,
    apply: bool,
    cache: &mut ImageCache,
) -> Result<RepairReport, ToolError> {
    let mut registry = Registry::load(&config.registry_path())?;

    for (entry, path) in registry.lists.stray_paths() {
        log!("warning"; "{} holds `{}` outside {}", entry, path, IMAGES_PREFIX);
    }

    let mut report = plan_repairs(config, &registry.lists, cache);
    log!(
        "repair";
        "{} checked, {} broken, {} proposed",
        plural_count(report.checked, "path"),
        report.broken,
        report.proposals.len()
    );

    if apply && !report.proposals.is_empty() {
        let backup = apply_repairs(config, &mut registry, &report.proposals)?;
        log!("repair"; "backup written to {}", config.display(&backup));
        report.applied = true;
        report.backup = Some(backup);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::Fixture;

    #[test]
    fn test_plan_proposes_copy() {
        let fx = Fixture::new();
        fx.jpeg("uploads/photo_1_copy.jpg");
        fx.jpeg("uploads/banner.png");
        fx.registry(r#"{"groups": {"hero": ["/images/uploads/photo_1.jpg"]}}"#);

        let mut cache = ImageCache::new();
        let report = run_repair(&fx.config, false, &mut cache).unwrap();

        assert_eq!(report.checked, 1);
        assert_eq!(report.broken, 1);
        assert_eq!(report.proposals.len(), 1);
        let p = &report.proposals[0];
        assert_eq!(p.new, "/images/uploads/photo_1_copy.jpg");
        assert!(p.score >= 10);
        assert!(!report.applied);
    }

    #[test]
    fn test_dry_run_leaves_registry() {
        let fx = Fixture::new();
        fx.jpeg("uploads/photo_1_copy.jpg");
        let path = fx.registry(r#"{"projects": {"P": ["/images/uploads/photo_1.jpg"]}}"#);
        let before = fs::read(&path).unwrap();

        let mut cache = ImageCache::new();
        run_repair(&fx.config, false, &mut cache).unwrap();

        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!fx.config.backup_path().exists());
    }

    #[test]
    fn test_apply_backs_up_and_rewrites() {
        let fx = Fixture::new();
        fx.jpeg("uploads/photo_1_copy.jpg");
        fx.jpeg("uploads/ok.jpg");
        let original = r#"{"groups": {"hero": [
                "/images/uploads/photo_1.jpg",
                "/images/uploads/ok.jpg"
            ]},
            "projects": {"P": ["/images/uploads/photo_1.jpg"]}}"#;
        let path = fx.registry(original);

        let mut cache = ImageCache::new();
        let report = run_repair(&fx.config, true, &mut cache).unwrap();
        assert!(report.applied);

        let backup = report.backup.unwrap();
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);

        let repaired = Registry::load(&path).unwrap();
        assert_eq!(
            repaired.lists.groups["hero"],
            vec!["/images/uploads/photo_1_copy.jpg", "/images/uploads/ok.jpg"]
        );
        assert_eq!(repaired.lists.projects["P"], vec!["/images/uploads/photo_1_copy.jpg"]);
    }

    #[test]
    fn test_unresolved_continues() {
        let fx = Fixture::new();
        fx.jpeg("uploads/photo_1.jpg");
        fx.registry(
            r#"{"groups": {"a": ["/images/zzz.gif", "/images/uploads/photo_1.png"]}}"#,
        );

        let mut cache = ImageCache::new();
        let report = run_repair(&fx.config, true, &mut cache).unwrap();

        assert_eq!(report.broken, 2);
        assert_eq!(report.unresolved, vec!["/images/zzz.gif"]);
        assert_eq!(report.proposals[0].new, "/images/uploads/photo_1.jpg");
        assert!(report.applied);
    }

    #[test]
    fn test_impostor_is_broken() {
        let fx = Fixture::new();
        fx.html("roof.jpg");
        fx.png("roof (1).png");
        fx.registry(r#"{"groups": {"g": ["/images/roof.jpg"]}}"#);

        let mut cache = ImageCache::new();
        let report = run_repair(&fx.config, false, &mut cache).unwrap();
        assert_eq!(report.proposals.len(), 1);
        assert_eq!(report.proposals[0].new, "/images/roof (1).png");
        assert_eq!(report.proposals[0].score, 10);
    }

    #[test]
    fn test_requires_registry() {
        let fx = Fixture::new();
        let mut cache = ImageCache::new();
        assert!(matches!(
            run_repair(&fx.config, false, &mut cache),
            Err(ToolError::MissingRegistry(_))
        ));
    }
}
