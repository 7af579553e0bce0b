//! Registry-producing commands: `build`, `lock` and `import`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::asset::ImageCache;
use crate::config::ImgregConfig;
use crate::lock::write_lock;
use crate::log;
use crate::registry::build::build_registry;
use crate::registry::legacy::import_legacy;
use crate::utils::plural_count;

/// Resolve `--strict` against `build.strict_routes`.
pub fn strict_routes(config: &ImgregConfig, flag: Option<bool>) -> bool {
    flag.unwrap_or(config.build.strict_routes)
}

/// Regenerate the registry's projects from the route file.
pub fn run_build(config: &ImgregConfig, strict: Option<bool>) -> Result<()> {
    let mut cache = ImageCache::new();
    let report = build_registry(config, strict_routes(config, strict), &mut cache)?;

    let registry = config.display(&config.registry_path());
    if report.changed {
        log!(
            "build";
            "wrote {} ({}, {})",
            registry,
            plural_count(report.projects, "project"),
            plural_count(report.images, "image")
        );
    } else {
        log!("build"; "{} is up to date", registry);
    }
    if !report.empty_routes.is_empty() {
        log!("build"; "{} matched nothing", plural_count(report.empty_routes.len(), "route"));
    }
    Ok(())
}

/// Freeze the current registry into the lock file.
pub fn run_lock(config: &ImgregConfig) -> Result<()> {
    let snapshot = write_lock(config)?;
    log!(
        "lock";
        "locked {} at {}",
        plural_count(snapshot.lists.path_count(), "path"),
        snapshot.generated_at
    );
    Ok(())
}

/// Convert a legacy registry source into the JSON registry.
pub fn run_import(config: &ImgregConfig, source: &Path, force: bool) -> Result<()> {
    let source = if source.is_absolute() {
        source.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to get current working directory")?
            .join(source)
    };
    let report = import_legacy(config, &source, force)
        .with_context(|| format!("importing `{}`", source.display()))?;

    log!(
        "import";
        "{} and {} ({}) written to {}",
        plural_count(report.groups, "group"),
        plural_count(report.projects, "project"),
        plural_count(report.paths, "path"),
        config.display(&config.registry_path())
    );
    log!("import"; "run `imgreg lock` to snapshot the imported registry");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_flag_overrides_config() {
        let mut config = ImgregConfig::default();
        assert!(!strict_routes(&config, None));
        assert!(strict_routes(&config, Some(true)));

        config.build.strict_routes = true;
        assert!(strict_routes(&config, None));
        assert!(!strict_routes(&config, Some(false)));
    }
}
