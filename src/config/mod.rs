//! Project configuration management for `imgreg.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [paths], [build], [repair], [import]
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # config file discovery
//! └── mod.rs     # ImgregConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                           |
//! |------------|---------------------------------------------------|
//! | `[paths]`  | Public dir, route file, registry and lock paths   |
//! | `[build]`  | Registry build behavior (strict routes)           |
//! | `[repair]` | Candidate scan roots and ranking depth            |
//! | `[import]` | Legacy registry source import                     |
//!
//! The config file is optional. Without one, every setting takes its
//! default and the project root is the current directory.

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{BuildConfig, ImportConfig, PathsConfig, RepairConfig};

use util::find_config_file;

use crate::{cli::Cli, debug, log, utils::path::normalize_path, utils::path::to_slash};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Default config file name, searched upward from the current directory.
pub const CONFIG_FILE: &str = "imgreg.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing imgreg.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImgregConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Artifact locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Registry build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Repair settings
    #[serde(default)]
    pub repair: RepairConfig,

    /// Legacy import settings
    #[serde(default)]
    pub import: ImportConfig,
}

impl ImgregConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// An explicit `--config` must exist. Otherwise `imgreg.toml` is searched
    /// upward from cwd, and its absence means defaults rooted at cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let found = match &cli.config {
            Some(explicit) => {
                let path = if explicit.is_absolute() {
                    explicit.clone()
                } else {
                    cwd.join(explicit)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(Path::new(CONFIG_FILE)),
        };

        let mut config = match &found {
            Some(path) => Self::from_path(path)?,
            None => {
                debug!("config"; "{} not found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        let root = found
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.config_path = found.as_deref().map(normalize_path);
        config.root = normalize_path(&root);

        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Join a configured path with the root directory (absolute paths win).
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Public asset directory; registry paths are rooted here.
    pub fn public_dir(&self) -> PathBuf {
        self.root_join(&self.paths.public)
    }

    /// `<public>/images`, the tree the registry describes.
    pub fn images_dir(&self) -> PathBuf {
        self.public_dir().join("images")
    }

    pub fn routes_path(&self) -> PathBuf {
        self.root_join(&self.paths.routes)
    }

    pub fn registry_path(&self) -> PathBuf {
        self.root_join(&self.paths.registry)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root_join(&self.paths.lock)
    }

    /// `<registry>.bak`, written before a repair is applied.
    pub fn backup_path(&self) -> PathBuf {
        let mut path = self.registry_path().into_os_string();
        path.push(".bak");
        PathBuf::from(path)
    }

    /// Directories searched for repair candidates.
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        let public = self.public_dir();
        self.repair
            .scan_roots
            .iter()
            .map(|root| public.join(root))
            .collect()
    }

    /// Path for display: relative to the project root when possible.
    pub fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(to_slash)
            .unwrap_or_else(|_| path.display().to_string())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        for (field, value) in [
            ("paths.public", &self.paths.public),
            ("paths.routes", &self.paths.routes),
            ("paths.registry", &self.paths.registry),
            ("paths.lock", &self.paths.lock),
        ] {
            if value.as_os_str().is_empty() {
                diag.error(field, "must not be empty");
            }
        }

        if self.paths.registry == self.paths.lock {
            diag.error_with_hint(
                "paths.lock",
                "lock file and registry must be different files",
                "the default lock path is `image-registry.lock.json`",
            );
        }

        if self.repair.scan_roots.is_empty() {
            diag.error_with_hint(
                "repair.scan_roots",
                "at least one scan root is required",
                "use `[\"images\"]` to search the whole image tree",
            );
        }
        for (i, root) in self.repair.scan_roots.iter().enumerate() {
            let escapes = root.is_absolute()
                || root
                    .components()
                    .any(|c| matches!(c, Component::ParentDir | Component::RootDir));
            if escapes {
                diag.error_with_hint(
                    format!("repair.scan_roots[{i}]"),
                    format!("`{}` must stay inside the public directory", root.display()),
                    "scan roots are relative to `paths.public`",
                );
            }
        }

        if self.repair.max_candidates == 0 {
            diag.error("repair.max_candidates", "must be at least 1");
        }

        if self.import.projects_const.trim().is_empty() {
            diag.error("import.projects_const", "must not be empty");
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ImgregConfig {
    let (parsed, ignored) = ImgregConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
