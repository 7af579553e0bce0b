//! Configuration sections.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! public = "public"                               # registry paths are rooted here
//! routes = "image-routes.json"                    # project -> routes
//! registry = "src/generated/image-registry.json"  # generated registry
//! lock = "image-registry.lock.json"               # frozen snapshot
//!
//! [build]
//! strict_routes = false       # fail when a route matches no images
//!
//! [repair]
//! scan_roots = ["images"]     # candidate search roots, relative to public
//! max_candidates = 6          # ranked candidates kept per broken path
//!
//! [import]
//! projects_const = "projectImages"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::repair::DEFAULT_MAX_CANDIDATES;

// ============================================================================
// [paths]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Public asset directory.
    pub public: PathBuf,

    /// Route file (JSON object of project -> route list).
    pub routes: PathBuf,

    /// Generated registry (JSON).
    pub registry: PathBuf,

    /// Lock snapshot (JSON).
    pub lock: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            public: "public".into(),
            routes: "image-routes.json".into(),
            registry: "src/generated/image-registry.json".into(),
            lock: "image-registry.lock.json".into(),
        }
    }
}

// ============================================================================
// [build]
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Treat routes that match no images as errors instead of warnings.
    pub strict_routes: bool,
}

// ============================================================================
// [repair]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Directories (relative to the public dir) searched for candidates.
    pub scan_roots: Vec<PathBuf>,

    /// Number of ranked candidates kept per broken path.
    pub max_candidates: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            scan_roots: vec!["images".into()],
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

// ============================================================================
// [import]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Name of the object declaration holding the project mapping.
    pub projects_const: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            projects_const: "projectImages".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_section_defaults() {
        let config = test_parse_config("");
        assert!(!config.build.strict_routes);
        assert_eq!(config.repair.max_candidates, 6);
        assert_eq!(config.repair.scan_roots.len(), 1);
        assert_eq!(config.import.projects_const, "projectImages");
        assert_eq!(config.paths.public.to_str(), Some("public"));
    }

    #[test]
    fn test_unknown_repair_field_detected() {
        let (_, ignored) =
            crate::config::ImgregConfig::parse_with_ignored("[repair]\nroots = [\"x\"]").unwrap();
        assert!(ignored.iter().any(|f| f.contains("roots")));
    }
}
