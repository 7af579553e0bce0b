//! Route configuration: which images belong to which project.
//!
//! ```json
//! {
//!   "ProjectA": ["uploads/photo_"],
//!   "Barn": ["images/barn/", "/images/shared/barn_"]
//! }
//! ```
//!
//! A route ending in `/` selects a whole folder; any other route is a
//! substring of the path and also matches file name prefixes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::IMAGES_PREFIX;
use crate::error::ToolError;

/// Project name -> routes.
pub type RouteMap = BTreeMap<String, Vec<Route>>;

/// A folder or path prefix under `/images/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn new(route: impl Into<String>) -> Self {
        Self(route.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder route (`uploads/`) rather than a prefix (`uploads/photo_`).
    pub fn is_folder(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Lower-cased `/images/<route>` needle to search paths for.
    ///
    /// A leading `images/` or `/images/` in the route is accepted and
    /// stripped, so `uploads/`, `images/uploads/` and `/images/uploads/`
    /// are the same route.
    pub fn needle(&self) -> String {
        let lower = self.0.trim().replace('\\', "/").to_lowercase();
        let rest = lower
            .strip_prefix(IMAGES_PREFIX)
            .or_else(|| lower.strip_prefix("images/"))
            .unwrap_or(&lower)
            .trim_start_matches('/');
        format!("{IMAGES_PREFIX}{rest}")
    }

    /// Whether a registry path (`/images/...`) is selected by this route.
    pub fn matches(&self, registry_path: &str) -> bool {
        registry_path.to_lowercase().contains(&self.needle())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Load the route file.
pub fn load_routes(path: &Path) -> Result<RouteMap, ToolError> {
    if !path.is_file() {
        return Err(ToolError::MissingRoutes(path.to_path_buf()));
    }
    let content =
        fs::read_to_string(path).map_err(|err| ToolError::Io(path.to_path_buf(), err))?;
    serde_json::from_str(&content).map_err(|err| ToolError::Json(path.to_path_buf(), err))
}
