//! The image registry document.
//!
//! ```json
//! {
//!   "version": 1,
//!   "groups": {
//!     "threeTabImages": ["/images/three-tab/shingle_1.jpg"]
//!   },
//!   "projects": {
//!     "ProjectA": ["/images/uploads/photo_1.jpg"]
//!   }
//! }
//! ```
//!
//! `groups` are maintained by hand and survive rebuilds; `projects` is
//! regenerated from the route file by [`build`].

pub mod build;
pub mod legacy;
mod route;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

pub use route::{Route, RouteMap, load_routes};

/// Current on-disk schema version.
pub const REGISTRY_VERSION: u32 = 1;

/// Prefix every registry path carries.
pub const IMAGES_PREFIX: &str = "/images/";

/// Named lists of registry paths, shared by the registry and the lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLists {
    /// Hand-maintained flat lists.
    pub groups: BTreeMap<String, Vec<String>>,
    /// Generated project -> paths mapping.
    pub projects: BTreeMap<String, Vec<String>>,
}

/// Which list a path belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryRef {
    Group(String),
    Project(String),
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(name) => write!(f, "groups.{name}"),
            Self::Project(name) => write!(f, "projects.{name}"),
        }
    }
}

impl ImageLists {
    /// Every (entry, path) pair, groups first.
    pub fn entries(&self) -> impl Iterator<Item = (EntryRef, &str)> + '_ {
        let groups = self.groups.iter().flat_map(|(name, paths)| {
            paths
                .iter()
                .map(move |p| (EntryRef::Group(name.clone()), p.as_str()))
        });
        let projects = self.projects.iter().flat_map(|(name, paths)| {
            paths
                .iter()
                .map(move |p| (EntryRef::Project(name.clone()), p.as_str()))
        });
        groups.chain(projects)
    }

    /// Distinct paths in first-seen order.
    pub fn unique_paths(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.entries()
            .map(|(_, path)| path)
            .filter(|path| seen.insert(*path))
            .collect()
    }

    /// Total number of path slots (duplicates counted).
    pub fn path_count(&self) -> usize {
        self.groups.values().chain(self.projects.values()).map(Vec::len).sum()
    }

    /// Replace every occurrence of `old` with `new`, returning the count.
    pub fn replace_path(&mut self, old: &str, new: &str) -> usize {
        let mut replaced = 0;
        for paths in self.groups.values_mut().chain(self.projects.values_mut()) {
            for path in paths.iter_mut().filter(|p| p.as_str() == old) {
                *path = new.to_string();
                replaced += 1;
            }
        }
        replaced
    }

    /// Paths that do not start with `/images/`.
    pub fn stray_paths(&self) -> Vec<(EntryRef, &str)> {
        self.entries()
            .filter(|(_, path)| !path.starts_with(IMAGES_PREFIX))
            .collect()
    }

    /// Copy keeping only `/images/...` paths. Entries left empty are kept.
    pub fn image_paths(&self) -> Self {
        let keep = |map: &BTreeMap<String, Vec<String>>| {
            map.iter()
                .map(|(name, paths)| {
                    let kept = paths
                        .iter()
                        .filter(|p| p.starts_with(IMAGES_PREFIX))
                        .cloned()
                        .collect();
                    (name.clone(), kept)
                })
                .collect()
        };
        Self {
            groups: keep(&self.groups),
            projects: keep(&self.projects),
        }
    }
}

/// The registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(flatten)]
    pub lists: ImageLists,
}

const fn default_version() -> u32 {
    REGISTRY_VERSION
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            version: REGISTRY_VERSION,
            lists: ImageLists::default(),
        }
    }
}

impl Registry {
    /// Load the registry, failing with a directive if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ToolError> {
        if !path.is_file() {
            return Err(ToolError::MissingRegistry(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|err| ToolError::Io(path.to_path_buf(), err))?;
        Self::from_json(&content).map_err(|err| ToolError::Json(path.to_path_buf(), err))
    }

    /// Load the registry, or an empty one if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, ToolError> {
        match Self::load(path) {
            Err(ToolError::MissingRegistry(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Write the registry, creating parent directories.
    ///
    /// Returns `false` without touching the file if its content is unchanged.
    pub fn save(&self, path: &Path) -> Result<bool, ToolError> {
        let json = to_pretty_json(self, path)?;
        if fs::read_to_string(path).is_ok_and(|existing| existing == json) {
            return Ok(false);
        }
        write_file(path, &json)?;
        Ok(true)
    }
}

/// Pretty JSON with a trailing newline, destined for `path`.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T, path: &Path) -> Result<String, ToolError> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|err| ToolError::Json(path.to_path_buf(), err))?;
    json.push('\n');
    Ok(json)
}

/// Write `content` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), ToolError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| ToolError::Io(parent.to_path_buf(), err))?;
    }
    fs::write(path, content).map_err(|err| ToolError::Io(path.to_path_buf(), err))
}

#[cfg(test)]
pub(crate) fn lists(groups: &[(&str, &[&str])], projects: &[(&str, &[&str])]) -> ImageLists {
    let to_map = |items: &[(&str, &[&str])]| {
        items
            .iter()
            .map(|(name, paths)| {
                (
                    name.to_string(),
                    paths.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    };
    ImageLists {
        groups: to_map(groups),
        projects: to_map(projects),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_registry() {
        let registry = Registry::from_json(
            r#"{
  "version": 1,
  "groups": { "threeTabImages": ["/images/three-tab/a.jpg"] },
  "projects": { "ProjectA": ["/images/uploads/photo_1.jpg"] }
}"#,
        )
        .unwrap();
        assert_eq!(registry.lists.groups["threeTabImages"], vec!["/images/three-tab/a.jpg"]);
        assert_eq!(registry.lists.projects["ProjectA"].len(), 1);
    }

    #[test]
    fn test_missing_sections_default() {
        let registry = Registry::from_json("{}").unwrap();
        assert_eq!(registry, Registry::default());
    }

    #[test]
    fn test_entries_and_unique_paths() {
        let lists = lists(
            &[("hero", &["/images/a.jpg", "/images/b.jpg"])],
            &[("P", &["/images/a.jpg", "/images/c.jpg"])],
        );
        assert_eq!(lists.path_count(), 4);
        assert_eq!(
            lists.unique_paths(),
            vec!["/images/a.jpg", "/images/b.jpg", "/images/c.jpg"]
        );
        let first = lists.entries().next().unwrap();
        assert_eq!(first.0.to_string(), "groups.hero");
    }

    #[test]
    fn test_replace_path_everywhere() {
        let mut lists = lists(
            &[("hero", &["/images/a.jpg"])],
            &[("P", &["/images/a.jpg", "/images/a.jpg.bak"])],
        );
        assert_eq!(lists.replace_path("/images/a.jpg", "/images/z.jpg"), 2);
        assert_eq!(lists.groups["hero"], vec!["/images/z.jpg"]);
        // Whole-value replacement only
        assert_eq!(lists.projects["P"][1], "/images/a.jpg.bak");
    }

    #[test]
    fn test_unserializable_value_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let bad: BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();

        let err = to_pretty_json(&bad, &path).unwrap_err();
        assert!(matches!(err, ToolError::Json(p, _) if p == path));
        assert!(!path.exists());
    }

    #[test]
    fn test_image_paths_drops_strays() {
        let lists = lists(
            &[("hero", &["/img/bad.png", "/images/a.jpg"])],
            &[("P", &["uploads/b.jpg"])],
        );
        assert_eq!(lists.stray_paths().len(), 2);

        let kept = lists.image_paths();
        assert_eq!(kept.groups["hero"], vec!["/images/a.jpg"]);
        assert!(kept.projects["P"].is_empty());
        assert!(kept.stray_paths().is_empty());
    }

    #[test]
    fn test_stray_paths() {
        let lists = lists(&[("g", &["/images/ok.png", "/img/bad.png"])], &[]);
        let stray = lists.stray_paths();
        assert_eq!(stray.len(), 1);
        assert_eq!(stray[0].1, "/img/bad.png");
    }

    #[test]
    fn test_load_missing_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        assert!(matches!(
            Registry::load(&path),
            Err(ToolError::MissingRegistry(_))
        ));
        assert_eq!(Registry::load_or_default(&path).unwrap(), Registry::default());
    }

    #[test]
    fn test_save_skips_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gen").join("registry.json");
        let registry = Registry {
            version: REGISTRY_VERSION,
            lists: lists(&[("g", &["/images/a.png"])], &[]),
        };
        assert!(registry.save(&path).unwrap());
        assert!(!registry.save(&path).unwrap());
        assert_eq!(Registry::load(&path).unwrap(), registry);
    }

    #[test]
    fn test_malformed_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Registry::load(&path), Err(ToolError::Json(..))));
    }
}
