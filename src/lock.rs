//! Lock snapshot: the registry's lists frozen at a point in time.
//!
//! `verify` checks disk against the lock, not the live registry, so an
//! edit to the registry only takes effect for verification once
//! `imgreg lock` has been run again.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ImgregConfig;
use crate::error::ToolError;
use crate::log;
use crate::registry::{
    IMAGES_PREFIX, ImageLists, REGISTRY_VERSION, Registry, to_pretty_json, write_file,
};
use crate::utils::date::DateTimeUtc;

/// Frozen copy of the registry lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockSnapshot {
    pub version: u32,
    /// RFC 3339 UTC time the snapshot was taken.
    pub generated_at: String,
    #[serde(flatten)]
    pub lists: ImageLists,
}

impl LockSnapshot {
    /// Snapshot the registry's `/images/...` paths; anything else is left out.
    pub fn from_registry(registry: &Registry, at: DateTimeUtc) -> Self {
        Self {
            version: REGISTRY_VERSION,
            generated_at: at.to_rfc3339(),
            lists: registry.lists.image_paths(),
        }
    }

    /// Load the lock, failing with a directive if it was never generated.
    pub fn load(path: &Path) -> Result<Self, ToolError> {
        if !path.is_file() {
            return Err(ToolError::MissingLock(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|err| ToolError::Io(path.to_path_buf(), err))?;
        serde_json::from_str(&content).map_err(|err| ToolError::Json(path.to_path_buf(), err))
    }

    /// Overwrite the lock file.
    pub fn save(&self, path: &Path) -> Result<(), ToolError> {
        write_file(path, &to_pretty_json(self, path)?)
    }

    /// Same lists, ignoring when each snapshot was taken.
    pub fn same_contents(&self, other: &Self) -> bool {
        self.version == other.version && self.lists == other.lists
    }
}

/// Freeze the current registry into the lock file. Always overwrites.
pub fn write_lock(config: &ImgregConfig) -> Result<LockSnapshot, ToolError> {
    let registry = Registry::load(&config.registry_path())?;
    for (entry, path) in registry.lists.stray_paths() {
        log!("warning"; "{} holds `{}` outside {}, not locked", entry, path, IMAGES_PREFIX);
    }
    let snapshot = LockSnapshot::from_registry(&registry, DateTimeUtc::now());
    snapshot.save(&config.lock_path())?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::Fixture;

    #[test]
    fn test_snapshot_json_shape() {
        let registry = Registry {
            version: REGISTRY_VERSION,
            lists: crate::registry::lists(&[("hero", &["/images/a.jpg"])], &[("P", &[])]),
        };
        let snapshot = LockSnapshot::from_registry(&registry, DateTimeUtc::from_unix(0));
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["generatedAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value["groups"]["hero"][0], "/images/a.jpg");
        assert!(value["projects"]["P"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_leaves_out_non_image_paths() {
        let fx = Fixture::new();
        fx.registry(r#"{"groups": {"hero": ["/img/bad.png", "/images/uploads/photo_1.jpg"]}}"#);

        let snapshot = write_lock(&fx.config).unwrap();
        assert_eq!(snapshot.lists.groups["hero"], vec!["/images/uploads/photo_1.jpg"]);

        let reloaded = LockSnapshot::load(&fx.config.lock_path()).unwrap();
        assert!(reloaded.lists.stray_paths().is_empty());
    }

    #[test]
    fn test_lock_twice_differs_only_in_timestamp() {
        let fx = Fixture::new();
        fx.registry(
            r#"{"groups": {"hero": ["/images/a.jpg"]},
                "projects": {"P": ["/images/b.png"]}}"#,
        );

        let first = write_lock(&fx.config).unwrap();
        let second = write_lock(&fx.config).unwrap();
        assert!(first.same_contents(&second));

        let reloaded = LockSnapshot::load(&fx.config.lock_path()).unwrap();
        assert_eq!(reloaded, second);
    }

    #[test]
    fn test_lock_overwrites_previous() {
        let fx = Fixture::new();
        fx.registry(r#"{"groups": {"hero": ["/images/a.jpg"]}}"#);
        write_lock(&fx.config).unwrap();

        fx.registry(r#"{"groups": {"other": ["/images/z.jpg"]}}"#);
        let snapshot = write_lock(&fx.config).unwrap();
        assert!(!snapshot.lists.groups.contains_key("hero"));

        let reloaded = LockSnapshot::load(&fx.config.lock_path()).unwrap();
        assert_eq!(reloaded.lists.groups["other"], vec!["/images/z.jpg"]);
    }

    #[test]
    fn test_lock_requires_registry() {
        let fx = Fixture::new();
        assert!(matches!(
            write_lock(&fx.config),
            Err(ToolError::MissingRegistry(_))
        ));
    }

    #[test]
    fn test_load_missing_lock() {
        let fx = Fixture::new();
        let err = LockSnapshot::load(&fx.config.lock_path()).unwrap_err();
        assert!(matches!(err, ToolError::MissingLock(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_MISSING_LOCK);
    }
}
