//! Path helpers.
//!
//! Registry paths are URL-like (`/images/roofs/a.jpg`, forward slashes,
//! rooted at the public directory); these helpers convert between them and
//! file system paths.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to joining with the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Registry form of `path` relative to `public`, e.g. `/images/a.jpg`.
///
/// Returns `None` when `path` is not under `public`.
pub fn to_registry_path(public: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(public).ok()?;
    Some(format!("/{}", to_slash(rel)))
}

/// File system location of a registry path under `public`.
pub fn resolve_registry_path(public: &Path, registry_path: &str) -> PathBuf {
    let rel = registry_path.trim_start_matches('/');
    rel.split('/')
        .filter(|part| !part.is_empty())
        .fold(public.to_path_buf(), |acc, part| acc.join(part))
}

/// Final component of a registry path (`/images/a/b.jpg` -> `b.jpg`).
pub fn registry_basename(registry_path: &str) -> &str {
    registry_path.rsplit('/').next().unwrap_or(registry_path)
}

/// Lower-case extension of a file name, without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
