//! Asset scanning functions (pure, no side effects).

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use super::{AssetFile, ImageCache, has_image_extension};

/// List every file under `dir`, depth first.
///
/// A missing root yields an empty list rather than an error. Entries are
/// sorted within each directory so repeated runs print the same order.
/// Symlinked directories are not followed; a symlink to a regular file is
/// listed like the file itself.
pub fn list_recursive(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .skip_hidden(false)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            let kind = e.file_type();
            kind.is_file() || (kind.is_symlink() && e.path().is_file())
        })
        .map(|e| e.path())
        .collect()
}

/// Collect the real images under each of `roots`.
///
/// Files are kept only if they have an image extension and pass the
/// signature check. Overlapping roots do not produce duplicates.
///
/// ```text
/// public/images/uploads/photo_1.jpg   (JPEG bytes)  -> kept
/// public/images/uploads/photo_2.jpg   (HTML page)   -> skipped
/// public/images/uploads/notes.txt                   -> skipped
/// ```
pub fn collect_images(
    public: &Path,
    roots: &[PathBuf],
    cache: &mut ImageCache,
) -> Vec<AssetFile> {
    let mut seen = FxHashSet::default();
    let mut results = Vec::new();

    for root in roots {
        for path in list_recursive(root) {
            if !has_image_extension(&path) || !seen.insert(path.clone()) {
                continue;
            }
            if !cache.check(&path).is_real_image() {
                continue;
            }
            if let Some(asset) = AssetFile::from_path(public, &path) {
                results.push(asset);
            }
        }
    }

    results
}
