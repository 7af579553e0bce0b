//! Removal of HTML impostors saved with an image extension.
//!
//! The only code path that writes to the asset tree. It deletes, and never
//! creates, files.

use std::fs;
use std::path::Path;

use crate::error::ToolError;

use super::{AssetFile, ImageCache, Signature, has_image_extension, list_recursive};

/// Find files under `dir` that have an image extension but contain markup.
pub fn find_impostors(public: &Path, dir: &Path, cache: &mut ImageCache) -> Vec<AssetFile> {
    list_recursive(dir)
        .into_iter()
        .filter(|path| has_image_extension(path))
        .filter(|path| cache.check(path) == Signature::Html)
        .filter_map(|path| AssetFile::from_path(public, &path))
        .collect()
}

/// Delete the given impostors, returning how many were removed.
pub fn remove_impostors(
    impostors: &[AssetFile],
    cache: &mut ImageCache,
) -> Result<usize, ToolError> {
    for asset in impostors {
        fs::remove_file(&asset.absolute)
            .map_err(|err| ToolError::Io(asset.absolute.clone(), err))?;
        cache.invalidate(&asset.absolute);
    }
    Ok(impostors.len())
}

#[cfg(test)]
mod tests {
    use super::super::signature::fixtures::{HTML_404, JPEG};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_and_remove_impostors() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().to_path_buf();
        let images = public.join("images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("good.jpg"), JPEG).unwrap();
        fs::write(images.join("bad.jpg"), HTML_404).unwrap();
        fs::write(images.join("page.html"), HTML_404).unwrap();

        let mut cache = ImageCache::new();
        let impostors = find_impostors(&public, &images, &mut cache);
        assert_eq!(impostors.len(), 1);
        assert_eq!(impostors[0].relative, "/images/bad.jpg");

        let removed = remove_impostors(&impostors, &mut cache).unwrap();
        assert_eq!(removed, 1);
        assert!(!images.join("bad.jpg").exists());
        assert!(images.join("good.jpg").exists());
        assert!(images.join("page.html").exists());
        assert_eq!(cache.check(&images.join("bad.jpg")), Signature::Missing);
    }
}
