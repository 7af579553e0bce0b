//! Image assets under the public directory.
//!
//! ```text
//! public/
//! └── images/
//!     ├── three-tab/
//!     │   └── shingle_1.jpg   -> /images/three-tab/shingle_1.jpg
//!     └── uploads/
//!         └── photo_1.png     -> /images/uploads/photo_1.png
//! ```

mod cache;
pub mod clean;
mod scan;
mod signature;

use std::path::{Path, PathBuf};

use crate::utils::path::{extension_of, to_registry_path};

// Existence cache
pub use cache::ImageCache;

// Scanning (pure functions)
pub use scan::{collect_images, list_recursive};

// Byte-signature classification
pub use signature::{Signature, classify};

#[cfg(test)]
pub(crate) use signature::fixtures;

/// Extensions treated as images for scanning and name normalization.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Whether the file name carries an image extension (case-insensitive).
pub fn has_image_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| extension_of(&name.to_string_lossy()))
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// A file found under the public directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Absolute file system path.
    pub absolute: PathBuf,
    /// Registry path rooted at the public directory (`/images/...`).
    pub relative: String,
    /// Lower-case extension without the dot (empty if none).
    pub extension: String,
}

impl AssetFile {
    /// Describe `path` relative to `public`. `None` if it lies outside.
    pub fn from_path(public: &Path, path: &Path) -> Option<Self> {
        let relative = to_registry_path(public, path)?;
        let extension = path
            .file_name()
            .and_then(|name| extension_of(&name.to_string_lossy()))
            .unwrap_or_default();
        Some(Self {
            absolute: path.to_path_buf(),
            relative,
            extension,
        })
    }

    /// File name component (`photo_1.jpg`).
    pub fn basename(&self) -> String {
        self.absolute
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("a/b/Photo.JPG")));
        assert!(has_image_extension(Path::new("x.webp")));
        assert!(!has_image_extension(Path::new("notes.txt")));
        assert!(!has_image_extension(Path::new("jpg")));
    }

    #[test]
    fn test_asset_file_from_path() {
        let public = Path::new("/site/public");
        let asset =
            AssetFile::from_path(public, &public.join("images/uploads/Photo_1.PNG")).unwrap();
        assert_eq!(asset.relative, "/images/uploads/Photo_1.PNG");
        assert_eq!(asset.extension, "png");
        assert_eq!(asset.basename(), "Photo_1.PNG");
    }
}
