//! Byte-signature classification of image files.
//!
//! A CDN that answers a missing image with an HTML error page leaves a
//! `.jpg` on disk that is really markup. Only the leading bytes decide
//! what a file is; the extension is never trusted.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Files shorter than this are never images.
const MIN_LEN: usize = 8;

/// Bytes inspected for the markup check.
const SNIFF_LEN: usize = 64;

/// What the leading bytes of a file say it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    Jpeg,
    Png,
    /// Text starting with `<` (HTML error or placeholder page).
    Html,
    /// Readable, but neither a known image nor markup (or too short).
    Unknown,
    /// Does not exist, or is not a regular file.
    Missing,
}

impl Signature {
    #[inline]
    pub const fn is_real_image(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

/// Classify the file at `path`. Never fails: I/O errors read as `Unknown`.
pub fn classify(path: &Path) -> Signature {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => return Signature::Missing,
    }
    match read_head(path) {
        Ok(head) => classify_bytes(&head),
        Err(_) => Signature::Unknown,
    }
}

/// Whether `path` is a genuine JPEG or PNG.
#[inline]
pub fn is_real_image(path: &Path) -> bool {
    classify(path).is_real_image()
}

/// Classify the first bytes of a file.
pub fn classify_bytes(head: &[u8]) -> Signature {
    let head = &head[..head.len().min(SNIFF_LEN)];
    if looks_like_markup(head) {
        return Signature::Html;
    }
    if head.len() < MIN_LEN {
        Signature::Unknown
    } else if head.starts_with(&JPEG_MAGIC) {
        Signature::Jpeg
    } else if head.starts_with(&PNG_MAGIC) {
        Signature::Png
    } else {
        Signature::Unknown
    }
}

fn looks_like_markup(head: &[u8]) -> bool {
    String::from_utf8_lossy(head).trim_start().starts_with('<')
}

fn read_head(path: &Path) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(head)
}
