//! Fuzzy file-name matching for repair candidates.

use std::sync::LazyLock;

use regex::Regex;

use crate::asset::{AssetFile, IMAGE_EXTENSIONS};
use crate::utils::path::{extension_of, registry_basename};

/// Parenthesized groups such as the `(1)` browsers add to duplicate downloads.
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Maximum alternatives kept per broken path by default.
pub const DEFAULT_MAX_CANDIDATES: usize = 6;

const SAME_EXTENSION: i32 = 5;
const SAME_KEY: i32 = 10;
const CONTAINS_KEY: i32 = 4;
const COPY_PENALTY: i32 = -3;

/// Comparison key for a file name.
///
/// `Photo (1) copy.JPG` and `photo.jpg` both normalize to `photo`. Every
/// `copy`, upper or lower case and even inside a word, is dropped.
pub fn normalize(name: &str) -> String {
    let mut lower = name.to_lowercase();
    if let Some(ext) = extension_of(&lower)
        && IMAGE_EXTENSIONS.contains(&ext.as_str())
    {
        lower.truncate(lower.len() - ext.len() - 1);
    }

    let stripped = PAREN_RE.replace_all(&lower, " ").replace("copy", "");
    stripped
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Score `candidate` as a replacement for a file named `target_name`.
///
/// `target_ext` is compared case-insensitively. Anything at or below zero
/// is not a match.
pub fn score(target_name: &str, target_ext: &str, candidate: &AssetFile) -> i32 {
    let candidate_name = candidate.basename();
    let target_key = normalize(target_name);
    let candidate_key = normalize(&candidate_name);

    let mut total = 0;
    if !target_ext.is_empty() && candidate.extension.eq_ignore_ascii_case(target_ext) {
        total += SAME_EXTENSION;
    }
    if target_key == candidate_key {
        total += SAME_KEY;
    } else if !target_key.is_empty()
        && !candidate_key.is_empty()
        && (target_key.contains(&candidate_key) || candidate_key.contains(&target_key))
    {
        total += CONTAINS_KEY;
    }
    if candidate_name.to_lowercase().contains("copy") {
        total += COPY_PENALTY;
    }
    total
}

/// A real image proposed as a replacement for a broken path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Registry path of the replacement.
    pub path: String,
    pub score: i32,
}

/// Score every indexed image against the broken `target` registry path.
///
/// Non-positive scores are dropped. The sort is stable, so equal scores
/// keep index order; at most `max` candidates are returned, best first.
pub fn rank_candidates(target: &str, index: &[AssetFile], max: usize) -> Vec<Candidate> {
    let name = registry_basename(target);
    let ext = extension_of(name).unwrap_or_default();

    let mut ranked: Vec<Candidate> = index
        .iter()
        .map(|asset| Candidate {
            path: asset.relative.clone(),
            score: score(name, &ext, asset),
        })
        .filter(|c| c.score > 0)
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(max);
    ranked
}
