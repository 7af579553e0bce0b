//! Import of a legacy generated registry source file.
//!
//! Older projects kept the registry as generated script source:
//!
//! ```text
//! export const threeTabImages = [
//!   "/images/three-tab/shingle_1.jpg",
//! ];
//! export const projectImages: Record<string, string[]> = {
//!   "ProjectA": ["/images/uploads/photo_1.jpg"],
//! };
//! ```
//!
//! Path literals are grouped by their enclosing declaration. The object
//! declaration named by `import.projects_const` becomes `projects`; every
//! other declaration holding at least one `/images/` literal becomes a group.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{ImageLists, Registry};
use crate::config::ImgregConfig;
use crate::error::ToolError;

static DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:export[ \t]+)?(?:const|let|var)[ \t]+([A-Za-z_$][A-Za-z0-9_$]*)[^=;]*=[ \t\r\n]*([\[{]?)",
    )
    .unwrap()
});

static LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(/images/[^"]*)"|'(/images/[^']*)'|`(/images/[^`]*)`"#)
        .unwrap()
});

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:"([^"]+)"|'([^']+)'|([A-Za-z_$][A-Za-z0-9_$]*))[ \t\r\n]*:[ \t\r\n]*\[([^\]]*)\]"#,
    )
    .unwrap()
});

/// Outcome of an import.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub groups: usize,
    pub projects: usize,
    pub paths: usize,
}

struct Declaration<'a> {
    name: &'a str,
    /// `[` or `{`; empty for scalar declarations.
    opener: &'a str,
    start: usize,
    body_start: usize,
}

/// Every `/images/...` string literal in `text`, in order.
pub fn path_literals(text: &str) -> Vec<String> {
    LITERAL_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse legacy registry source into structured lists.
pub fn parse_legacy(source: &str, projects_const: &str) -> ImageLists {
    let decls: Vec<Declaration<'_>> = DECL_RE
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Declaration {
                name: caps.get(1)?.as_str(),
                opener: caps.get(2)?.as_str(),
                start: whole.start(),
                body_start: whole.end(),
            })
        })
        .collect();

    let mut lists = ImageLists::default();

    for (i, decl) in decls.iter().enumerate() {
        let body_end = decls.get(i + 1).map_or(source.len(), |next| next.start);
        let body = &source[decl.body_start..body_end];

        // Scalars still bound the previous declaration's body
        if decl.opener.is_empty() {
            continue;
        }

        if decl.opener == "{" && decl.name == projects_const {
            for caps in ENTRY_RE.captures_iter(body) {
                let Some(key) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
                    continue;
                };
                let paths = caps.get(4).map(|m| path_literals(m.as_str())).unwrap_or_default();
                lists
                    .projects
                    .entry(key.as_str().to_string())
                    .or_default()
                    .extend(paths);
            }
            continue;
        }

        let paths = path_literals(body);
        if !paths.is_empty() {
            lists.groups.entry(decl.name.to_string()).or_default().extend(paths);
        }
    }

    lists
}

/// Convert the legacy source at `source` into the registry file.
pub fn import_legacy(
    config: &ImgregConfig,
    source: &Path,
    force: bool,
) -> Result<ImportReport, ToolError> {
    if !source.is_file() {
        return Err(ToolError::MissingSource(source.to_path_buf()));
    }
    let registry_path = config.registry_path();
    if registry_path.exists() && !force {
        return Err(ToolError::RegistryExists(registry_path));
    }

    let text = fs::read_to_string(source).map_err(|err| ToolError::Io(source.to_path_buf(), err))?;
    let lists = parse_legacy(&text, &config.import.projects_const);
    let report = ImportReport {
        groups: lists.groups.len(),
        projects: lists.projects.len(),
        paths: lists.path_count(),
    };

    let registry = Registry {
        lists,
        ..Registry::default()
    };
    registry.save(&registry_path)?;
    Ok(report)
}
