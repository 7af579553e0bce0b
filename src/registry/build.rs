//! Regenerate the `projects` section of the registry from routes.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use super::{Registry, Route, RouteMap, load_routes};
use crate::asset::{AssetFile, ImageCache, collect_images};
use crate::config::ImgregConfig;
use crate::error::ToolError;
use crate::log;
use crate::utils::{natural_cmp, plural_count};

/// A route that selected no images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyRoute {
    pub project: String,
    pub route: Route,
}

/// Outcome of a registry build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Real images found under the images directory.
    pub scanned: usize,
    /// Projects written to the registry.
    pub projects: usize,
    /// Paths across all projects.
    pub images: usize,
    pub empty_routes: Vec<EmptyRoute>,
    /// Whether the registry file was rewritten.
    pub changed: bool,
}

/// Resolve each project's routes against the scanned images.
///
/// Paths are de-duplicated and naturally sorted per project. Routes that
/// match nothing are returned alongside rather than dropped silently.
pub fn match_projects(
    routes: &RouteMap,
    images: &[AssetFile],
) -> (BTreeMap<String, Vec<String>>, Vec<EmptyRoute>) {
    let lowered: Vec<(String, &str)> = images
        .iter()
        .map(|a| (a.relative.to_lowercase(), a.relative.as_str()))
        .collect();

    let mut projects = BTreeMap::new();
    let mut empty_routes = Vec::new();

    for (project, project_routes) in routes {
        let mut seen = FxHashSet::default();
        let mut paths = Vec::new();

        for route in project_routes {
            let needle = route.needle();
            let mut hit = false;
            for (lower, original) in &lowered {
                if !lower.contains(&needle) {
                    continue;
                }
                hit = true;
                if seen.insert(*original) {
                    paths.push((*original).to_string());
                }
            }
            if !hit {
                empty_routes.push(EmptyRoute {
                    project: project.clone(),
                    route: route.clone(),
                });
            }
        }

        paths.sort_by(|a, b| natural_cmp(a, b));
        projects.insert(project.clone(), paths);
    }

    (projects, empty_routes)
}

/// Scan images, resolve routes and write the registry.
///
/// Hand-maintained `groups` in an existing registry are kept as-is. In
/// strict mode a route that matches nothing fails the build before the
/// registry is written.
pub fn build_registry(
    config: &ImgregConfig,
    strict: bool,
    cache: &mut ImageCache,
) -> Result<BuildReport, ToolError> {
    let routes = load_routes(&config.routes_path())?;
    let images = collect_images(&config.public_dir(), &[config.images_dir()], cache);
    log!(
        "build";
        "found {} under {}",
        plural_count(images.len(), "image"),
        config.display(&config.images_dir())
    );

    let (projects, empty_routes) = match_projects(&routes, &images);

    for empty in &empty_routes {
        log!("warning"; "route `{}` of `{}` matched no images", empty.route, empty.project);
    }
    if strict && !empty_routes.is_empty() {
        return Err(ToolError::EmptyRoutes {
            count: empty_routes.len(),
        });
    }

    let registry_path = config.registry_path();
    let mut registry = Registry::load_or_default(&registry_path)?;
    registry.lists.projects = projects;
    let changed = registry.save(&registry_path)?;

    Ok(BuildReport {
        scanned: images.len(),
        projects: registry.lists.projects.len(),
        images: registry.lists.projects.values().map(Vec::len).sum(),
        empty_routes,
        changed,
    })
}
