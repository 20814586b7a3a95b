//! Route table for routed APIs.
//!
//! Path segments form a tree rooted at the API. Segments are created on
//! demand and memoized, so requesting `jobs` twice resolves to the same
//! node. Each node maps HTTP methods to a compute unit integration.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::registry::ResourceRegistry;
use crate::domain::resources::ResourceAttributes;
use crate::error::AssemblyError;

/// One node in an API's path tree.
#[derive(Debug, Clone, Default)]
pub struct PathNode {
    children: BTreeMap<String, PathNode>,
    /// HTTP method -> logical name of the integrated compute unit
    methods: BTreeMap<String, String>,
}

impl PathNode {
    /// Number of path segments below this node (the node itself not
    /// counted, so an API with only `/jobs` reports 1).
    pub fn segment_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.segment_count())
            .sum()
    }

    fn resolve_or_create(&mut self, segments: &[&str]) -> &mut PathNode {
        let mut node = self;
        for segment in segments {
            node = node.children.entry((*segment).to_string()).or_default();
        }
        node
    }
}

/// A registered (path, method) -> target mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: Vec<String>,
    pub method: String,
    /// Logical name of the target compute unit
    pub target: String,
}

/// Register `method` on `/seg0/seg1/...` of `api`, integrated with the
/// compute unit `target`. Re-registering the identical route is a no-op;
/// the same path and method with a different target is a conflict.
pub fn add_route(
    registry: &mut ResourceRegistry,
    api: &str,
    segments: &[&str],
    method: &str,
    target: &str,
) -> Result<(), AssemblyError> {
    registry.expect_compute_unit(target)?;

    let decl = registry.get_mut(api).ok_or_else(|| {
        AssemblyError::UnresolvedReference(format!("routed API {} is not registered", api))
    })?;
    let (root, routes) = match &mut decl.attributes {
        ResourceAttributes::RoutedApi { root, routes } => (root, routes),
        other => {
            return Err(AssemblyError::UnresolvedReference(format!(
                "{} is a {}, not a routed API",
                api,
                other.kind_name()
            )))
        }
    };

    let node = root.resolve_or_create(segments);
    let method = method.to_ascii_uppercase();
    match node.methods.get(&method) {
        Some(existing) if existing == target => Ok(()),
        Some(existing) => Err(AssemblyError::ConflictingRoute {
            path: format!("/{}", segments.join("/")),
            method,
            existing: existing.clone(),
            requested: target.to_string(),
        }),
        None => {
            node.methods.insert(method.clone(), target.to_string());
            routes.push(RouteEntry {
                path: segments.iter().map(|s| s.to_string()).collect(),
                method,
                target: target.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::ResourceRegistry;
    use crate::domain::resources::{ComputeUnitSpec, EntryPoint};
    use std::collections::BTreeMap;

    fn registry_with_api_and_units() -> ResourceRegistry {
        let mut registry = ResourceRegistry::new("");
        for unit in ["UnitA", "UnitB"] {
            registry
                .declare_compute_unit(
                    unit,
                    ComputeUnitSpec {
                        entry_point: EntryPoint::new("lambdas/rest", "post_job.handler"),
                        runtime: "python3.12".to_string(),
                        environment: BTreeMap::new(),
                    },
                )
                .unwrap();
        }
        registry.declare_routed_api("Api").unwrap();
        registry
    }

    #[test]
    fn test_add_route_is_idempotent_for_same_target() {
        let mut registry = registry_with_api_and_units();
        add_route(&mut registry, "Api", &["jobs"], "POST", "UnitA").unwrap();
        add_route(&mut registry, "Api", &["jobs"], "POST", "UnitA").unwrap();

        let routes = registry.api_routes("Api").unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].target, "UnitA");
    }

    #[test]
    fn test_add_route_conflicts_for_different_target() {
        let mut registry = registry_with_api_and_units();
        add_route(&mut registry, "Api", &["jobs"], "POST", "UnitA").unwrap();
        let err = add_route(&mut registry, "Api", &["jobs"], "POST", "UnitB").unwrap_err();
        assert!(matches!(err, AssemblyError::ConflictingRoute { .. }));
    }

    #[test]
    fn test_path_segments_are_memoized() {
        let mut registry = registry_with_api_and_units();
        add_route(&mut registry, "Api", &["jobs"], "POST", "UnitA").unwrap();
        add_route(&mut registry, "Api", &["jobs", "status"], "GET", "UnitB").unwrap();

        // `jobs` is reused, `status` hangs below it
        assert_eq!(registry.api_segment_count("Api").unwrap(), 2);
    }

    #[test]
    fn test_same_path_different_methods_coexist() {
        let mut registry = registry_with_api_and_units();
        add_route(&mut registry, "Api", &["jobs"], "POST", "UnitA").unwrap();
        add_route(&mut registry, "Api", &["jobs"], "GET", "UnitB").unwrap();
        assert_eq!(registry.api_routes("Api").unwrap().len(), 2);
    }

    #[test]
    fn test_route_to_unregistered_target_fails() {
        let mut registry = registry_with_api_and_units();
        let err = add_route(&mut registry, "Api", &["jobs"], "POST", "Ghost").unwrap_err();
        assert!(matches!(err, AssemblyError::UnresolvedReference(_)));
    }

    #[test]
    fn test_route_on_unregistered_api_fails() {
        let mut registry = registry_with_api_and_units();
        let err = add_route(&mut registry, "GhostApi", &["jobs"], "POST", "UnitA").unwrap_err();
        assert!(matches!(err, AssemblyError::UnresolvedReference(_)));
    }
}
