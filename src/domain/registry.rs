//! Append-only resource registry for one stack assembly run.
//!
//! Declarations are registered in dependency order: a resource must be
//! present here before anything may reference it. The registry owns the
//! prefix used for physical naming and rejects both logical and derived
//! physical name collisions.

use std::collections::BTreeMap;

use crate::domain::naming;
use crate::domain::resources::{
    ComputeUnitSpec, ObjectStoreSpec, ResourceAttributes, ResourceDeclaration,
};
use crate::domain::routes::{PathNode, RouteEntry};
use crate::error::AssemblyError;

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    prefix: String,
    resources: Vec<ResourceDeclaration>,
}

impl ResourceRegistry {
    /// A registry with the stack-wide naming prefix. Pass an empty
    /// prefix for revisions that name resources without one.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            resources: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, logical: &str) -> Option<&ResourceDeclaration> {
        self.resources.iter().find(|r| r.logical_name == logical)
    }

    pub(crate) fn get_mut(&mut self, logical: &str) -> Option<&mut ResourceDeclaration> {
        self.resources
            .iter_mut()
            .find(|r| r.logical_name == logical)
    }

    pub fn into_resources(self) -> Vec<ResourceDeclaration> {
        self.resources
    }

    fn register(
        &mut self,
        logical: &str,
        attributes: ResourceAttributes,
    ) -> Result<String, AssemblyError> {
        let physical = naming::physical_name(&self.prefix, logical);
        if self.resources.iter().any(|r| r.logical_name == logical) {
            return Err(AssemblyError::DuplicateName(logical.to_string()));
        }
        if self.resources.iter().any(|r| r.physical_name == physical) {
            return Err(AssemblyError::DuplicateName(physical));
        }

        tracing::debug!(logical, physical = %physical, kind = attributes.kind_name(), "registered resource");
        self.resources.push(ResourceDeclaration {
            logical_name: logical.to_string(),
            physical_name: physical.clone(),
            attributes,
        });
        Ok(physical)
    }

    /// Declare a versioned or unversioned object store. Returns the
    /// derived physical name.
    pub fn declare_object_store(
        &mut self,
        logical: &str,
        spec: ObjectStoreSpec,
    ) -> Result<String, AssemblyError> {
        self.register(
            logical,
            ResourceAttributes::ObjectStore {
                versioned: spec.versioned,
                notification_rules: Vec::new(),
            },
        )
    }

    /// Declare a compute unit. The environment in `spec` must already
    /// hold final values; see [`propagate_store_identifier`].
    pub fn declare_compute_unit(
        &mut self,
        logical: &str,
        spec: ComputeUnitSpec,
    ) -> Result<String, AssemblyError> {
        self.register(
            logical,
            ResourceAttributes::ComputeUnit {
                entry_point: spec.entry_point,
                runtime: spec.runtime,
                environment: spec.environment,
                event_sources: Vec::new(),
            },
        )
    }

    pub fn declare_queue(&mut self, logical: &str) -> Result<String, AssemblyError> {
        self.register(logical, ResourceAttributes::Queue {})
    }

    pub fn declare_routed_api(&mut self, logical: &str) -> Result<String, AssemblyError> {
        self.register(
            logical,
            ResourceAttributes::RoutedApi {
                root: PathNode::default(),
                routes: Vec::new(),
            },
        )
    }

    /// Physical identifier of a registered object store.
    pub fn store_identifier(&self, logical: &str) -> Result<&str, AssemblyError> {
        let decl = self.expect_kind(logical, "ObjectStore")?;
        Ok(&decl.physical_name)
    }

    pub(crate) fn expect_compute_unit(
        &self,
        logical: &str,
    ) -> Result<&ResourceDeclaration, AssemblyError> {
        self.expect_kind(logical, "ComputeUnit")
    }

    pub(crate) fn expect_queue(&self, logical: &str) -> Result<&ResourceDeclaration, AssemblyError> {
        self.expect_kind(logical, "Queue")
    }

    pub(crate) fn expect_object_store(
        &self,
        logical: &str,
    ) -> Result<&ResourceDeclaration, AssemblyError> {
        self.expect_kind(logical, "ObjectStore")
    }

    fn expect_kind(
        &self,
        logical: &str,
        kind: &'static str,
    ) -> Result<&ResourceDeclaration, AssemblyError> {
        match self.get(logical) {
            Some(decl) if decl.attributes.kind_name() == kind => Ok(decl),
            Some(decl) => Err(AssemblyError::UnresolvedReference(format!(
                "{} is a {}, expected {}",
                logical,
                decl.attributes.kind_name(),
                kind
            ))),
            None => Err(AssemblyError::UnresolvedReference(format!(
                "{} is not registered",
                logical
            ))),
        }
    }

    /// Routes registered on a routed API, in declaration order.
    pub fn api_routes(&self, logical: &str) -> Result<&[RouteEntry], AssemblyError> {
        match &self.expect_kind(logical, "RoutedApi")?.attributes {
            ResourceAttributes::RoutedApi { routes, .. } => Ok(routes),
            _ => unreachable!("expect_kind checked the attribute kind"),
        }
    }

    #[cfg(test)]
    pub(crate) fn api_segment_count(&self, logical: &str) -> Result<usize, AssemblyError> {
        match &self.expect_kind(logical, "RoutedApi")?.attributes {
            ResourceAttributes::RoutedApi { root, .. } => Ok(root.segment_count()),
            _ => unreachable!("expect_kind checked the attribute kind"),
        }
    }
}

/// Configuration propagator: copies the resolved physical identifier of
/// an already-declared object store into a compute unit environment under
/// `key`. Fails when the store has not been registered yet, which is what
/// enforces declaration order.
pub fn propagate_store_identifier(
    registry: &ResourceRegistry,
    store: &str,
    key: &str,
    environment: &mut BTreeMap<String, String>,
) -> Result<(), AssemblyError> {
    let identifier = registry.store_identifier(store)?;
    environment.insert(key.to_string(), identifier.to_string());
    Ok(())
}
