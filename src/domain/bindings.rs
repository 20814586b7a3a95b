//! Binding engine: wires already-registered resources together.
//!
//! Three binding classes exist: object-store notifications into queues,
//! queue event sources feeding compute units, and access grants between
//! compute units and stores. Each operation requires both ends to be
//! registered, and applying the identical binding twice is a no-op so a
//! partially-applied graph can be converged by re-running assembly.

use std::collections::BTreeSet;

use crate::domain::registry::ResourceRegistry;
use crate::domain::resources::{AccessGrant, NotificationRule, Permission, ResourceAttributes};
use crate::error::AssemblyError;

#[derive(Debug, Default)]
pub struct BindingEngine {
    grants: Vec<AccessGrant>,
}

impl BindingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grants(&self) -> &[AccessGrant] {
        &self.grants
    }

    pub fn into_grants(self) -> Vec<AccessGrant> {
        self.grants
    }

    /// Append a notification rule to `store`. The rule's destination
    /// queue must already be registered.
    pub fn bind_notification(
        &mut self,
        registry: &mut ResourceRegistry,
        store: &str,
        rule: NotificationRule,
    ) -> Result<(), AssemblyError> {
        registry.expect_queue(&rule.destination)?;
        registry.expect_object_store(store)?;

        let decl = registry.get_mut(store).unwrap_or_else(|| {
            unreachable!("store existence checked above")
        });
        if let ResourceAttributes::ObjectStore {
            notification_rules, ..
        } = &mut decl.attributes
        {
            if !notification_rules.contains(&rule) {
                tracing::debug!(store, destination = %rule.destination, suffix = %rule.key_suffix, "bound notification");
                notification_rules.push(rule);
            }
        }
        Ok(())
    }

    /// Register `queue` as an event source of `unit`. Messages are
    /// delivered at least once; the unit must tolerate redelivery.
    pub fn bind_event_source(
        &mut self,
        registry: &mut ResourceRegistry,
        unit: &str,
        queue: &str,
    ) -> Result<(), AssemblyError> {
        registry.expect_queue(queue)?;
        registry.expect_compute_unit(unit)?;

        let decl = registry.get_mut(unit).unwrap_or_else(|| {
            unreachable!("unit existence checked above")
        });
        if let ResourceAttributes::ComputeUnit { event_sources, .. } = &mut decl.attributes {
            if !event_sources.iter().any(|s| s == queue) {
                tracing::debug!(unit, queue, "bound event source");
                event_sources.push(queue.to_string());
            }
        }
        Ok(())
    }

    /// Grant `unit` the given permissions on `store`. Identical grants
    /// collapse to one; differing permission sets are kept separately.
    pub fn grant_access(
        &mut self,
        registry: &ResourceRegistry,
        unit: &str,
        store: &str,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<(), AssemblyError> {
        registry.expect_compute_unit(unit)?;
        registry.expect_object_store(store)?;

        let grant = AccessGrant {
            subject: unit.to_string(),
            object: store.to_string(),
            permissions: BTreeSet::from_iter(permissions),
        };
        if !self.grants.contains(&grant) {
            tracing::debug!(unit, store, ?grant.permissions, "granted access");
            self.grants.push(grant);
        }
        Ok(())
    }
}
