//! The assembled resource graph handed to the provisioning engine.

use serde::Serialize;

use crate::domain::resources::{AccessGrant, ResourceAttributes, ResourceDeclaration};

/// Fully-populated, internally consistent declaration graph. Produced
/// once per assembly run and not mutated afterwards; the provisioning
/// engine applies it as a unit.
#[derive(Debug, Serialize)]
pub struct ResourceGraph {
    pub resources: Vec<ResourceDeclaration>,
    pub grants: Vec<AccessGrant>,
}

impl ResourceGraph {
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn get(&self, logical: &str) -> Option<&ResourceDeclaration> {
        self.resources.iter().find(|r| r.logical_name == logical)
    }

    /// One line per resource, for the deployment log.
    pub fn summary(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|r| {
                format!(
                    "{} {} -> {}",
                    r.attributes.kind_name(),
                    r.logical_name,
                    r.physical_name
                )
            })
            .collect()
    }

    pub fn kind_count(&self, kind: &str) -> usize {
        self.resources
            .iter()
            .filter(|r| r.attributes.kind_name() == kind)
            .count()
    }
}

impl ResourceGraph {
    pub fn notification_rules_of(&self, store: &str) -> &[crate::domain::resources::NotificationRule] {
        match self.get(store).map(|r| &r.attributes) {
            Some(ResourceAttributes::ObjectStore {
                notification_rules, ..
            }) => notification_rules,
            _ => &[],
        }
    }

    pub fn event_sources_of(&self, unit: &str) -> &[String] {
        match self.get(unit).map(|r| &r.attributes) {
            Some(ResourceAttributes::ComputeUnit { event_sources, .. }) => event_sources,
            _ => &[],
        }
    }

    pub fn environment_of(&self, unit: &str) -> Option<&std::collections::BTreeMap<String, String>> {
        match self.get(unit).map(|r| &r.attributes) {
            Some(ResourceAttributes::ComputeUnit { environment, .. }) => Some(environment),
            _ => None,
        }
    }
}
