//! Typed resource declarations for the pipeline stack.
//!
//! Attribute structs are plain value objects: callers collect every
//! attribute up front, then hand the finished struct to the registry.
//! Declarations are never mutated after the binding and routing phases.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::domain::routes::PathNode;

/// Reference to the packaged code a compute unit executes. The bundle
/// contents are opaque to the stack; only the path and the handler
/// symbol (`module.function`) are carried through.
#[derive(Debug, Clone, Serialize)]
pub struct EntryPoint {
    /// Path to the code bundle, relative to the project root
    pub asset_path: PathBuf,
    /// Handler symbol inside the bundle, e.g. `post_job.handler`
    pub handler: String,
}

impl EntryPoint {
    pub fn new(asset_path: impl Into<PathBuf>, handler: impl Into<String>) -> Self {
        Self {
            asset_path: asset_path.into(),
            handler: handler.into(),
        }
    }
}

/// Event kinds an object store can notify on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    ObjectCreated,
}

/// A store-to-queue notification binding. The provisioning engine is
/// expected to deliver one message to `destination` per created object
/// whose key matches both filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRule {
    pub event_kind: EventKind,
    /// Key prefix filter; empty matches every key
    pub key_prefix: String,
    /// Key suffix filter, e.g. `original.mp4`
    pub key_suffix: String,
    /// Logical name of the destination queue
    pub destination: String,
}

impl NotificationRule {
    pub fn object_created(
        key_prefix: impl Into<String>,
        key_suffix: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            event_kind: EventKind::ObjectCreated,
            key_prefix: key_prefix.into(),
            key_suffix: key_suffix.into(),
            destination: destination.into(),
        }
    }

    /// Whether an object key would trigger this rule.
    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(&self.key_prefix) && key.ends_with(&self.key_suffix)
    }
}

/// Access level granted on an object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Permission {
    Read,
    Write,
}

/// Grants a compute unit a set of permissions on an object store.
/// Both ends are logical names resolved against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    pub subject: String,
    pub object: String,
    pub permissions: BTreeSet<Permission>,
}

/// Attributes for an object store declaration.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectStoreSpec {
    pub versioned: bool,
}

/// Attributes for a compute unit declaration. The environment is fully
/// resolved at declaration time; referenced store identifiers must
/// already be final values.
#[derive(Debug, Clone, Serialize)]
pub struct ComputeUnitSpec {
    pub entry_point: EntryPoint,
    /// Runtime tag passed through unchanged, e.g. `python3.12`
    pub runtime: String,
    pub environment: std::collections::BTreeMap<String, String>,
}

/// Kind-specific attributes of a registered resource.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum ResourceAttributes {
    ObjectStore {
        versioned: bool,
        notification_rules: Vec<NotificationRule>,
    },
    ComputeUnit {
        entry_point: EntryPoint,
        runtime: String,
        environment: std::collections::BTreeMap<String, String>,
        /// Logical names of queues feeding this unit, no duplicates
        event_sources: Vec<String>,
    },
    Queue {},
    RoutedApi {
        /// Memoized path tree; duplicate segment requests reuse nodes
        #[serde(skip)]
        root: PathNode,
        /// Registered routes in declaration order
        routes: Vec<crate::domain::routes::RouteEntry>,
    },
}

impl ResourceAttributes {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResourceAttributes::ObjectStore { .. } => "ObjectStore",
            ResourceAttributes::ComputeUnit { .. } => "ComputeUnit",
            ResourceAttributes::Queue {} => "Queue",
            ResourceAttributes::RoutedApi { .. } => "RoutedApi",
        }
    }
}

/// A resource registered in the stack.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDeclaration {
    /// Unique name within the stack source
    pub logical_name: String,
    /// Derived `<prefix><kebab(logical)>` name, unique within the stack
    pub physical_name: String,
    pub attributes: ResourceAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_filter_matches_upload_key() {
        let rule = NotificationRule::object_created("", "original.mp4", "PreprocessingQueue");
        assert!(rule.matches("uploads/x/original.mp4"));
        assert!(!rule.matches("uploads/x/thumbnail.jpg"));
    }

    #[test]
    fn test_prefix_filter_narrows_match() {
        let rule = NotificationRule::object_created("uploads/", "original.mp4", "Q");
        assert!(rule.matches("uploads/a/original.mp4"));
        assert!(!rule.matches("derived/a/original.mp4"));
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let rule = NotificationRule::object_created("", "", "Q");
        assert!(rule.matches("any/key/at-all.bin"));
    }
}
