//! Stack assembler for the video-processing pipeline.
//!
//! One assembly run builds the whole declaration graph in a fixed phase
//! order: register resources (propagating store identifiers into compute
//! unit environments as they are declared), then bindings, then routes.
//! Re-running assembly produces the same graph, and every binding is
//! idempotent, so a partially-applied stack converges on re-apply.
//!
//! The queue/trigger subsystem and the REST API came and went across
//! revisions of this stack; both are driven by `StackConfig` toggles so
//! any observed revision can be reproduced.

use crate::config::StackConfig;
use crate::domain::bindings::BindingEngine;
use crate::domain::graph::ResourceGraph;
use crate::domain::registry::{propagate_store_identifier, ResourceRegistry};
use crate::domain::resources::{
    ComputeUnitSpec, EntryPoint, NotificationRule, ObjectStoreSpec, Permission,
};
use crate::domain::routes::add_route;
use crate::error::AssemblyError;
use std::collections::BTreeMap;

/// Environment key under which compute units receive the job bucket's
/// physical identifier.
pub const OBJECT_BUCKET_NAME: &str = "OBJECT_BUCKET_NAME";

/// Object keys of freshly uploaded videos end with this; derived
/// artifacts in the same bucket do not, which keeps the preprocessing
/// trigger from firing on its own outputs.
pub const UPLOAD_KEY_SUFFIX: &str = "original.mp4";

pub const JOB_BUCKET: &str = "JobObjectBucket";
pub const POST_JOB_HANDLER: &str = "PostJobHandler";
pub const PREPROCESS_HANDLER: &str = "PreprocessHandler";
pub const PREPROCESSING_QUEUE: &str = "PreprocessingQueue";
pub const REST_API: &str = "RestApi";

pub struct StackAssembler {
    config: StackConfig,
}

impl StackAssembler {
    pub fn new(config: StackConfig) -> Self {
        Self { config }
    }

    /// Assemble the full declaration graph. Fails fast on the first
    /// ordering or naming violation; there is no partial-success mode.
    pub fn assemble(&self) -> Result<ResourceGraph, AssemblyError> {
        let mut registry = ResourceRegistry::new(self.config.resource_prefix.clone());
        let mut bindings = BindingEngine::new();

        self.setup_resources(&mut registry)?;
        self.grant_permissions(&mut registry, &mut bindings)?;
        self.configure_triggers(&mut registry, &mut bindings)?;
        self.configure_endpoints(&mut registry)?;

        let graph = ResourceGraph {
            resources: registry.into_resources(),
            grants: bindings.into_grants(),
        };
        tracing::info!(
            resources = graph.resource_count(),
            grants = graph.grants.len(),
            "stack assembled"
        );
        Ok(graph)
    }

    /// Phase 1: declare every resource of this revision, store first so
    /// its identifier is final when the handlers are declared.
    fn setup_resources(&self, registry: &mut ResourceRegistry) -> Result<(), AssemblyError> {
        registry.declare_object_store(JOB_BUCKET, ObjectStoreSpec { versioned: true })?;

        registry.declare_compute_unit(
            POST_JOB_HANDLER,
            self.handler_spec(registry, "lambdas/rest", "post_job.handler")?,
        )?;

        if self.config.with_queue {
            registry.declare_compute_unit(
                PREPROCESS_HANDLER,
                self.handler_spec(registry, "lambdas/video_processing", "preprocess.handler")?,
            )?;
            registry.declare_queue(PREPROCESSING_QUEUE)?;
        }

        if self.config.with_api {
            registry.declare_routed_api(REST_API)?;
        }
        Ok(())
    }

    /// A python handler bound to the job bucket through its environment.
    fn handler_spec(
        &self,
        registry: &ResourceRegistry,
        asset_path: &str,
        handler: &str,
    ) -> Result<ComputeUnitSpec, AssemblyError> {
        let mut environment = BTreeMap::new();
        propagate_store_identifier(registry, JOB_BUCKET, OBJECT_BUCKET_NAME, &mut environment)?;
        Ok(ComputeUnitSpec {
            entry_point: EntryPoint::new(asset_path, handler),
            runtime: self.config.handler_runtime.clone(),
            environment,
        })
    }

    /// Phase 2: access grants between handlers and the bucket.
    fn grant_permissions(
        &self,
        registry: &mut ResourceRegistry,
        bindings: &mut BindingEngine,
    ) -> Result<(), AssemblyError> {
        bindings.grant_access(
            registry,
            POST_JOB_HANDLER,
            JOB_BUCKET,
            [Permission::Read, Permission::Write],
        )?;
        if self.config.with_queue {
            // The preprocessor downloads the upload and writes chunks back
            bindings.grant_access(
                registry,
                PREPROCESS_HANDLER,
                JOB_BUCKET,
                [Permission::Read, Permission::Write],
            )?;
        }
        Ok(())
    }

    /// Phase 3: upload notifications and the queue-fed trigger.
    fn configure_triggers(
        &self,
        registry: &mut ResourceRegistry,
        bindings: &mut BindingEngine,
    ) -> Result<(), AssemblyError> {
        if !self.config.with_queue {
            return Ok(());
        }
        bindings.bind_notification(
            registry,
            JOB_BUCKET,
            NotificationRule::object_created("", UPLOAD_KEY_SUFFIX, PREPROCESSING_QUEUE),
        )?;
        bindings.bind_event_source(registry, PREPROCESS_HANDLER, PREPROCESSING_QUEUE)?;
        Ok(())
    }

    /// Phase 4: REST endpoints.
    fn configure_endpoints(&self, registry: &mut ResourceRegistry) -> Result<(), AssemblyError> {
        if !self.config.with_api {
            return Ok(());
        }
        add_route(registry, REST_API, &["jobs"], "POST", POST_JOB_HANDLER)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn config(prefix: &str, with_queue: bool, with_api: bool) -> StackConfig {
        StackConfig {
            resource_prefix: prefix.to_string(),
            with_queue,
            with_api,
            handler_runtime: "python3.12".to_string(),
            template_output: "stack.json".to_string(),
        }
    }

    #[test]
    fn test_full_revision_declares_five_resources() {
        let graph = StackAssembler::new(config("thetatrim-", true, true))
            .assemble()
            .unwrap();
        assert_eq!(graph.resource_count(), 5);
        assert_eq!(graph.kind_count("ObjectStore"), 1);
        assert_eq!(graph.kind_count("ComputeUnit"), 2);
        assert_eq!(graph.kind_count("Queue"), 1);
        assert_eq!(graph.kind_count("RoutedApi"), 1);
    }

    #[test]
    fn test_minimal_revision_is_store_handler_grant() {
        let graph = StackAssembler::new(config("", false, false))
            .assemble()
            .unwrap();
        assert_eq!(graph.resource_count(), 2);
        assert_eq!(graph.grants.len(), 1);
        assert_eq!(graph.grants[0].subject, POST_JOB_HANDLER);
        assert_eq!(graph.grants[0].object, JOB_BUCKET);
    }

    #[test]
    fn test_bucket_identifier_propagates_into_handler_environment() {
        let graph = StackAssembler::new(config("thetatrim-", true, true))
            .assemble()
            .unwrap();
        for handler in [POST_JOB_HANDLER, PREPROCESS_HANDLER] {
            let environment = graph.environment_of(handler).unwrap();
            assert_eq!(
                environment.get(OBJECT_BUCKET_NAME).map(String::as_str),
                Some("thetatrim-job-object-bucket")
            );
        }
    }

    #[test]
    fn test_post_job_grant_is_read_write() {
        let graph = StackAssembler::new(config("", false, false))
            .assemble()
            .unwrap();
        assert_eq!(
            graph.grants[0].permissions,
            BTreeSet::from([Permission::Read, Permission::Write])
        );
    }

    #[test]
    fn test_queue_is_wired_on_both_ends_exactly_once() {
        let graph = StackAssembler::new(config("", true, false))
            .assemble()
            .unwrap();

        let rules = graph.notification_rules_of(JOB_BUCKET);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].destination, PREPROCESSING_QUEUE);
        assert_eq!(rules[0].key_suffix, UPLOAD_KEY_SUFFIX);

        assert_eq!(
            graph.event_sources_of(PREPROCESS_HANDLER),
            [PREPROCESSING_QUEUE.to_string()]
        );
    }

    #[test]
    fn test_api_revision_routes_post_jobs() {
        let graph = StackAssembler::new(config("", false, true))
            .assemble()
            .unwrap();
        let routes = match &graph.get(REST_API).unwrap().attributes {
            crate::domain::resources::ResourceAttributes::RoutedApi { routes, .. } => routes,
            _ => panic!("RestApi is not a routed API"),
        };
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, ["jobs"]);
        assert_eq!(routes[0].method, "POST");
        assert_eq!(routes[0].target, POST_JOB_HANDLER);
    }

    #[test]
    fn test_assembly_is_repeatable() {
        let assembler = StackAssembler::new(config("thetatrim-", true, true));
        let first = assembler.assemble().unwrap();
        let second = assembler.assemble().unwrap();
        assert_eq!(first.resource_count(), second.resource_count());
        assert_eq!(first.grants, second.grants);
        assert_eq!(first.summary(), second.summary());
    }
}
