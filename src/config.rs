//! Configuration for stack assembly.

use std::env;

/// Stack-level settings. The prefix and the two subsystem toggles cover
/// every revision of the stack that shipped: early revisions prefixed
/// all physical names and carried the queue and the REST API, the
/// simplest revision is just the bucket and the post-job handler.
#[derive(Clone, Debug)]
pub struct StackConfig {
    /// Prefix prepended verbatim to every physical resource name;
    /// empty disables prefixing
    pub resource_prefix: String,
    /// Declare the preprocessing queue, handler and triggers
    pub with_queue: bool,
    /// Declare the REST API and its routes
    pub with_api: bool,
    /// Runtime tag for the handlers, passed through unchanged
    pub handler_runtime: String,
    /// Where the rendered stack template is written
    pub template_output: String,
}

impl StackConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            resource_prefix: env::var("RESOURCE_PREFIX").unwrap_or_default(),
            with_queue: flag("WITH_PREPROCESSING_QUEUE", true),
            with_api: flag("WITH_REST_API", true),
            handler_runtime: env::var("HANDLER_RUNTIME")
                .unwrap_or_else(|_| String::from("python3.12")),
            template_output: env::var("TEMPLATE_OUTPUT")
                .unwrap_or_else(|_| String::from("stack.json")),
        }
    }
}

fn flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
