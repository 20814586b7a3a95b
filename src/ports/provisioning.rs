use crate::domain::graph::ResourceGraph;
use async_trait::async_trait;
use std::error::Error;

/// Hand-off seam to the external provisioning engine. The engine owns
/// retries, throttling and drift handling; its errors pass through
/// unmodified.
#[async_trait]
pub trait ProvisioningPort: Send + Sync {
    /// Apply the assembled graph as a unit
    async fn apply(&self, graph: &ResourceGraph) -> Result<(), Box<dyn Error + Send + Sync>>;
}

#[cfg(test)]
mockall::mock! {
    pub Provisioning {}

    #[async_trait]
    impl ProvisioningPort for Provisioning {
        async fn apply(&self, graph: &ResourceGraph) -> Result<(), Box<dyn Error + Send + Sync>>;
    }
}
