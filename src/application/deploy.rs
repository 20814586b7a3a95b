use crate::application::assembler::StackAssembler;
use crate::config::StackConfig;
use crate::domain::graph::ResourceGraph;
use crate::ports::provisioning::ProvisioningPort;

pub struct DeployService<P> {
    provisioner: P,
}

impl<P> DeployService<P>
where
    P: ProvisioningPort,
{
    pub fn new(provisioner: P) -> Self {
        Self { provisioner }
    }

    /// Assemble the graph for `config` and hand it to the provisioning
    /// engine. Assembly errors and engine errors both abort the run;
    /// re-running deploys the same graph, so retry is safe.
    pub async fn deploy(
        &self,
        config: StackConfig,
    ) -> Result<ResourceGraph, Box<dyn std::error::Error + Send + Sync>> {
        let graph = StackAssembler::new(config).assemble()?;

        for line in graph.summary() {
            tracing::info!("{}", line);
        }

        self.provisioner.apply(&graph).await?;
        Ok(graph)
    }
}
