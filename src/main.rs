use dotenv::dotenv;
use trimstack::adapters::template::TemplateFile;
use trimstack::{DeployService, StackConfig};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = StackConfig::from_env();
    tracing::info!(
        prefix = %config.resource_prefix,
        with_queue = config.with_queue,
        with_api = config.with_api,
        "assembling pipeline stack"
    );

    let template = TemplateFile::new(config.template_output.clone());
    let service = DeployService::new(template);

    match service.deploy(config).await {
        Ok(graph) => {
            tracing::info!(resources = graph.resource_count(), "stack ready for provisioning");
        }
        Err(err) => {
            tracing::error!("stack assembly failed: {}", err);
            std::process::exit(1);
        }
    }
}
