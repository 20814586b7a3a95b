//! File-based provisioning adapter.
//!
//! Renders the assembled graph as a pretty-printed JSON template and
//! writes it to disk. The real provisioning engine picks the file up
//! out-of-band; from the stack's point of view writing the template is
//! the whole apply step.

use crate::domain::graph::ResourceGraph;
use crate::ports::provisioning::ProvisioningPort;
use async_trait::async_trait;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub struct TemplateFile {
    path: PathBuf,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProvisioningPort for TemplateFile {
    async fn apply(&self, graph: &ResourceGraph) -> Result<(), Box<dyn Error + Send + Sync>> {
        let rendered = serde_json::to_vec_pretty(graph)?;

        let mut file = File::create(&self.path).await?;
        file.write_all(&rendered).await?;
        file.write_all(b"\n").await?;

        tracing::info!(path = %self.path.display(), bytes = rendered.len(), "wrote stack template");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::assembler::StackAssembler;
    use crate::config::StackConfig;
    use tempfile::tempdir;
    use tokio::fs;

    #[tokio::test]
    async fn test_template_contains_resources_and_grants() {
        let config = StackConfig {
            resource_prefix: "thetatrim-".to_string(),
            with_queue: true,
            with_api: true,
            handler_runtime: "python3.12".to_string(),
            template_output: String::new(),
        };
        let graph = StackAssembler::new(config).assemble().unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("stack.json");
        TemplateFile::new(&path).apply(&graph).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed["resources"].as_array().unwrap().len(), 5);
        assert!(!parsed["grants"].as_array().unwrap().is_empty());
        assert!(content.contains("thetatrim-job-object-bucket"));
    }
}
