use crate::core::Pipeline;
use crate::utils::error::Result;

/// Runs a pipeline's extract, transform and load stages in order.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting conversion...");

        // Extract
        let source = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} recipes from {} input",
            source.recipe_count(),
            source.format().label()
        );

        // Transform
        let result = self.pipeline.transform(source).await?;
        tracing::info!(
            "Transformed into {} with {} recipes",
            result.document.format().label(),
            result.document.recipe_count()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
