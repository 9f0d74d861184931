use crate::domain::model::TransformResult;
use crate::formats::RecipeDocument;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    /// Explicit output path; `None` means "input name with the other extension".
    fn output_path(&self) -> Option<&str>;
    fn indent(&self) -> usize;
    /// Echo parsed structures to stdout as indented JSON.
    fn echo(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecipeDocument>;
    async fn transform(&self, source: RecipeDocument) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
