use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::formats::{self, RecipeDocument};
use crate::utils::error::Result;
use crate::utils::output;

/// Converts one recipe file into the other format.
pub struct ConvertPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConvertPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn echo(&self, document: &RecipeDocument) -> Result<()> {
        if self.config.echo() {
            println!("{}", document.to_pretty_json(self.config.indent())?);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConvertPipeline<S, C> {
    async fn extract(&self) -> Result<RecipeDocument> {
        let input = self.config.input_path();
        tracing::debug!("Reading recipes from: {}", input);

        let document = formats::load_document(&self.storage, input).await?;
        self.echo(&document)?;

        Ok(document)
    }

    async fn transform(&self, source: RecipeDocument) -> Result<TransformResult> {
        let document = source.convert();

        // JSON -> XML 時也輸出轉換後的結構
        if document.format() == formats::Format::Xml {
            self.echo(&document)?;
        }

        let output_path = match self.config.output_path() {
            Some(path) => path.to_string(),
            None => formats::default_output_path(self.config.input_path(), document.format())?,
        };
        tracing::debug!("Output path resolved to: {}", output_path);

        Ok(TransformResult {
            document,
            output_path,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let text = result.document.render(self.config.indent())?;

        tracing::debug!(
            "Writing {} bytes of {} to storage",
            text.len(),
            result.document.format().label()
        );
        self.storage
            .write_file(&result.output_path, text.as_bytes())
            .await?;

        let target = result.document.format();
        output::success(&format!(
            "{} file successfully converted to {} and saved as '{}'",
            target.other().label(),
            target.label(),
            result.output_path
        ));

        Ok(result.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::etl::EtlEngine;
    use crate::domain::model::{Ingredient, Recipe, RecipeCollection};
    use crate::formats::Format;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, content: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), content.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input: String,
        output: Option<String>,
    }

    impl MockConfig {
        fn new(input: &str) -> Self {
            Self {
                input: input.to_string(),
                output: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> Option<&str> {
            self.output.as_deref()
        }

        fn indent(&self) -> usize {
            4
        }

        fn echo(&self) -> bool {
            false
        }
    }

    fn sample() -> RecipeCollection {
        RecipeCollection::new(vec![Recipe::new("Red Velvet Strawberry Cake", "40 min")
            .with_ingredient(Ingredient::new("Flour", "3", "cups"))
            .with_ingredient(Ingredient::new("Strawberries", "7", ""))])
    }

    #[tokio::test]
    async fn test_xml_input_is_written_as_json_next_to_it() {
        let storage = MockStorage::new();
        let xml = RecipeDocument::from_collection(&sample(), Format::Xml)
            .render(4)
            .unwrap();
        storage.put("db/original.xml", &xml).await;

        let pipeline = ConvertPipeline::new(storage.clone(), MockConfig::new("db/original.xml"));
        let output = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(output, "db/original.json");
        let written = storage.get_file("db/original.json").await.unwrap();
        assert!(written.contains("\"ingredient_name\": \"Flour\""));

        let parsed = RecipeDocument::parse(Format::Json, &output, &written).unwrap();
        assert_eq!(parsed.to_collection(), sample());
    }

    #[tokio::test]
    async fn test_json_input_is_written_as_xml() {
        let storage = MockStorage::new();
        let json = RecipeDocument::from_collection(&sample(), Format::Json)
            .render(4)
            .unwrap();
        storage.put("stolen.json", &json).await;

        let pipeline = ConvertPipeline::new(storage.clone(), MockConfig::new("stolen.json"));
        let output = EtlEngine::new(pipeline).run().await.unwrap();

        assert_eq!(output, "stolen.xml");
        let written = storage.get_file("stolen.xml").await.unwrap();
        assert!(written.contains("<stovetime>40 min</stovetime>"));
    }

    #[tokio::test]
    async fn test_explicit_output_path_wins() {
        let storage = MockStorage::new();
        let json = RecipeDocument::from_collection(&sample(), Format::Json)
            .render(2)
            .unwrap();
        storage.put("in.json", &json).await;

        let mut config = MockConfig::new("in.json");
        config.output = Some("out/converted.xml".to_string());
        let pipeline = ConvertPipeline::new(storage.clone(), config);

        let source = pipeline.extract().await.unwrap();
        let result = pipeline.transform(source).await.unwrap();
        assert_eq!(result.output_path, "out/converted.xml");
        assert_eq!(result.document.format(), Format::Xml);

        pipeline.load(result).await.unwrap();
        assert!(storage.get_file("out/converted.xml").await.is_some());
    }

    #[tokio::test]
    async fn test_malformed_input_fails_extract() {
        let storage = MockStorage::new();
        storage.put("broken.json", "{\"cake\": [").await;

        let pipeline = ConvertPipeline::new(storage, MockConfig::new("broken.json"));
        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::JsonError { .. }));
    }
}
