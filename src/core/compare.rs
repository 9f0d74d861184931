use crate::core::diff::{diff, ChangeEvent};
use crate::core::{report, Storage};
use crate::formats::{self, Format, RecipeDocument};
use crate::utils::error::Result;

/// Loads an old and a new recipe database and lists what changed.
pub struct Comparison<S: Storage> {
    storage: S,
    echo: bool,
    indent: usize,
}

impl<S: Storage> Comparison<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            echo: false,
            indent: formats::DEFAULT_INDENT,
        }
    }

    /// Print each loaded database as indented JSON.
    pub fn with_echo(mut self, echo: bool, indent: usize) -> Self {
        self.echo = echo;
        self.indent = indent;
        self
    }

    async fn load(&self, path: &str) -> Result<RecipeDocument> {
        let document = formats::load_document(&self.storage, path).await?;

        if self.echo {
            println!("{}", document.to_pretty_json(self.indent)?);
            // JSON 輸入同時顯示對應的 XML 結構
            if document.format() == Format::Json {
                println!("{}", document.convert().to_pretty_json(self.indent)?);
            }
        }

        Ok(document)
    }

    pub async fn run(&self, old_path: &str, new_path: &str) -> Result<Vec<ChangeEvent>> {
        let old = self.load(old_path).await?.to_collection();
        let new = self.load(new_path).await?.to_collection();
        tracing::info!(
            "Comparing {} old recipes ({} ingredients) with {} new recipes ({} ingredients)",
            old.len(),
            old.ingredient_count(),
            new.len(),
            new.ingredient_count()
        );

        let changes = diff(&old, &new);
        tracing::info!("Found {} changes", changes.len());
        Ok(changes)
    }

    /// JSON reports use the same indentation as the echo.
    pub async fn write_report(&self, path: &str, changes: &[ChangeEvent]) -> Result<()> {
        report::write_report(&self.storage, path, changes, self.indent).await
    }
}
