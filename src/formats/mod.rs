//! Wire formats for recipe databases and format detection.
//!
//! A file is loaded into a [`RecipeDocument`] whose variant is fixed by the file
//! extension. Everything downstream works on the variant or on the canonical
//! [`RecipeCollection`] it maps to.

pub mod json;
pub mod xml;

use crate::domain::model::RecipeCollection;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;

pub use json::{JsonCake, JsonItem, JsonRecipes};
pub use xml::{XmlCake, XmlIngredients, XmlItem, XmlRecipes};

pub const DEFAULT_INDENT: usize = 4;
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Xml,
    Json,
}

impl Format {
    /// Detect the format from the path suffix. Only `.xml` and `.json` are accepted.
    pub fn from_path(path: &str) -> Result<Self> {
        if path.ends_with(".xml") {
            Ok(Format::Xml)
        } else if path.ends_with(".json") {
            Ok(Format::Json)
        } else {
            Err(EtlError::UnsupportedFormat {
                path: path.to_string(),
            })
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Json => "json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Format::Xml => "XML",
            Format::Json => "JSON",
        }
    }

    /// 轉換的目標格式
    pub fn other(self) -> Self {
        match self {
            Format::Xml => Format::Json,
            Format::Json => Format::Xml,
        }
    }
}

/// Input name with its extension swapped: `cakes.xml` -> `cakes.json`.
pub fn default_output_path(input: &str, target: Format) -> Result<String> {
    let source = Format::from_path(input)?;
    let base = input.strip_suffix(source.extension()).unwrap_or(input);
    Ok(format!("{}{}", base, target.extension()))
}

/// A parsed recipe file in the shape of its wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecipeDocument {
    Xml(XmlRecipes),
    Json(JsonRecipes),
}

impl RecipeDocument {
    pub fn parse(format: Format, path: &str, text: &str) -> Result<Self> {
        match format {
            Format::Xml => xml::from_xml_str(path, text).map(RecipeDocument::Xml),
            Format::Json => json::from_json_str(path, text).map(RecipeDocument::Json),
        }
    }

    pub fn from_collection(collection: &RecipeCollection, format: Format) -> Self {
        match format {
            Format::Xml => RecipeDocument::Xml(XmlRecipes::from(collection)),
            Format::Json => RecipeDocument::Json(JsonRecipes::from(collection)),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            RecipeDocument::Xml(_) => Format::Xml,
            RecipeDocument::Json(_) => Format::Json,
        }
    }

    pub fn recipe_count(&self) -> usize {
        match self {
            RecipeDocument::Xml(recipes) => recipes.cakes.len(),
            RecipeDocument::Json(recipes) => recipes.cakes.len(),
        }
    }

    pub fn to_collection(&self) -> RecipeCollection {
        match self {
            RecipeDocument::Xml(recipes) => RecipeCollection::from(recipes),
            RecipeDocument::Json(recipes) => RecipeCollection::from(recipes),
        }
    }

    /// Re-encode into the other wire format through the canonical model.
    pub fn convert(&self) -> Self {
        RecipeDocument::from_collection(&self.to_collection(), self.format().other())
    }

    pub fn render(&self, indent: usize) -> Result<String> {
        match self {
            RecipeDocument::Xml(recipes) => xml::to_xml_string(recipes, indent),
            RecipeDocument::Json(recipes) => json::to_json_string(recipes, indent),
        }
    }

    /// The document as indented JSON, whatever its wire format.
    pub fn to_pretty_json(&self, indent: usize) -> Result<String> {
        json::to_json_pretty(self, indent)
    }
}

async fn read_text<S: Storage>(storage: &S, path: &str) -> Result<String> {
    let data = storage.read_file(path).await.map_err(|e| match e {
        EtlError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            EtlError::FileNotFound {
                path: path.to_string(),
            }
        }
        other => other,
    })?;

    String::from_utf8(data).map_err(|e| {
        EtlError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {}", path, e),
        ))
    })
}

/// Load a file, choosing the parser from its extension.
pub async fn load_document<S: Storage>(storage: &S, path: &str) -> Result<RecipeDocument> {
    let format = Format::from_path(path)?;
    let text = read_text(storage, path).await?;
    let document = RecipeDocument::parse(format, path, &text)?;
    tracing::debug!("Loaded {} document from {}", format.label(), path);
    Ok(document)
}

pub async fn load_xml<S: Storage>(storage: &S, path: &str) -> Result<RecipeCollection> {
    let text = read_text(storage, path).await?;
    let recipes = xml::from_xml_str(path, &text)?;
    Ok(RecipeCollection::from(&recipes))
}

pub async fn load_json<S: Storage>(storage: &S, path: &str) -> Result<RecipeCollection> {
    let text = read_text(storage, path).await?;
    let recipes = json::from_json_str(path, &text)?;
    Ok(RecipeCollection::from(&recipes))
}
