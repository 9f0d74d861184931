//! JSON recipe files: `{"cake": [{"name", "time", "ingredients": [...]}]}`.

use crate::domain::model::{Ingredient, Recipe, RecipeCollection};
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRecipes {
    #[serde(rename = "cake", default, deserialize_with = "null_as_default")]
    pub cakes: Vec<JsonCake>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonCake {
    pub name: String,
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ingredients: Vec<JsonItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonItem {
    pub ingredient_name: String,
    pub ingredient_count: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ingredient_unit: String,
}

// 舊版工具會把空清單寫成 null
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 解析 JSON 文字，`path` 只用於錯誤訊息
pub fn from_json_str(path: &str, text: &str) -> Result<JsonRecipes> {
    serde_json::from_str(text).map_err(|source| EtlError::JsonError {
        path: path.to_string(),
        source,
    })
}

pub fn to_json_string(recipes: &JsonRecipes, indent: usize) -> Result<String> {
    let mut text = to_json_pretty(recipes, indent)?;
    text.push('\n');
    Ok(text)
}

/// Pretty-print any serializable value with `indent` spaces per level.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(buffer)
        .map_err(|e| EtlError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

impl From<&RecipeCollection> for JsonRecipes {
    fn from(collection: &RecipeCollection) -> Self {
        let cakes = collection
            .recipes
            .iter()
            .map(|recipe| JsonCake {
                name: recipe.name.clone(),
                time: recipe.bake_time.clone(),
                ingredients: recipe
                    .ingredients
                    .iter()
                    .map(|ingredient| JsonItem {
                        ingredient_name: ingredient.name.clone(),
                        ingredient_count: ingredient.count.clone(),
                        ingredient_unit: ingredient.unit.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self { cakes }
    }
}

impl From<&JsonRecipes> for RecipeCollection {
    fn from(recipes: &JsonRecipes) -> Self {
        let recipes = recipes
            .cakes
            .iter()
            .map(|cake| Recipe {
                name: cake.name.clone(),
                bake_time: cake.time.clone(),
                ingredients: cake
                    .ingredients
                    .iter()
                    .map(|item| Ingredient {
                        name: item.ingredient_name.clone(),
                        count: item.ingredient_count.clone(),
                        unit: item.ingredient_unit.clone(),
                    })
                    .collect(),
            })
            .collect();

        RecipeCollection::new(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
    "cake": [
        {
            "name": "Red Velvet Strawberry Cake",
            "time": "45 min",
            "ingredients": [
                {"ingredient_name": "Flour", "ingredient_count": "2", "ingredient_unit": "mugs"},
                {"ingredient_name": "Strawberries", "ingredient_count": "8"},
                {"ingredient_name": "Coffee Beans", "ingredient_count": "2.5", "ingredient_unit": "tablespoons"}
            ]
        },
        {
            "name": "Moonshine Muffin",
            "time": "30 min",
            "ingredients": [
                {"ingredient_name": "Brown sugar", "ingredient_count": "1", "ingredient_unit": "mug"}
            ]
        }
    ]
}"#;

    #[test]
    fn test_parse_sample() {
        let recipes = from_json_str("sample.json", SAMPLE).unwrap();

        assert_eq!(recipes.cakes.len(), 2);
        assert_eq!(recipes.cakes[0].time, "45 min");
        assert_eq!(recipes.cakes[0].ingredients[1].ingredient_unit, "");
        assert_eq!(recipes.cakes[1].name, "Moonshine Muffin");
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let text = r#"{"cake": [{"name": "Plain", "time": "10 min", "ingredients": null}]}"#;
        let recipes = from_json_str("plain.json", text).unwrap();

        assert!(recipes.cakes[0].ingredients.is_empty());

        let recipes = from_json_str("none.json", r#"{"cake": null}"#).unwrap();
        assert!(recipes.cakes.is_empty());
    }

    #[test]
    fn test_numeric_count_is_rejected() {
        let text = r#"{"cake": [{"name": "A", "time": "1", "ingredients": [{"ingredient_name": "x", "ingredient_count": 2}]}]}"#;
        let err = from_json_str("numeric.json", text).unwrap_err();

        assert!(matches!(err, EtlError::JsonError { ref path, .. } if path == "numeric.json"));
    }

    #[test]
    fn test_write_uses_requested_indent() {
        let recipes = from_json_str("sample.json", SAMPLE).unwrap();
        let text = to_json_string(&recipes, 4).unwrap();

        assert!(text.starts_with("{\n    \"cake\": [\n        {"));
        assert!(text.ends_with("}\n"));
        // 空單位不輸出
        assert_eq!(text.matches("ingredient_unit").count(), 3);
    }

    #[test]
    fn test_collection_mapping_is_field_rename_only() {
        let recipes = from_json_str("sample.json", SAMPLE).unwrap();
        let collection = RecipeCollection::from(&recipes);

        assert_eq!(collection.recipes[0].bake_time, "45 min");
        assert_eq!(collection.recipes[0].ingredients[2], Ingredient::new("Coffee Beans", "2.5", "tablespoons"));
        assert_eq!(JsonRecipes::from(&collection), recipes);
    }
}
