use serde::{Deserialize, Serialize};

/// Format-independent recipe database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCollection {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Kept verbatim, never parsed as a duration.
    pub bake_time: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Literal text from the source file ("2" and "2.0" are different counts).
    pub count: String,
    /// Empty when the source omits the unit.
    pub unit: String,
}

impl RecipeCollection {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn ingredient_count(&self) -> usize {
        self.recipes.iter().map(|r| r.ingredients.len()).sum()
    }
}

impl Recipe {
    pub fn new(name: impl Into<String>, bake_time: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bake_time: bake_time.into(),
            ingredients: Vec::new(),
        }
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }
}

impl Ingredient {
    pub fn new(name: impl Into<String>, count: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: count.into(),
            unit: unit.into(),
        }
    }
}

/// 轉換階段的結果：目標格式的文件與輸出路徑
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub document: crate::formats::RecipeDocument,
    pub output_path: String,
}
