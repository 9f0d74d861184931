//! Field-by-field comparison of two recipe databases.
//!
//! Recipes are matched by name and ingredients by name within a recipe. When a
//! name appears twice the later entry wins. Every field is compared as an exact
//! string. Events come out in a fixed order: removed recipes, added recipes,
//! then per shared recipe (by name) its bake time and ingredient changes.

use crate::domain::model::{Ingredient, Recipe, RecipeCollection};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    RecipeRemoved {
        name: String,
    },
    RecipeAdded {
        name: String,
    },
    BakeTimeChanged {
        recipe: String,
        old: String,
        new: String,
    },
    IngredientRemoved {
        recipe: String,
        ingredient: String,
    },
    IngredientAdded {
        recipe: String,
        ingredient: String,
    },
    UnitChanged {
        recipe: String,
        ingredient: String,
        old: String,
        new: String,
    },
    CountChanged {
        recipe: String,
        ingredient: String,
        old: String,
        new: String,
    },
}

impl ChangeEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::RecipeRemoved { .. } => "recipe_removed",
            ChangeEvent::RecipeAdded { .. } => "recipe_added",
            ChangeEvent::BakeTimeChanged { .. } => "bake_time_changed",
            ChangeEvent::IngredientRemoved { .. } => "ingredient_removed",
            ChangeEvent::IngredientAdded { .. } => "ingredient_added",
            ChangeEvent::UnitChanged { .. } => "unit_changed",
            ChangeEvent::CountChanged { .. } => "count_changed",
        }
    }

    pub fn recipe(&self) -> &str {
        match self {
            ChangeEvent::RecipeRemoved { name } | ChangeEvent::RecipeAdded { name } => name,
            ChangeEvent::BakeTimeChanged { recipe, .. }
            | ChangeEvent::IngredientRemoved { recipe, .. }
            | ChangeEvent::IngredientAdded { recipe, .. }
            | ChangeEvent::UnitChanged { recipe, .. }
            | ChangeEvent::CountChanged { recipe, .. } => recipe,
        }
    }

    pub fn ingredient(&self) -> Option<&str> {
        match self {
            ChangeEvent::IngredientRemoved { ingredient, .. }
            | ChangeEvent::IngredientAdded { ingredient, .. }
            | ChangeEvent::UnitChanged { ingredient, .. }
            | ChangeEvent::CountChanged { ingredient, .. } => Some(ingredient),
            _ => None,
        }
    }

    /// Old and new values for field changes.
    pub fn values(&self) -> Option<(&str, &str)> {
        match self {
            ChangeEvent::BakeTimeChanged { old, new, .. }
            | ChangeEvent::UnitChanged { old, new, .. }
            | ChangeEvent::CountChanged { old, new, .. } => Some((old, new)),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::RecipeRemoved { name } => write!(f, "REMOVED cake \"{}\"", name),
            ChangeEvent::RecipeAdded { name } => write!(f, "ADDED cake \"{}\"", name),
            ChangeEvent::BakeTimeChanged { recipe, old, new } => write!(
                f,
                "CHANGED cooking time for cake \"{}\" - \"{}\" instead of \"{}\"",
                recipe, new, old
            ),
            ChangeEvent::IngredientRemoved { recipe, ingredient } => write!(
                f,
                "REMOVED ingredient \"{}\" for cake \"{}\"",
                ingredient, recipe
            ),
            ChangeEvent::IngredientAdded { recipe, ingredient } => write!(
                f,
                "ADDED ingredient \"{}\" for cake \"{}\"",
                ingredient, recipe
            ),
            ChangeEvent::UnitChanged {
                recipe,
                ingredient,
                old,
                new,
            } => write!(
                f,
                "CHANGED unit for ingredient \"{}\" for cake \"{}\" - \"{}\" instead of \"{}\"",
                ingredient, recipe, new, old
            ),
            ChangeEvent::CountChanged {
                recipe,
                ingredient,
                old,
                new,
            } => write!(
                f,
                "CHANGED unit count for ingredient \"{}\" for cake \"{}\" - \"{}\" instead of \"{}\"",
                ingredient, recipe, new, old
            ),
        }
    }
}

fn index_recipes(collection: &RecipeCollection) -> BTreeMap<&str, &Recipe> {
    collection
        .recipes
        .iter()
        .map(|recipe| (recipe.name.as_str(), recipe))
        .collect()
}

fn index_ingredients(recipe: &Recipe) -> BTreeMap<&str, &Ingredient> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| (ingredient.name.as_str(), ingredient))
        .collect()
}

pub fn diff(old: &RecipeCollection, new: &RecipeCollection) -> Vec<ChangeEvent> {
    let old_recipes = index_recipes(old);
    let new_recipes = index_recipes(new);
    let mut changes = Vec::new();

    for name in old_recipes.keys().filter(|name| !new_recipes.contains_key(*name)) {
        changes.push(ChangeEvent::RecipeRemoved {
            name: name.to_string(),
        });
    }

    for name in new_recipes.keys().filter(|name| !old_recipes.contains_key(*name)) {
        changes.push(ChangeEvent::RecipeAdded {
            name: name.to_string(),
        });
    }

    for (name, old_recipe) in &old_recipes {
        let Some(new_recipe) = new_recipes.get(name) else {
            continue;
        };

        if old_recipe.bake_time != new_recipe.bake_time {
            changes.push(ChangeEvent::BakeTimeChanged {
                recipe: name.to_string(),
                old: old_recipe.bake_time.clone(),
                new: new_recipe.bake_time.clone(),
            });
        }

        diff_ingredients(name, old_recipe, new_recipe, &mut changes);
    }

    changes
}

fn diff_ingredients(recipe: &str, old: &Recipe, new: &Recipe, changes: &mut Vec<ChangeEvent>) {
    let old_items = index_ingredients(old);
    let new_items = index_ingredients(new);

    for name in old_items.keys().filter(|name| !new_items.contains_key(*name)) {
        changes.push(ChangeEvent::IngredientRemoved {
            recipe: recipe.to_string(),
            ingredient: name.to_string(),
        });
    }

    for name in new_items.keys().filter(|name| !old_items.contains_key(*name)) {
        changes.push(ChangeEvent::IngredientAdded {
            recipe: recipe.to_string(),
            ingredient: name.to_string(),
        });
    }

    for (name, old_item) in &old_items {
        let Some(new_item) = new_items.get(name) else {
            continue;
        };

        // 單位先於數量
        if old_item.unit != new_item.unit {
            changes.push(ChangeEvent::UnitChanged {
                recipe: recipe.to_string(),
                ingredient: name.to_string(),
                old: old_item.unit.clone(),
                new: new_item.unit.clone(),
            });
        }
        if old_item.count != new_item.count {
            changes.push(ChangeEvent::CountChanged {
                recipe: recipe.to_string(),
                ingredient: name.to_string(),
                old: old_item.count.clone(),
                new: new_item.count.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(recipes: Vec<Recipe>) -> RecipeCollection {
        RecipeCollection::new(recipes)
    }

    fn database() -> RecipeCollection {
        collection(vec![
            Recipe::new("Red Velvet Strawberry Cake", "40 min")
                .with_ingredient(Ingredient::new("Flour", "3", "cups"))
                .with_ingredient(Ingredient::new("Vanilla extract", "1.5", "tablespoons"))
                .with_ingredient(Ingredient::new("Strawberries", "7", "")),
            Recipe::new("Blueberry Muffin Cake", "30 min")
                .with_ingredient(Ingredient::new("Baking powder", "3", "teaspoons"))
                .with_ingredient(Ingredient::new("Brown sugar", "0.5", "cup")),
        ])
    }

    #[test]
    fn test_identical_databases_have_no_changes() {
        let db = database();
        assert!(diff(&db, &db).is_empty());
        assert!(diff(&RecipeCollection::default(), &RecipeCollection::default()).is_empty());
    }

    #[test]
    fn test_bake_time_change_and_added_ingredient() {
        let old = collection(vec![
            Recipe::new("A", "30").with_ingredient(Ingredient::new("flour", "200", "g"))
        ]);
        let new = collection(vec![Recipe::new("A", "35")
            .with_ingredient(Ingredient::new("flour", "200", "g"))
            .with_ingredient(Ingredient::new("sugar", "50", "g"))]);

        assert_eq!(
            diff(&old, &new),
            vec![
                ChangeEvent::BakeTimeChanged {
                    recipe: "A".to_string(),
                    old: "30".to_string(),
                    new: "35".to_string(),
                },
                ChangeEvent::IngredientAdded {
                    recipe: "A".to_string(),
                    ingredient: "sugar".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_recipe_additions_and_removals_are_sorted() {
        let old = collection(vec![Recipe::new("Zebra Cake", "1"), Recipe::new("Apple Pie", "2")]);
        let new = collection(vec![Recipe::new("Muffin", "3"), Recipe::new("Brownie", "4")]);

        let lines: Vec<String> = diff(&old, &new).iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "REMOVED cake \"Apple Pie\"",
                "REMOVED cake \"Zebra Cake\"",
                "ADDED cake \"Brownie\"",
                "ADDED cake \"Muffin\"",
            ]
        );
    }

    #[test]
    fn test_unit_and_count_changes_compare_as_text() {
        let old = collection(vec![Recipe::new("Cake", "10")
            .with_ingredient(Ingredient::new("Flour", "2", "cups"))
            .with_ingredient(Ingredient::new("Eggs", "3", ""))]);
        let new = collection(vec![Recipe::new("Cake", "10")
            .with_ingredient(Ingredient::new("Flour", "2.0", "mugs"))
            .with_ingredient(Ingredient::new("Eggs", "3", "pieces"))]);

        let lines: Vec<String> = diff(&old, &new).iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "CHANGED unit for ingredient \"Eggs\" for cake \"Cake\" - \"pieces\" instead of \"\"",
                "CHANGED unit for ingredient \"Flour\" for cake \"Cake\" - \"mugs\" instead of \"cups\"",
                "CHANGED unit count for ingredient \"Flour\" for cake \"Cake\" - \"2.0\" instead of \"2\"",
            ]
        );
    }

    #[test]
    fn test_full_report_order() {
        let old = database();
        let mut new = database();
        new.recipes[0].bake_time = "45 min".to_string();
        new.recipes[0].ingredients.remove(1);
        new.recipes[0]
            .ingredients
            .push(Ingredient::new("Coffee beans", "2.5", "tablespoons"));
        new.recipes.remove(1);
        new.recipes.push(Recipe::new("Moonshine Muffin", "30 min"));

        let lines: Vec<String> = diff(&old, &new).iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "REMOVED cake \"Blueberry Muffin Cake\"",
                "ADDED cake \"Moonshine Muffin\"",
                "CHANGED cooking time for cake \"Red Velvet Strawberry Cake\" - \"45 min\" instead of \"40 min\"",
                "REMOVED ingredient \"Vanilla extract\" for cake \"Red Velvet Strawberry Cake\"",
                "ADDED ingredient \"Coffee beans\" for cake \"Red Velvet Strawberry Cake\"",
            ]
        );
    }

    #[test]
    fn test_duplicate_names_keep_last_entry() {
        let old = collection(vec![Recipe::new("Cake", "10"), Recipe::new("Cake", "20")]);
        let new = collection(vec![Recipe::new("Cake", "20")]);
        assert!(diff(&old, &new).is_empty());

        let old = collection(vec![Recipe::new("Cake", "10")
            .with_ingredient(Ingredient::new("Salt", "1", "pinch"))
            .with_ingredient(Ingredient::new("Salt", "2", "pinch"))]);
        let new = collection(vec![
            Recipe::new("Cake", "10").with_ingredient(Ingredient::new("Salt", "2", "pinch"))
        ]);
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let old = collection(vec![Recipe::new("cake", "10")]);
        let new = collection(vec![Recipe::new("Cake", "10")]);

        let kinds: Vec<&str> = diff(&old, &new).iter().map(ChangeEvent::kind).collect();
        assert_eq!(kinds, vec!["recipe_removed", "recipe_added"]);
    }

    #[test]
    fn test_event_accessors() {
        let event = ChangeEvent::CountChanged {
            recipe: "Cake".to_string(),
            ingredient: "Flour".to_string(),
            old: "2".to_string(),
            new: "3".to_string(),
        };
        assert_eq!(event.recipe(), "Cake");
        assert_eq!(event.ingredient(), Some("Flour"));
        assert_eq!(event.values(), Some(("2", "3")));

        let event = ChangeEvent::RecipeAdded {
            name: "Cake".to_string(),
        };
        assert_eq!(event.ingredient(), None);
        assert_eq!(event.values(), None);
    }

    #[test]
    fn test_events_serialize_with_kind_tag() {
        let event = ChangeEvent::BakeTimeChanged {
            recipe: "A".to_string(),
            old: "30".to_string(),
            new: "35".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"kind": "bake_time_changed", "recipe": "A", "old": "30", "new": "35"})
        );
    }
}
