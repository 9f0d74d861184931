pub mod compare;
pub mod convert_pipeline;
pub mod diff;
pub mod etl;
pub mod report;
pub mod stats;

pub use crate::domain::model::{Ingredient, Recipe, RecipeCollection, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
