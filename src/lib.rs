pub mod config;
pub mod core;
pub mod domain;
pub mod formats;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig, Mode};

pub use config::toml_config::TomlConfig;
pub use core::{
    compare::Comparison,
    convert_pipeline::ConvertPipeline,
    diff::{diff, ChangeEvent},
    etl::EtlEngine,
    stats::{read_samples, Samples, Summary},
};
pub use formats::{Format, RecipeDocument};
pub use utils::error::{EtlError, Result};
