use crate::core::report::REPORT_EXTENSIONS;
use crate::formats::MAX_INDENT;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every section and key may be omitted.
///
/// ```toml
/// [output]
/// indent = 2
/// directory = "${HOME}/converted"
/// quiet = false
///
/// [diff]
/// report = "changes.csv"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub output: Option<OutputConfig>,
    pub diff: Option<DiffConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub indent: Option<usize>,
    pub directory: Option<String>,
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffConfig {
    pub report: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EtlError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => EtlError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(indent) = self.indent() {
            validation::validate_range("output.indent", indent, 0, MAX_INDENT)?;
        }

        if let Some(directory) = self.output_directory() {
            validation::validate_path("output.directory", directory)?;
        }

        if let Some(report) = self.report_path() {
            validation::validate_path("diff.report", report)?;
            validation::validate_file_extensions("diff.report", &[report], &REPORT_EXTENSIONS)?;
        }

        Ok(())
    }

    pub fn indent(&self) -> Option<usize> {
        self.output.as_ref().and_then(|o| o.indent)
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.directory.as_deref())
    }

    pub fn quiet(&self) -> bool {
        self.output.as_ref().and_then(|o| o.quiet).unwrap_or(false)
    }

    pub fn report_path(&self) -> Option<&str> {
        self.diff.as_ref().and_then(|d| d.report.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
