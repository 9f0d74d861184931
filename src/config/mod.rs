#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::{CliConfig, Mode};

#[cfg(feature = "cli")]
mod cli_config {
    use super::toml_config::TomlConfig;
    use crate::core::report::REPORT_EXTENSIONS;
    use crate::core::ConfigProvider;
    use crate::formats::{self, Format, DEFAULT_INDENT, MAX_INDENT};
    use crate::utils::error::{EtlError, Result};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::path::Path;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "recipe-etl")]
    #[command(about = "Convert recipe databases between XML and JSON, or compare two of them")]
    pub struct CliConfig {
        /// Path to the XML or JSON file to convert
        #[arg(short = 'f', long = "file", conflicts_with_all = ["old", "new"])]
        pub file: Option<String>,

        /// Path to the old XML or JSON database
        #[arg(long, requires = "new")]
        pub old: Option<String>,

        /// Path to the new XML or JSON database
        #[arg(long, requires = "old")]
        pub new: Option<String>,

        /// Where to write the converted file (default: input name with the other extension)
        #[arg(short, long)]
        pub output: Option<String>,

        /// Spaces per indentation level in written and printed files
        #[arg(long)]
        pub indent: Option<usize>,

        /// Write the list of changes to a .json or .csv report
        #[arg(long)]
        pub report: Option<String>,

        /// Path to a TOML settings file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Do not print parsed structures
        #[arg(short, long)]
        pub quiet: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Mode<'a> {
        Convert { input: &'a str },
        Diff { old: &'a str, new: &'a str },
    }

    impl CliConfig {
        pub fn mode(&self) -> Result<Mode<'_>> {
            match (&self.file, &self.old, &self.new) {
                (Some(input), None, None) => Ok(Mode::Convert { input }),
                (None, Some(old), Some(new)) => Ok(Mode::Diff { old, new }),
                (None, None, None) => Err(EtlError::MissingConfigError {
                    field: "-f <file> or --old <file> --new <file>".to_string(),
                }),
                _ => Err(EtlError::ConfigValidationError {
                    field: "mode".to_string(),
                    message: "Use either -f to convert or --old and --new to compare".to_string(),
                }),
            }
        }

        /// 命令列優先，設定檔只補上未指定的值
        pub fn apply_settings(&mut self, settings: &TomlConfig) {
            if self.indent.is_none() {
                self.indent = settings.indent();
            }
            if self.report.is_none() {
                self.report = settings.report_path().map(str::to_string);
            }
            if settings.quiet() {
                self.quiet = true;
            }

            if self.output.is_none() {
                if let (Some(directory), Some(input)) = (settings.output_directory(), &self.file) {
                    let target = Format::from_path(input).map(Format::other);
                    let name = target.and_then(|target| formats::default_output_path(input, target));
                    if let Ok(name) = name {
                        let file_name = Path::new(&name)
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or(name);
                        self.output =
                            Some(Path::new(directory).join(file_name).to_string_lossy().into_owned());
                    }
                }
            }
        }

        fn validate_input(field: &str, path: &str) -> Result<()> {
            validation::validate_path(field, path)?;
            validation::validate_file_exists(path)?;
            Format::from_path(path)?;
            Ok(())
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match self.mode()? {
                Mode::Convert { input } => {
                    Self::validate_input("file", input)?;

                    if let Some(output) = &self.output {
                        validation::validate_path("output", output)?;
                        let expected = Format::from_path(input)?.other();
                        if Format::from_path(output)? != expected {
                            return Err(EtlError::InvalidConfigValueError {
                                field: "output".to_string(),
                                value: output.clone(),
                                reason: format!(
                                    "Output must be a .{} file",
                                    expected.extension()
                                ),
                            });
                        }
                    }
                }
                Mode::Diff { old, new } => {
                    Self::validate_input("old", old)?;
                    Self::validate_input("new", new)?;

                    if let Some(report) = &self.report {
                        validation::validate_path("report", report)?;
                        validation::validate_file_extensions(
                            "report",
                            &[report.as_str()],
                            &REPORT_EXTENSIONS,
                        )?;
                    }
                }
            }

            if let Some(indent) = self.indent {
                validation::validate_range("indent", indent, 0, MAX_INDENT)?;
            }

            Ok(())
        }
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            self.file.as_deref().unwrap_or_default()
        }

        fn output_path(&self) -> Option<&str> {
            self.output.as_deref()
        }

        fn indent(&self) -> usize {
            self.indent.unwrap_or(DEFAULT_INDENT)
        }

        fn echo(&self) -> bool {
            !self.quiet
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use tempfile::{Builder, TempDir};

        fn recipe_file(dir: &TempDir, name: &str) -> String {
            let path = dir.path().join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(b"<recipes/>").unwrap();
            path.to_string_lossy().into_owned()
        }

        #[test]
        fn test_parse_convert_flags() {
            let config = CliConfig::parse_from(["recipe-etl", "-f", "cakes.xml", "--indent", "2"]);

            assert_eq!(config.mode().unwrap(), Mode::Convert { input: "cakes.xml" });
            assert_eq!(config.indent(), 2);
            assert!(config.echo());
        }

        #[test]
        fn test_parse_diff_flags() {
            let config = CliConfig::parse_from([
                "recipe-etl",
                "--old",
                "original_database.xml",
                "--new",
                "stolen_database.json",
                "-q",
            ]);

            assert_eq!(
                config.mode().unwrap(),
                Mode::Diff {
                    old: "original_database.xml",
                    new: "stolen_database.json"
                }
            );
            assert!(!config.echo());
            assert_eq!(config.indent(), DEFAULT_INDENT);
        }

        #[test]
        fn test_modes_conflict() {
            let result = CliConfig::try_parse_from([
                "recipe-etl", "-f", "a.xml", "--old", "b.xml", "--new", "c.xml",
            ]);
            assert!(result.is_err());

            let result = CliConfig::try_parse_from(["recipe-etl", "--old", "b.xml"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_no_mode_is_missing_config() {
            let config = CliConfig::parse_from(["recipe-etl"]);
            assert!(matches!(
                config.validate(),
                Err(EtlError::MissingConfigError { .. })
            ));
        }

        #[test]
        fn test_validate_checks_existence_then_extension() {
            let dir = TempDir::new().unwrap();

            let config = CliConfig::parse_from(["recipe-etl", "-f", "nowhere/cakes.xml"]);
            assert!(matches!(config.validate(), Err(EtlError::FileNotFound { .. })));

            let text = Builder::new().suffix(".yaml").tempfile_in(dir.path()).unwrap();
            let path = text.path().to_string_lossy().into_owned();
            let config = CliConfig::parse_from(["recipe-etl", "-f", path.as_str()]);
            assert!(matches!(config.validate(), Err(EtlError::UnsupportedFormat { .. })));

            let xml = recipe_file(&dir, "cakes.xml");
            let config = CliConfig::parse_from(["recipe-etl", "-f", xml.as_str()]);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_output_must_use_target_format() {
            let dir = TempDir::new().unwrap();
            let xml = recipe_file(&dir, "cakes.xml");

            let config = CliConfig::parse_from(["recipe-etl", "-f", xml.as_str(), "-o", "out.xml"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["recipe-etl", "-f", xml.as_str(), "-o", "out.json"]);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_report_and_indent_validation() {
            let dir = TempDir::new().unwrap();
            let old = recipe_file(&dir, "old.xml");
            let new = recipe_file(&dir, "new.xml");

            let config = CliConfig::parse_from([
                "recipe-etl", "--old", old.as_str(), "--new", new.as_str(), "--report", "changes.txt",
            ]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from([
                "recipe-etl", "--old", old.as_str(), "--new", new.as_str(), "--report", "changes.csv",
            ]);
            assert!(config.validate().is_ok());

            let config =
                CliConfig::parse_from(["recipe-etl", "--old", old.as_str(), "--new", new.as_str(), "--indent", "40"]);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_apply_settings_fills_unset_values() {
            let settings = TomlConfig::from_toml_str(
                r#"
[output]
indent = 2
directory = "converted"
quiet = true

[diff]
report = "changes.json"
"#,
            )
            .unwrap();

            let mut config = CliConfig::parse_from(["recipe-etl", "-f", "data/cakes.xml"]);
            config.apply_settings(&settings);

            assert_eq!(config.indent(), 2);
            assert!(!config.echo());
            assert_eq!(config.report.as_deref(), Some("changes.json"));
            let expected = Path::new("converted")
                .join("cakes.json")
                .to_string_lossy()
                .into_owned();
            assert_eq!(config.output_path(), Some(expected.as_str()));

            let mut config = CliConfig::parse_from([
                "recipe-etl", "-f", "cakes.json", "--indent", "8", "-o", "mine.xml",
            ]);
            config.apply_settings(&settings);
            assert_eq!(config.indent(), 8);
            assert_eq!(config.output_path(), Some("mine.xml"));
        }
    }
}
