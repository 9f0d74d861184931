use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("The specified file does not exist: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file format for '{path}'. Supported formats are XML and JSON")]
    UnsupportedFormat { path: String },

    #[error("XML parsing error in '{path}': {message}")]
    XmlError { path: String, message: String },

    #[error("XML serialization error: {message}")]
    XmlSerializationError { message: String },

    #[error("JSON parsing error in '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Input must contain only numbers: '{token}' ({reason})")]
    InvalidNumber { token: String, reason: String },

    #[error("Number {value} is out of range ({min}, {max})")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required setting: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 輸入檔案或標準輸入的問題
    Input,
    /// 資料格式錯誤 (XML / JSON / CSV)
    Format,
    /// 檔案系統
    Io,
    /// 命令列或設定檔
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FileNotFound { .. }
            | EtlError::InvalidNumber { .. }
            | EtlError::OutOfRange { .. } => ErrorCategory::Input,
            EtlError::UnsupportedFormat { .. }
            | EtlError::XmlError { .. }
            | EtlError::XmlSerializationError { .. }
            | EtlError::JsonError { .. }
            | EtlError::SerializationError(_)
            | EtlError::CsvError(_) => ErrorCategory::Format,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 統計工具遇到這兩種情況仍會輸出已讀取的部分結果
            EtlError::InvalidNumber { .. } | EtlError::OutOfRange { .. } => ErrorSeverity::Low,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::XmlSerializationError { .. } => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::FileNotFound { .. } => "Check the path passed with -f, --old or --new",
            EtlError::UnsupportedFormat { .. } => "Use a file ending in .xml or .json",
            EtlError::XmlError { .. } => {
                "Make sure the file has a <recipes> root with <cake> entries"
            }
            EtlError::JsonError { .. } => {
                "Make sure the file is an object with a \"cake\" array of recipes"
            }
            EtlError::SerializationError(_) => "The recipe data could not be encoded as JSON",
            EtlError::XmlSerializationError { .. } => {
                "The recipe data could not be encoded as XML"
            }
            EtlError::CsvError(_) => "Check that the report path is writable",
            EtlError::IoError(_) => "Check file permissions and free disk space",
            EtlError::InvalidNumber { .. } => "Enter one integer per line",
            EtlError::OutOfRange { .. } => "Enter integers strictly between -100000 and 100000",
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => "Run with --help to see the accepted options",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::FileNotFound { path } => {
                format!("The specified file does not exist: {}", path)
            }
            EtlError::UnsupportedFormat { .. } => {
                "Invalid file format. Supported formats are XML and JSON.".to_string()
            }
            EtlError::XmlError { path, message } => {
                format!("Error while reading the XML file '{}': {}", path, message)
            }
            EtlError::JsonError { path, source } => {
                format!("Error while reading the JSON file '{}': {}", path, source)
            }
            EtlError::InvalidNumber { reason, .. } => {
                format!("Input must contain only numbers! Error: {}", reason)
            }
            EtlError::OutOfRange { min, max, .. } => {
                format!("Number is out of range ({}, {}).", min, max)
            }
            other => other.to_string(),
        }
    }

    /// 依嚴重程度決定行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
