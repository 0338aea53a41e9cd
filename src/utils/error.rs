use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid cost price '{value}' for item {item_code} (line {line}): {reason}")]
    InvalidCostPrice {
        item_code: String,
        line: u64,
        value: String,
        reason: String,
    },

    #[error("Invalid value '{value}' in field {field} for item {item_code} (line {line})")]
    InvalidField {
        item_code: String,
        line: u64,
        field: String,
        value: String,
    },

    #[error("Price for item {item_code} (line {line}) is too large to calculate")]
    PriceOverflow { item_code: String, line: u64 },

    #[error("Failed to write output file {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Output,
    Configuration,
    System,
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
            EtlError::FileNotFound { .. } | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::InvalidCostPrice { .. }
            | EtlError::InvalidField { .. }
            | EtlError::PriceOverflow { .. } => ErrorCategory::Data,
            EtlError::WriteError { .. } => ErrorCategory::Output,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 來源檔案與資料列的問題只會跳過該部分，輸出寫不出去才是整體失敗
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::FileNotFound { path } => {
                format!("Check that '{}' exists and the path is spelled correctly", path)
            }
            EtlError::CsvError(_) => {
                "Make sure the file is UTF-8 encoded and uses ';' as delimiter".to_string()
            }
            EtlError::InvalidCostPrice { .. } => {
                "Cost prices must be non-negative decimals such as '12.50 €'".to_string()
            }
            EtlError::InvalidField { field, .. } => {
                format!("Field '{}' must contain a whole number", field)
            }
            EtlError::PriceOverflow { item_code, .. } => format!(
                "Check the cost price and price unit of item {}",
                item_code
            ),
            EtlError::WriteError { path, .. } => format!(
                "Check that the directory of '{}' is writable and the file is not open elsewhere",
                path
            ),
            EtlError::IoError(_) => "Check file permissions and available disk space".to_string(),
            EtlError::ConfigError { .. } | EtlError::ConfigValidationError { .. } => {
                "Review the configuration file syntax".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read input: {}", self),
            ErrorCategory::Data => format!("Skipped invalid data: {}", self),
            ErrorCategory::Output => format!("Could not write the price list: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
