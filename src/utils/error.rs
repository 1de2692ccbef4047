use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Schema error: column '{column}' not found (required by {operation})")]
    SchemaError { column: String, operation: String },

    #[error("Schema error: column '{column}' already exists")]
    DuplicateColumn { column: String },

    #[error("Malformed record at line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl CleanError {
    pub fn schema(column: impl Into<String>, operation: impl Into<String>) -> Self {
        CleanError::SchemaError {
            column: column.into(),
            operation: operation.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CleanError::SchemaError { .. } | CleanError::DuplicateColumn { .. } => {
                ErrorCategory::Schema
            }
            CleanError::MalformedRecord { .. }
            | CleanError::CsvError(_)
            | CleanError::SerializationError(_) => ErrorCategory::Data,
            CleanError::IoError(_) | CleanError::ZipError(_) => ErrorCategory::Io,
            CleanError::ConfigError { .. }
            | CleanError::ConfigValidationError { .. }
            | CleanError::InvalidConfigValueError { .. }
            | CleanError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Schema | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Process exit status for a failed run; never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CleanError::SchemaError { .. } => {
                "檢查步驟中的欄位名稱是否與輸入檔案的標題列一致 (或先執行 trim_column_names)"
            }
            CleanError::DuplicateColumn { .. } => {
                "確認標題列 (修剪空白後) 沒有重複的欄位名稱，或改名為尚未使用的名稱"
            }
            CleanError::MalformedRecord { .. } => "修正輸入檔案中欄位數量過多的資料列",
            CleanError::CsvError(_) => "確認輸入檔案為有效的 UTF-8 分隔文字檔，且分隔符號設定正確",
            CleanError::IoError(_) => "確認檔案路徑存在且具有讀寫權限",
            CleanError::ZipError(_) => "確認輸出目錄可寫入，或關閉壓縮輸出",
            CleanError::SerializationError(_) => "檢查輸出資料是否包含無法序列化的內容",
            CleanError::ConfigError { .. }
            | CleanError::ConfigValidationError { .. }
            | CleanError::InvalidConfigValueError { .. } => "檢查設定檔內容與格式",
            CleanError::MissingConfigError { .. } => "在設定檔中補上必要的欄位",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CleanError::SchemaError { column, operation } => {
                format!("Column '{}' does not exist (used by {})", column, operation)
            }
            CleanError::MalformedRecord { line, .. } => {
                format!("Input line {} has more fields than the header", line)
            }
            CleanError::IoError(e) => format!("Could not access a file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;

/// A value that could not be coerced to the target type. The field is set to
/// the missing marker and the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub column: String,
    /// Zero-based position of the record at the time the step ran.
    pub row: usize,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} column '{}': {:?} {}",
            self.row, self.column, self.value, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_is_high_severity() {
        let err = CleanError::schema("Email", "drop_rows_with_missing");
        assert_eq!(err.category(), ErrorCategory::Schema);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("'Email'"));
        assert!(err.user_friendly_message().contains("drop_rows_with_missing"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: CleanError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "customers.csv").into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_every_failure_exits_non_zero() {
        let errors = [
            CleanError::schema("Email", "fill_missing"),
            CleanError::DuplicateColumn {
                column: "Email".into(),
            },
            CleanError::MalformedRecord {
                line: 3,
                expected: 2,
                found: 3,
            },
            CleanError::MissingConfigError {
                field: "source.path".into(),
            },
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "out").into(),
        ];
        let codes: Vec<i32> = errors.iter().map(CleanError::exit_code).collect();
        assert_eq!(codes, vec![1, 1, 1, 1, 3]);
    }
}
