use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Upper,
    Lower,
}

impl CaseMode {
    pub fn apply(&self, s: &str) -> String {
        match self {
            CaseMode::Upper => s.trim().to_uppercase(),
            CaseMode::Lower => s.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseMode::Upper => f.write_str("upper"),
            CaseMode::Lower => f.write_str("lower"),
        }
    }
}

/// One declared cleaning transform.
///
/// In TOML each step is a `[[transform.steps]]` table tagged by `op`:
///
/// ```toml
/// [[transform.steps]]
/// op = "normalize_case"
/// column = "Country"
/// mode = "upper"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    ParseDates {
        column: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        formats: Vec<String>,
    },
    DropRowsWithMissing {
        columns: Vec<String>,
    },
    Deduplicate,
    TrimColumnNames,
    FillMissing {
        column: String,
        value: String,
    },
    NormalizeCase {
        column: String,
        mode: CaseMode,
    },
    RenameColumn {
        from: String,
        to: String,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::ParseDates { .. } => "parse_dates",
            Step::DropRowsWithMissing { .. } => "drop_rows_with_missing",
            Step::Deduplicate => "deduplicate",
            Step::TrimColumnNames => "trim_column_names",
            Step::FillMissing { .. } => "fill_missing",
            Step::NormalizeCase { .. } => "normalize_case",
            Step::RenameColumn { .. } => "rename_column",
        }
    }

    /// Column names this step requires to exist when it runs.
    pub fn referenced_columns(&self) -> Vec<&str> {
        match self {
            Step::ParseDates { column, .. }
            | Step::FillMissing { column, .. }
            | Step::NormalizeCase { column, .. } => vec![column.as_str()],
            Step::DropRowsWithMissing { columns } => columns.iter().map(String::as_str).collect(),
            Step::RenameColumn { from, .. } => vec![from.as_str()],
            Step::Deduplicate | Step::TrimColumnNames => Vec::new(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::ParseDates { column, .. } => write!(f, "parse_dates({:?})", column),
            Step::DropRowsWithMissing { columns } => {
                write!(f, "drop_rows_with_missing({:?})", columns)
            }
            Step::Deduplicate => f.write_str("deduplicate()"),
            Step::TrimColumnNames => f.write_str("trim_column_names()"),
            Step::FillMissing { column, value } => {
                write!(f, "fill_missing({:?}, {:?})", column, value)
            }
            Step::NormalizeCase { column, mode } => {
                write!(f, "normalize_case({:?}, {})", column, mode)
            }
            Step::RenameColumn { from, to } => write!(f, "rename_column({:?}, {:?})", from, to),
        }
    }
}

/// Built-in cleaning chain for the customer export, used when no
/// configuration file is given.
pub fn customer_cleaning_steps() -> Vec<Step> {
    vec![
        Step::TrimColumnNames,
        Step::ParseDates {
            column: "Subscription Date".to_string(),
            formats: Vec::new(),
        },
        Step::DropRowsWithMissing {
            columns: vec!["Email".to_string()],
        },
        Step::Deduplicate,
        Step::FillMissing {
            column: "Company".to_string(),
            value: "Unknown".to_string(),
        },
        Step::NormalizeCase {
            column: "Country".to_string(),
            mode: CaseMode::Upper,
        },
    ]
}
