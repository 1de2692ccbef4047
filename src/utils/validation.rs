use crate::core::dates::is_valid_format;
use crate::core::steps::Step;
use crate::utils::error::{CleanError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CleanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CleanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CleanError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CleanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Delimiters must be a single ASCII byte and cannot be a quote or line break.
pub fn validate_delimiter(field_name: &str, delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() || matches!(delimiter, '"' | '\n' | '\r') {
        return Err(CleanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: delimiter.escape_default().to_string(),
            reason: "Delimiter must be a single ASCII character other than a quote or newline"
                .to_string(),
        });
    }
    Ok(delimiter as u8)
}

pub fn validate_date_formats(field_name: &str, formats: &[String]) -> Result<()> {
    for format in formats {
        if !is_valid_format(format) {
            return Err(CleanError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: "Not a valid strftime date format".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_steps(field_name: &str, steps: &[Step]) -> Result<()> {
    for (i, step) in steps.iter().enumerate() {
        let field = format!("{}[{}]", field_name, i);

        if let Step::DropRowsWithMissing { columns } = step {
            if columns.is_empty() {
                return Err(CleanError::ConfigValidationError {
                    field,
                    message: "drop_rows_with_missing needs at least one column".to_string(),
                });
            }
        }

        for column in step.referenced_columns() {
            validate_non_empty_string(&format!("{}.column", field), column)?;
        }

        match step {
            Step::ParseDates { formats, .. } => {
                validate_date_formats(&format!("{}.formats", field), formats)?
            }
            Step::RenameColumn { to, .. } => validate_non_empty_string(&format!("{}.to", field), to)?,
            _ => {}
        }
    }
    Ok(())
}
