use crate::core::dates::DateParser;
use crate::core::steps::{CaseMode, Step};
use crate::domain::model::{CleanReport, CleanResult, Dataset, StepDiagnostic, Value};
use crate::utils::error::Result;

/// Applies an ordered chain of cleaning steps to one dataset and keeps the
/// row-count diagnostics for each of them.
///
/// ```
/// use tabular_clean::{CaseMode, Dataset, TabularCleaner};
///
/// # fn main() -> tabular_clean::Result<()> {
/// let raw = Dataset::from_csv_str("Email,Country\na@x.io,chile\n,Peru\na@x.io,chile\n")?;
/// let result = TabularCleaner::new(raw)
///     .drop_rows_with_missing(&["Email"])?
///     .deduplicate()?
///     .normalize_case("Country", CaseMode::Upper)?
///     .finish();
///
/// assert_eq!(result.dataset.len(), 1);
/// assert_eq!(result.report.rows_removed(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TabularCleaner {
    dataset: Dataset,
    date_parser: DateParser,
    report: CleanReport,
}

impl TabularCleaner {
    pub fn new(dataset: Dataset) -> Self {
        let report = CleanReport {
            rows_in: dataset.len(),
            ..CleanReport::default()
        };
        Self {
            dataset,
            date_parser: DateParser::default(),
            report,
        }
    }

    /// Date parser used by `parse_dates` steps that carry no formats of their own.
    pub fn with_date_parser(mut self, parser: DateParser) -> Self {
        self.date_parser = parser;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn report(&self) -> &CleanReport {
        &self.report
    }

    pub fn parse_dates(self, column: &str) -> Result<Self> {
        self.apply(&Step::ParseDates {
            column: column.to_string(),
            formats: Vec::new(),
        })
    }

    pub fn drop_rows_with_missing<S: AsRef<str>>(self, columns: &[S]) -> Result<Self> {
        self.apply(&Step::DropRowsWithMissing {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    pub fn deduplicate(self) -> Result<Self> {
        self.apply(&Step::Deduplicate)
    }

    pub fn trim_column_names(self) -> Result<Self> {
        self.apply(&Step::TrimColumnNames)
    }

    pub fn fill_missing(self, column: &str, value: &str) -> Result<Self> {
        self.apply(&Step::FillMissing {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    pub fn normalize_case(self, column: &str, mode: CaseMode) -> Result<Self> {
        self.apply(&Step::NormalizeCase {
            column: column.to_string(),
            mode,
        })
    }

    pub fn rename_column(self, from: &str, to: &str) -> Result<Self> {
        self.apply(&Step::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Apply one step. On error the run is over: the cleaner is consumed and
    /// no partial result escapes.
    pub fn apply(mut self, step: &Step) -> Result<Self> {
        let rows_before = self.dataset.len();

        let values_changed = match step {
            Step::ParseDates { column, formats } => {
                let dates_before = self.count_dates(column)?;
                let warnings = if formats.is_empty() {
                    self.dataset.parse_dates(column, &self.date_parser)?
                } else {
                    self.dataset
                        .parse_dates(column, &DateParser::with_formats(formats))?
                };
                for warning in &warnings {
                    tracing::warn!("⚠️ Unparseable date at {}", warning);
                }
                let parsed = self.count_dates(column)? - dates_before;
                let changed = parsed + warnings.len();
                self.report.warnings.extend(warnings);
                changed
            }
            Step::DropRowsWithMissing { columns } => {
                self.dataset.drop_rows_with_missing(columns.as_slice())?
            }
            Step::Deduplicate => self.dataset.deduplicate(),
            Step::TrimColumnNames => self.dataset.trim_column_names()?,
            Step::FillMissing { column, value } => {
                self.dataset.fill_missing(column, &Value::infer(value))?
            }
            Step::NormalizeCase { column, mode } => self.dataset.normalize_case(column, *mode)?,
            Step::RenameColumn { from, to } => {
                self.dataset.rename_column(from, to)?;
                usize::from(from != to)
            }
        };

        let diagnostic = StepDiagnostic {
            step: step.to_string(),
            rows_before,
            rows_after: self.dataset.len(),
            values_changed,
        };
        tracing::debug!(
            "🧹 {} - rows {} -> {}, {} value(s) changed",
            diagnostic.step,
            diagnostic.rows_before,
            diagnostic.rows_after,
            diagnostic.values_changed
        );
        self.report.steps.push(diagnostic);

        Ok(self)
    }

    fn count_dates(&self, column: &str) -> Result<usize> {
        Ok(self
            .dataset
            .column(column)?
            .iter()
            .filter(|v| matches!(v, Value::Date(_)))
            .count())
    }

    pub fn run(self, steps: &[Step]) -> Result<Self> {
        steps.iter().try_fold(self, |cleaner, step| cleaner.apply(step))
    }

    pub fn finish(mut self) -> CleanResult {
        self.report.rows_out = self.dataset.len();
        self.report.missing_counts = self.dataset.missing_counts();
        CleanResult {
            dataset: self.dataset,
            report: self.report,
        }
    }
}
