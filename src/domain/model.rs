use crate::utils::error::{CleanError, ParseWarning, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::{Read, Write};

pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Column names are keys: lookups, JSON objects and renames all assume each
/// name appears once.
pub(crate) fn ensure_unique_columns(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(CleanError::DuplicateColumn {
                column: name.clone(),
            });
        }
    }
    Ok(())
}

/// One field of a record. `Missing` is the missing marker and never equals a
/// data value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Missing,
    Integer(i64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    /// Infer a value from a raw delimited field.
    ///
    /// Blank fields are missing. Only the canonical decimal form of an `i64`
    /// becomes an integer, so `"007"` or `"+1"` keep their source text.
    pub fn infer(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Value::Missing;
        }
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Value::Integer(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Missing marker, or text that is empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Missing => serde_json::Value::Null,
            Value::Integer(n) => serde_json::Value::Number((*n).into()),
            Value::Date(d) => serde_json::Value::String(d.format(DATE_OUTPUT_FORMAT).to_string()),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d.format(DATE_OUTPUT_FORMAT)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::infer(raw)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// One row. Values are positional; the owning [`Dataset`] holds the column
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub(crate) values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// In-memory table. Every record has exactly one value per column, in column
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    pub(crate) columns: Vec<String>,
    pub(crate) records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Build a dataset from raw string rows, inferring each value.
    pub fn from_rows<C, R, S>(columns: &[C], rows: &[R]) -> Result<Self>
    where
        C: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        ensure_unique_columns(&columns)?;
        let mut dataset = Dataset::new(columns);
        for (i, row) in rows.iter().enumerate() {
            let values = row.as_ref().iter().map(|raw| Value::infer(raw.as_ref())).collect();
            dataset.push_at(values, i as u64 + 2)?;
        }
        Ok(dataset)
    }

    pub fn push(&mut self, values: Vec<Value>) -> Result<()> {
        let line = self.records.len() as u64 + 2;
        self.push_at(values, line)
    }

    fn push_at(&mut self, values: Vec<Value>, line: u64) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(CleanError::MalformedRecord {
                line,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.records.push(Record::new(values));
        Ok(())
    }

    /// Parse a delimited text stream with a header row.
    ///
    /// Short records are padded with the missing marker; records wider than
    /// the header and repeated header names are rejected.
    pub fn from_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if i == 0 {
                    name.trim_start_matches('\u{feff}').to_string()
                } else {
                    name.to_string()
                }
            })
            .collect();
        ensure_unique_columns(&columns)?;
        let width = columns.len();
        let mut dataset = Dataset::new(columns);

        for result in rdr.records() {
            let row = result?;
            if row.len() > width {
                return Err(CleanError::MalformedRecord {
                    line: row.position().map(|p| p.line()).unwrap_or_default(),
                    expected: width,
                    found: row.len(),
                });
            }
            if row.len() < width {
                tracing::debug!(
                    "Padding short record at line {} ({} of {} fields)",
                    row.position().map(|p| p.line()).unwrap_or_default(),
                    row.len(),
                    width
                );
            }
            let mut values: Vec<Value> = row.iter().map(Value::infer).collect();
            values.resize(width, Value::Missing);
            dataset.records.push(Record::new(values));
        }

        Ok(dataset)
    }

    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_delimited(content.as_bytes(), b',')
    }

    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        wtr.write_record(&self.columns)?;
        for record in &self.records {
            wtr.write_record(record.values.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_delimited_string(&self, delimiter: u8) -> Result<String> {
        let mut buf = Vec::new();
        self.write_delimited(&mut buf, delimiter)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Records as JSON objects keyed in column order. A repeated column name
    /// would collapse two fields into one key, so it is an error here.
    pub fn to_json_rows(&self) -> Result<serde_json::Value> {
        ensure_unique_columns(&self.columns)?;
        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut obj = serde_json::Map::with_capacity(self.columns.len());
                for (column, value) in self.columns.iter().zip(&record.values) {
                    obj.insert(column.clone(), value.to_json());
                }
                serde_json::Value::Object(obj)
            })
            .collect();
        Ok(serde_json::Value::Array(rows))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of `name`, or a schema error naming the operation that asked.
    /// Duplicate names resolve to the first match.
    pub fn column_index(&self, name: &str, operation: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CleanError::schema(name, operation))
    }

    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(name, "column lookup")?;
        Ok(self.records.iter().map(|r| &r.values[idx]).collect())
    }

    pub fn value(&self, row: usize, column: &str) -> Result<Option<&Value>> {
        let idx = self.column_index(column, "value lookup")?;
        Ok(self.records.get(row).map(|r| &r.values[idx]))
    }

    pub fn missing_counts(&self) -> Vec<ColumnMissing> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| ColumnMissing {
                column: column.clone(),
                missing: self
                    .records
                    .iter()
                    .filter(|r| r.values[idx].is_missing())
                    .count(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDiagnostic {
    pub step: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub values_changed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub steps: Vec<StepDiagnostic>,
    pub warnings: Vec<ParseWarning>,
    pub missing_counts: Vec<ColumnMissing>,
}

impl CleanReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

#[derive(Debug, Clone)]
pub struct CleanResult {
    pub dataset: Dataset,
    pub report: CleanReport,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outputs: Vec<String>,
    pub report: CleanReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    pub fn render(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Csv => Ok(dataset.to_delimited_string(b',')?.into_bytes()),
            OutputFormat::Tsv => Ok(dataset.to_delimited_string(b'\t')?.into_bytes()),
            OutputFormat::Json => Ok(serde_json::to_vec_pretty(&dataset.to_json_rows()?)?),
        }
    }
}
