use crate::core::dates::DateParser;
use crate::core::steps::CaseMode;
use crate::domain::model::{ensure_unique_columns, Dataset, Value};
use crate::utils::error::{CleanError, ParseWarning, Result};
use std::collections::HashSet;

// 每個操作都先檢查欄位，再修改資料；失敗時資料集保持不變。
impl Dataset {
    /// Coerce `column` to dates. Unparseable values become the missing marker
    /// and are reported as warnings.
    pub fn parse_dates(&mut self, column: &str, parser: &DateParser) -> Result<Vec<ParseWarning>> {
        let idx = self.column_index(column, "parse_dates")?;
        let mut warnings = Vec::new();

        for (row, record) in self.records.iter_mut().enumerate() {
            let value = &mut record.values[idx];
            let parsed = match value {
                Value::Missing | Value::Date(_) => continue,
                Value::Text(raw) => parser.parse(raw),
                Value::Integer(_) => None,
            };
            match parsed {
                Some(date) => *value = Value::Date(date),
                None => {
                    let raw = value.to_string();
                    if !raw.trim().is_empty() {
                        warnings.push(ParseWarning {
                            column: column.to_string(),
                            row,
                            value: raw,
                            reason: "is not a recognised date".to_string(),
                        });
                    }
                    *value = Value::Missing;
                }
            }
        }

        Ok(warnings)
    }

    /// Remove every record where any of `columns` is missing. Returns the
    /// number of records removed.
    pub fn drop_rows_with_missing<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<usize> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c.as_ref(), "drop_rows_with_missing"))
            .collect::<Result<Vec<_>>>()?;

        let before = self.records.len();
        self.records
            .retain(|record| !indices.iter().any(|&i| record.values[i].is_missing()));
        Ok(before - self.records.len())
    }

    /// Keep the first of every group of identical records. Returns the number
    /// of records removed.
    pub fn deduplicate(&mut self) -> usize {
        let before = self.records.len();
        let mut seen = HashSet::with_capacity(before);
        self.records.retain(|record| seen.insert(record.clone()));
        before - self.records.len()
    }

    /// Returns the number of column names that changed. Fails without
    /// touching the header when two names would become equal.
    pub fn trim_column_names(&mut self) -> Result<usize> {
        let trimmed: Vec<String> = self.columns.iter().map(|c| c.trim().to_string()).collect();
        ensure_unique_columns(&trimmed)?;

        let changed = self
            .columns
            .iter()
            .zip(&trimmed)
            .filter(|(old, new)| old != new)
            .count();
        self.columns = trimmed;
        Ok(changed)
    }

    /// Replace missing values in `column` with `value`. Returns the number of
    /// values filled.
    pub fn fill_missing(&mut self, column: &str, value: &Value) -> Result<usize> {
        let idx = self.column_index(column, "fill_missing")?;
        let mut filled = 0;
        for record in self.records.iter_mut() {
            if record.values[idx].is_missing() {
                record.values[idx] = value.clone();
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// Trim and re-case every text value in `column`. Returns the number of
    /// values that changed.
    pub fn normalize_case(&mut self, column: &str, mode: CaseMode) -> Result<usize> {
        let idx = self.column_index(column, "normalize_case")?;
        let mut changed = 0;
        for record in self.records.iter_mut() {
            if let Value::Text(s) = &mut record.values[idx] {
                let normalized = mode.apply(s);
                if normalized != *s {
                    *s = normalized;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.column_index(from, "rename_column")?;
        if from == to {
            return Ok(());
        }
        if self.columns.iter().any(|c| c == to) {
            return Err(CleanError::DuplicateColumn {
                column: to.to_string(),
            });
        }
        self.columns[idx] = to.to_string();
        Ok(())
    }
}
