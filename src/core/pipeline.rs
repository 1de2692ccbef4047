use crate::core::cleaner::TabularCleaner;
use crate::core::dates::DateParser;
use crate::core::{CleanResult, ConfigProvider, Dataset, Pipeline, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const REPORT_FILENAME: &str = "report.json";

pub struct CsvCleaningPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CsvCleaningPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// 依設定產生所有輸出檔案 (檔名, 內容)
    fn render_outputs(&self, result: &CleanResult) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            let name = format!("{}.{}", self.config.output_name(), format.extension());
            files.push((name, format.render(&result.dataset)?));
        }

        if self.config.write_report() {
            let report = serde_json::to_vec_pretty(&result.report)?;
            files.push((REPORT_FILENAME.to_string(), report));
        }

        Ok(files)
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for CsvCleaningPipeline<S, C> {
    fn extract(&self) -> Result<Dataset> {
        tracing::debug!("Reading input from: {}", self.config.input_path());
        let bytes = self.storage.read_file(self.config.input_path())?;
        tracing::debug!("Read {} bytes", bytes.len());

        Dataset::from_delimited(bytes.as_slice(), self.config.delimiter()?)
    }

    fn transform(&self, data: Dataset) -> Result<CleanResult> {
        let parser = DateParser::with_formats(self.config.date_formats());
        let result = TabularCleaner::new(data)
            .with_date_parser(parser)
            .run(self.config.steps())?
            .finish();
        Ok(result)
    }

    fn load(&self, result: &CleanResult) -> Result<Vec<String>> {
        let files = self.render_outputs(result)?;

        if let Some(archive) = self.config.compression() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                    zip.write_all(data)?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let path = self.output_file(archive);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), path);
            self.storage.write_file(&path, &zip_data)?;
            return Ok(vec![path]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in &files {
            let path = self.output_file(name);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, data)?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::steps::{customer_cleaning_steps, Step};
    use crate::domain::model::{OutputFormat, Value};
    use crate::utils::error::CleanError;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .unwrap()
                .insert(path.to_string(), content.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        fn file_names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).ok_or_else(|| {
                CleanError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        steps: Vec<Step>,
        formats: Vec<OutputFormat>,
        delimiter: u8,
        date_formats: Vec<String>,
        report: bool,
        archive: Option<String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                steps: customer_cleaning_steps(),
                formats: vec![OutputFormat::Csv],
                delimiter: b',',
                date_formats: Vec::new(),
                report: false,
                archive: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "customers.csv"
        }

        fn output_path(&self) -> &str {
            "out/"
        }

        fn delimiter(&self) -> Result<u8> {
            Ok(self.delimiter)
        }

        fn steps(&self) -> &[Step] {
            &self.steps
        }

        fn output_formats(&self) -> &[OutputFormat] {
            &self.formats
        }

        fn output_name(&self) -> &str {
            "cleaned"
        }

        fn date_formats(&self) -> &[String] {
            &self.date_formats
        }

        fn write_report(&self) -> bool {
            self.report
        }

        fn compression(&self) -> Option<&str> {
            self.archive.as_deref()
        }
    }

    const CUSTOMERS: &str = "\
Index,Customer Id,First Name,Company,Country,Email,Subscription Date
1,DD37Cf93aecA6Dc,Sheryl,Rasmussen Group,chile,zunigavanessa@smith.info,2020-08-24
2,1Ef7b82A4CAAD10,Preston,,Chile ,vmata@colon.com,2021-04-23
3,6F94879bDAfE5a6,Roy,Murillo-Perry,Djibouti,,2021-03-25
4,5Cef8BFA16c5e3c,Linda,Dominguez Mcmillan,CHILE,kaitlin13@hernandez.com,not-a-date
";

    #[test]
    fn test_extract_reads_configured_input() {
        let storage = MockStorage::with_file("customers.csv", CUSTOMERS);
        let pipeline = CsvCleaningPipeline::new(storage, MockConfig::new());

        let dataset = pipeline.extract().unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.columns()[5], "Email");
    }

    #[test]
    fn test_extract_missing_input_is_io_error() {
        let pipeline = CsvCleaningPipeline::new(MockStorage::default(), MockConfig::new());
        assert!(matches!(pipeline.extract(), Err(CleanError::IoError(_))));
    }

    #[test]
    fn test_extract_with_semicolon_delimiter() {
        let storage = MockStorage::with_file("customers.csv", "Email;Country\na@x.io;Chile\n");
        let mut config = MockConfig::new();
        config.delimiter = b';';
        let pipeline = CsvCleaningPipeline::new(storage, config);

        let dataset = pipeline.extract().unwrap();
        assert_eq!(dataset.columns(), &["Email", "Country"]);
    }

    #[test]
    fn test_transform_applies_configured_steps() {
        let storage = MockStorage::with_file("customers.csv", CUSTOMERS);
        let pipeline = CsvCleaningPipeline::new(storage, MockConfig::new());

        let data = pipeline.extract().unwrap();
        let result = pipeline.transform(data).unwrap();

        assert_eq!(result.dataset.len(), 3);
        assert_eq!(result.report.warnings.len(), 1);
        assert_eq!(
            result.dataset.value(1, "Company").unwrap(),
            Some(&Value::Text("Unknown".into()))
        );
    }

    #[test]
    fn test_transform_uses_pipeline_date_formats() {
        let storage = MockStorage::with_file("customers.csv", "Subscription Date\n24/08/2020\n");
        let mut config = MockConfig::new();
        config.steps = vec![Step::ParseDates {
            column: "Subscription Date".into(),
            formats: vec![],
        }];
        config.date_formats = vec!["%d/%m/%Y".into()];
        let pipeline = CsvCleaningPipeline::new(storage, config);

        let result = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        assert!(result.report.warnings.is_empty());
    }

    #[test]
    fn test_transform_schema_error() {
        let storage = MockStorage::with_file("customers.csv", "Name\nAna\n");
        let pipeline = CsvCleaningPipeline::new(storage, MockConfig::new());

        let data = pipeline.extract().unwrap();
        assert!(matches!(
            pipeline.transform(data),
            Err(CleanError::SchemaError { .. })
        ));
    }

    #[test]
    fn test_load_writes_each_format_and_report() {
        let storage = MockStorage::with_file("customers.csv", CUSTOMERS);
        let mut config = MockConfig::new();
        config.formats = vec![OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];
        config.report = true;
        let pipeline = CsvCleaningPipeline::new(storage.clone(), config);

        let result = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        let written = pipeline.load(&result).unwrap();

        assert_eq!(
            written,
            vec![
                "out/cleaned.csv",
                "out/cleaned.tsv",
                "out/cleaned.json",
                "out/report.json"
            ]
        );
        assert_eq!(
            storage.file_names(),
            vec![
                "customers.csv",
                "out/cleaned.csv",
                "out/cleaned.json",
                "out/cleaned.tsv",
                "out/report.json"
            ]
        );

        let csv = String::from_utf8(storage.get_file("out/cleaned.csv").unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Index,Customer Id,First Name,Company,Country,Email,Subscription Date")
        );
        assert_eq!(
            lines.next(),
            Some("1,DD37Cf93aecA6Dc,Sheryl,Rasmussen Group,CHILE,zunigavanessa@smith.info,2020-08-24")
        );

        let report: serde_json::Value =
            serde_json::from_slice(&storage.get_file("out/report.json").unwrap()).unwrap();
        assert_eq!(report["rows_in"], 4);
        assert_eq!(report["rows_out"], 3);
        assert_eq!(report["warnings"][0]["value"], "not-a-date");
    }

    #[test]
    fn test_load_zip_bundles_outputs() {
        let storage = MockStorage::with_file("customers.csv", CUSTOMERS);
        let mut config = MockConfig::new();
        config.formats = vec![OutputFormat::Csv, OutputFormat::Json];
        config.report = true;
        config.archive = Some("customers.zip".into());
        let pipeline = CsvCleaningPipeline::new(storage.clone(), config);

        let result = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        let written = pipeline.load(&result).unwrap();
        assert_eq!(written, vec!["out/customers.zip"]);
        assert!(storage.get_file("out/cleaned.csv").is_none());

        let zip_bytes = storage.get_file("out/customers.zip").unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["cleaned.csv", "cleaned.json", "report.json"]);

        let mut json = String::new();
        archive
            .by_name("cleaned.json")
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 3);
        assert_eq!(rows[2]["Subscription Date"], serde_json::Value::Null);
    }
}
