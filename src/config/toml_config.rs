use super::{DEFAULT_ARCHIVE_NAME, DEFAULT_OUTPUT_NAME};
use crate::core::steps::Step;
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{CleanError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 可由命令列的輸入路徑覆蓋
    pub path: Option<String>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub date_formats: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<OutputFormat>,
    pub filename: Option<String>,
    pub report: Option<bool>,
    pub compression: Option<CompressionConfig>,
}

fn default_output_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Csv]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CleanError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CleanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CleanError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        let input = validation::validate_required_field("source.path", &self.source.path)?;
        validation::validate_path("source.path", input)?;

        if let Some(delimiter) = self.source.delimiter {
            validation::validate_delimiter("source.delimiter", delimiter)?;
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;

        if self.load.output_formats.is_empty() {
            return Err(CleanError::ConfigValidationError {
                field: "load.output_formats".to_string(),
                message: "At least one output format is required".to_string(),
            });
        }

        if let Some(filename) = &self.load.filename {
            validation::validate_non_empty_string("load.filename", filename)?;
        }

        validation::validate_date_formats("transform.date_formats", &self.transform.date_formats)?;
        validation::validate_steps("transform.steps", &self.transform.steps)?;

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// 套用命令列參數；只覆蓋使用者明確指定的項目
    #[cfg(feature = "cli")]
    pub fn apply_overrides(&mut self, cli: &super::CliConfig) {
        self.source.path = Some(cli.input.clone());
        if let Some(output_path) = &cli.output_path {
            self.load.output_path = output_path.clone();
        }
        if !cli.format.is_empty() {
            self.load.output_formats = cli.format.clone();
        }
        if let Some(delimiter) = cli.delimiter {
            self.source.delimiter = Some(delimiter);
        }
        if cli.zip {
            let filename = self.load.compression.take().and_then(|c| c.filename);
            self.load.compression = Some(CompressionConfig {
                enabled: true,
                filename,
            });
        }
        if cli.no_report {
            self.load.report = Some(false);
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.source.path.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn delimiter(&self) -> Result<u8> {
        match self.source.delimiter {
            Some(delimiter) => validation::validate_delimiter("source.delimiter", delimiter),
            None => Ok(b','),
        }
    }

    fn steps(&self) -> &[Step] {
        &self.transform.steps
    }

    fn output_formats(&self) -> &[OutputFormat] {
        &self.load.output_formats
    }

    fn output_name(&self) -> &str {
        self.load.filename.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME)
    }

    fn date_formats(&self) -> &[String] {
        &self.transform.date_formats
    }

    fn write_report(&self) -> bool {
        self.load.report.unwrap_or(true)
    }

    fn compression(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
