pub mod cli;
pub mod toml_config;

use crate::domain::model::OutputFormat;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned";
pub const DEFAULT_ARCHIVE_NAME: &str = "cleaned.zip";
pub const DEFAULT_FORMATS: &[OutputFormat] = &[OutputFormat::Csv];

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::{DEFAULT_ARCHIVE_NAME, DEFAULT_FORMATS, DEFAULT_OUTPUT_NAME, DEFAULT_OUTPUT_PATH};
    use crate::core::steps::{customer_cleaning_steps, Step};
    use crate::core::ConfigProvider;
    use crate::domain::model::OutputFormat;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "tabular-clean")]
    #[command(about = "Clean a delimited customer dataset")]
    pub struct CliConfig {
        /// Input CSV file with a header row
        pub input: String,

        /// TOML file declaring the cleaning steps (defaults to the built-in customer steps)
        #[arg(short, long)]
        pub config: Option<String>,

        /// Output directory [default: ./output]
        #[arg(short, long)]
        pub output_path: Option<String>,

        /// Output formats [default: csv]
        #[arg(long, value_enum, value_delimiter = ',')]
        pub format: Vec<OutputFormat>,

        /// Field delimiter of the input [default: ,]
        #[arg(long)]
        pub delimiter: Option<char>,

        /// Bundle all outputs into one zip archive
        #[arg(long)]
        pub zip: bool,

        /// Do not write report.json
        #[arg(long)]
        pub no_report: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub json_logs: bool,

        /// Log CPU and memory usage per stage
        #[arg(long)]
        pub monitor: bool,

        /// Load and validate, print the steps, but do not clean anything
        #[arg(long)]
        pub dry_run: bool,

        #[arg(skip = customer_cleaning_steps())]
        pub steps: Vec<Step>,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
        }

        fn delimiter(&self) -> Result<u8> {
            match self.delimiter {
                Some(delimiter) => validation::validate_delimiter("delimiter", delimiter),
                None => Ok(b','),
            }
        }

        fn steps(&self) -> &[Step] {
            &self.steps
        }

        fn output_formats(&self) -> &[OutputFormat] {
            if self.format.is_empty() {
                DEFAULT_FORMATS
            } else {
                &self.format
            }
        }

        fn output_name(&self) -> &str {
            DEFAULT_OUTPUT_NAME
        }

        fn date_formats(&self) -> &[String] {
            &[]
        }

        fn write_report(&self) -> bool {
            !self.no_report
        }

        fn compression(&self) -> Option<&str> {
            self.zip.then_some(DEFAULT_ARCHIVE_NAME)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("input", &self.input)?;
            validation::validate_path("output_path", self.output_path())?;
            if let Some(delimiter) = self.delimiter {
                validation::validate_delimiter("delimiter", delimiter)?;
            }
            validation::validate_steps("steps", &self.steps)
        }
    }

}
