pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    cleaner::TabularCleaner,
    dates::DateParser,
    etl::CleaningEngine,
    pipeline::CsvCleaningPipeline,
    steps::{customer_cleaning_steps, CaseMode, Step},
};
pub use domain::model::{CleanReport, CleanResult, Dataset, OutputFormat, Record, Value};
pub use utils::error::{CleanError, ParseWarning, Result};
