pub mod cleaner;
pub mod dates;
pub mod etl;
pub mod operations;
pub mod pipeline;
pub mod steps;

pub use crate::domain::model::{CleanResult, Dataset, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use cleaner::TabularCleaner;
