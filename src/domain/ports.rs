use crate::core::steps::Step;
use crate::domain::model::{CleanResult, Dataset, OutputFormat};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Input field delimiter, checked to be a single usable ASCII byte.
    fn delimiter(&self) -> Result<u8>;
    fn steps(&self) -> &[Step];
    fn output_formats(&self) -> &[OutputFormat];
    /// File stem shared by every rendered output.
    fn output_name(&self) -> &str;
    /// Pipeline-wide date formats; empty means the built-in list.
    fn date_formats(&self) -> &[String];
    fn write_report(&self) -> bool;
    /// Archive filename when outputs are bundled into a zip.
    fn compression(&self) -> Option<&str>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Dataset>;
    fn transform(&self, data: Dataset) -> Result<CleanResult>;
    fn load(&self, result: &CleanResult) -> Result<Vec<String>>;
}
