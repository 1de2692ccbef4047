use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct CleaningEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CleaningEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting cleaning run");

        // Extract
        let raw_data = self.pipeline.extract()?;
        tracing::info!(
            "📥 Extracted {} records with {} columns",
            raw_data.len(),
            raw_data.columns().len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(raw_data)?;
        tracing::info!(
            "🧹 Cleaned {} -> {} records ({} removed, {} parse warnings)",
            result.report.rows_in,
            result.report.rows_out,
            result.report.rows_removed(),
            result.report.warnings.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let outputs = self.pipeline.load(&result)?;
        for output in &outputs {
            tracing::info!("📁 Output saved to: {}", output);
        }
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            outputs,
            report: result.report,
        })
    }
}
