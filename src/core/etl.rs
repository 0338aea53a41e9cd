use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract -> transform -> load. Only a failed load is an error;
    /// skipped files and records are returned as issues in the summary.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting price list run");

        tracing::info!("📥 Extracting price lists...");
        let extracted = self.pipeline.extract().await?;
        let row_count: usize = extracted.batches.iter().map(|b| b.rows.len()).sum();
        tracing::info!(
            "Extracted {} rows from {} file(s)",
            row_count,
            extracted.batches.len()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("🔄 Transforming prices...");
        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!("Transformed {} records", transformed.records.len());
        self.monitor.log_stats("Transform");

        let records_written = transformed.records.len();
        let issues = transformed.issues.clone();

        tracing::info!("💾 Writing price list...");
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        if !issues.is_empty() {
            tracing::warn!("⚠️ Run finished with {} issue(s)", issues.len());
        }

        Ok(RunSummary {
            output_path,
            records_written,
            issues,
        })
    }
}
