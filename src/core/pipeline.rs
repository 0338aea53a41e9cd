use crate::adapters::{csv_sink, csv_source};
use crate::core::{
    ConfigProvider, ExtractResult, OutputRecord, Pipeline, RecordErrorPolicy, RunIssue,
    SourceBatch, Storage, TransformResult,
};
use crate::domain::naming::normalize_names;
use crate::domain::pricing::{ExchangeRate, PriceTransformer, TransformOutcome};
use crate::utils::error::{EtlError, Result};

/// Reads every configured price list, reprices and renames the rows, and
/// writes one consolidated list. Output keeps file order, then row order.
pub struct PriceListPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    transformer: PriceTransformer,
}

impl<S: Storage, C: ConfigProvider> PriceListPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let transformer = PriceTransformer::new(
            config.markup_table(),
            ExchangeRate::per_hundred(config.exchange_rate()),
            config.currency(),
        );
        Self {
            storage,
            config,
            transformer,
        }
    }

    async fn read_source(&self, source: &str) -> std::result::Result<SourceBatch, RunIssue> {
        let data = match self.storage.read_file(source).await {
            Ok(data) => data,
            Err(EtlError::FileNotFound { path }) => {
                tracing::error!("❌ File not found: {}", path);
                return Err(RunIssue::MissingSource {
                    source: source.to_string(),
                });
            }
            Err(e) => {
                tracing::error!("❌ Failed to read {}: {}", source, e);
                return Err(RunIssue::UnreadableSource {
                    source: source.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        match csv_source::read_rows(&data) {
            Ok(rows) => Ok(SourceBatch {
                source: source.to_string(),
                rows,
            }),
            Err(e) => {
                tracing::error!("❌ Failed to parse CSV file {}: {}", source, e);
                Err(RunIssue::UnreadableSource {
                    source: source.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Prices one file. Returns `None` when the file is discarded under
    /// `RecordErrorPolicy::SkipFile`.
    fn transform_batch(
        &self,
        batch: &SourceBatch,
        issues: &mut Vec<RunIssue>,
    ) -> Option<Vec<OutputRecord>> {
        let mut records = Vec::with_capacity(batch.rows.len());

        for row in &batch.rows {
            match self.transformer.transform_row(row) {
                TransformOutcome::Priced(record) => records.push(record),
                TransformOutcome::DefaultMarkup {
                    record,
                    price_group,
                } => {
                    tracing::warn!(
                        "PriceGroup {} for item {} is invalid, using default markup",
                        price_group,
                        record.item_code
                    );
                    issues.push(RunIssue::DefaultMarkupApplied {
                        source: batch.source.clone(),
                        item_code: record.item_code.clone(),
                        price_group,
                    });
                    records.push(record);
                }
                TransformOutcome::ParseFailure(e) => match self.config.on_record_error() {
                    RecordErrorPolicy::SkipRecord => {
                        tracing::warn!("⚠️ {}: skipping record: {}", batch.source, e);
                        issues.push(RunIssue::RecordSkipped {
                            source: batch.source.clone(),
                            line: row.line,
                            reason: e.to_string(),
                        });
                    }
                    RecordErrorPolicy::SkipFile => {
                        tracing::error!("❌ {}: discarding file: {}", batch.source, e);
                        issues.push(RunIssue::SourceAborted {
                            source: batch.source.clone(),
                            line: row.line,
                            reason: e.to_string(),
                        });
                        return None;
                    }
                },
            }
        }

        normalize_names(&mut records);
        Some(records)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PriceListPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractResult> {
        let mut result = ExtractResult::default();

        for source in self.config.input_files() {
            tracing::debug!("Reading {}", source);
            match self.read_source(source).await {
                Ok(batch) => {
                    tracing::debug!("{}: {} rows", source, batch.rows.len());
                    result.batches.push(batch);
                }
                Err(issue) => result.issues.push(issue),
            }
        }

        Ok(result)
    }

    async fn transform(&self, data: ExtractResult) -> Result<TransformResult> {
        let ExtractResult {
            batches,
            mut issues,
        } = data;
        let mut records = Vec::new();

        for batch in &batches {
            if let Some(batch_records) = self.transform_batch(batch, &mut issues) {
                tracing::debug!("{}: {} records priced", batch.source, batch_records.len());
                records.extend(batch_records);
            }
        }

        Ok(TransformResult { records, issues })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path().to_string();
        let data = csv_sink::write_rows(&result.records)?;

        tracing::debug!(
            "Writing {} records ({} bytes) to {}",
            result.records.len(),
            data.len(),
            output_path
        );
        self.storage.write_file(&output_path, &data).await?;

        Ok(output_path)
    }
}
