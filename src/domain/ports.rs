use crate::domain::model::{ExtractResult, TransformResult};
use crate::domain::pricing::MarkupTable;
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// What happens to a file when one of its rows cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorPolicy {
    /// Report the row and keep the rest of the file
    #[default]
    SkipRecord,
    /// Report the row and discard every record of that file
    SkipFile,
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    /// Target currency units per 100 source units
    fn exchange_rate(&self) -> Decimal;
    fn currency(&self) -> &str;
    fn on_record_error(&self) -> RecordErrorPolicy;
    fn markup_table(&self) -> MarkupTable {
        MarkupTable::standard()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
