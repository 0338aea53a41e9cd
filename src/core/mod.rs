pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{
    ExtractResult, OutputRecord, RunIssue, RunSummary, SourceBatch, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RecordErrorPolicy, Storage};
pub use crate::utils::error::Result;
