// Adapters layer: tabular file formats at the edges of the pipeline.

pub mod csv_sink;
pub mod csv_source;
