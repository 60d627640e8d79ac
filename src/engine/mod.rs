// エンジン層 - 並行ステージとオーケストレーション
// バッファ / ワーカープール / マージの各ステージとそれらを束ねるエンジン

pub mod api;
pub mod buffer;
pub mod consumer;
pub mod merge;
mod pipeline;
pub mod pipeline_engine;
pub mod producer;

// 公開API - 主要エンジンクラス
pub use api::{
    create_default_pipeline_engine, create_pipeline_engine_from_config,
    create_quiet_pipeline_engine, process_file_with_engine, process_records_with_engine,
    DefaultPipelineEngine,
};
pub use buffer::{spawn_buffer_stage, BoundedStore, BufferStats};
pub use consumer::{spawn_worker, spawn_worker_pool, WorkerStats};
pub use merge::{spawn_merge_stage, MergeBuffer};
pub use pipeline::RecordPipeline;
pub use pipeline_engine::PipelineEngine;
pub use producer::spawn_producer;
