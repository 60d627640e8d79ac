// record_pipeline - 有界バッファ / フィルタワーカープール / 順序付きマージによる
// 3ステージ並行レコード処理パイプライン

pub mod cli;
pub mod core;
pub mod engine;
pub mod services;

// よく使う型を再エクスポート
pub use crate::core::{
    Message, PipelineError, PipelineOutcome, PipelineResult, PipelineSummary, Record,
};
pub use crate::engine::{
    create_default_pipeline_engine, create_quiet_pipeline_engine, PipelineEngine, RecordPipeline,
};
