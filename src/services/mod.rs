// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、パイプラインコアとは疎結合で設計されている

pub mod config;
pub mod filter;
pub mod input;
pub mod monitoring;
pub mod report;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::DefaultPipelineConfig;
pub use filter::DigitTagFilter;
pub use input::{RandomTagGenerator, ReadOutcome, RecordReader};
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
pub use report::TabularReportWriter;
