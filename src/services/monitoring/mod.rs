// 進捗監視機能
// パイプライン開始、入力行のスキップ、完了、レポート出力の通知

pub mod implementations;

// 公開API
pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
