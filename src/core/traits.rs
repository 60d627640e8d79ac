// パイプラインのトレイト定義
// ステージ間の継ぎ目となる抽象化インターフェースを定義

use super::types::{PipelineSummary, Record};
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

/// パイプライン設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// フィルタワーカー数（マージステージの終了シグナル数でもある）
    fn worker_count(&self) -> usize;

    /// バッファステージが保持できる最大レコード数
    fn buffer_capacity(&self) -> usize;

    /// マージ結果バッファの初期確保サイズ
    fn merge_capacity_hint(&self) -> usize;

    /// 生成するタグの長さ
    fn tag_length(&self) -> usize;

    /// タグ生成に使う文字集合
    fn tag_alphabet(&self) -> String;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// PipelineConfig for Box<dyn PipelineConfig>
impl PipelineConfig for Box<dyn PipelineConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn buffer_capacity(&self) -> usize {
        self.as_ref().buffer_capacity()
    }

    fn merge_capacity_hint(&self) -> usize {
        self.as_ref().merge_capacity_hint()
    }

    fn tag_length(&self) -> usize {
        self.as_ref().tag_length()
    }

    fn tag_alphabet(&self) -> String {
        self.as_ref().tag_alphabet()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// パイプライン開始時の報告
    async fn report_started(&self, total_records: usize);

    /// 入力行をスキップした時の報告
    async fn report_skipped_line(&self, line_number: usize, reason: &str);

    /// パイプライン完了時の報告
    async fn report_completed(&self, summary: &PipelineSummary);

    /// レポート書き出し完了時の報告
    async fn report_written(&self, path: &Path);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, total_records: usize) {
        self.as_ref().report_started(total_records).await
    }

    async fn report_skipped_line(&self, line_number: usize, reason: &str) {
        self.as_ref().report_skipped_line(line_number, reason).await
    }

    async fn report_completed(&self, summary: &PipelineSummary) {
        self.as_ref().report_completed(summary).await
    }

    async fn report_written(&self, path: &Path) {
        self.as_ref().report_written(path).await
    }
}

/// ワーカーが適用するフィルタ述語
#[automock]
pub trait RecordFilter: Send + Sync {
    /// レコードを下流へ通すなら true
    fn accepts(&self, record: &Record) -> bool;
}

/// レコードごとのタグ生成器（コア外部の協力者）
#[automock]
pub trait TagGenerator: Send + Sync {
    fn generate(&self) -> String;
}
