// パイプラインを流れるデータ型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// パイプラインを流れるレコード
///
/// `id` はマージステージで最終順位（0始まり）に上書きされる。
/// `tag` はコアにとって不透明な文字列で、フィルタ判定にのみ使われる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub amount: f64,
    pub name: String,
    pub tag: String,
}

impl Record {
    pub fn new(id: i64, amount: f64, name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id,
            amount,
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// タグの先頭文字が10進数字かどうか
    pub fn tag_starts_with_digit(&self) -> bool {
        self.tag.chars().next().is_some_and(|c| c.is_ascii_digit())
    }
}

/// ステージ間チャンネルで送受信されるメッセージ
///
/// 終了シグナルはデータと同じチャンネルを流れるが、型で区別される
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Data(Record),
    EndOfStream,
}

impl Message {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Message::EndOfStream)
    }
}

/// ワーカーからバッファステージへのプル要求（クレジット）
///
/// 応答は `reply` 経由で要求元ワーカーにだけ届く
#[derive(Debug)]
pub struct PullRequest {
    pub worker_id: usize,
    pub reply: oneshot::Sender<Message>,
}

impl PullRequest {
    pub fn new(worker_id: usize) -> (Self, oneshot::Receiver<Message>) {
        let (reply, reply_rx) = oneshot::channel();
        (Self { worker_id, reply }, reply_rx)
    }
}

/// 入力ファイルでスキップされた行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: String,
}

/// パイプライン実行全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub started_at: DateTime<Utc>,
    pub input_records: usize,
    pub survivors: usize,
    pub dropped: usize,
    pub skipped_lines: usize,
    pub worker_count: usize,
    pub buffer_high_water_mark: usize,
    pub total_processing_time_ms: u64,
}

/// パイプライン実行結果（マージ済みレコード + サマリー）
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub records: Vec<Record>,
    pub summary: PipelineSummary,
}
