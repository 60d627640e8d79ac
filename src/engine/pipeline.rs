// Pipeline - バッファ / ワーカープール / マージの3ステージ構成
// チャンネル配線とタスク起動、終了待ち合わせを担当

use super::{
    buffer::spawn_buffer_stage, consumer::spawn_worker_pool, merge::spawn_merge_stage,
    producer::spawn_producer,
};
use crate::core::{
    Message, PipelineConfig, PipelineError, PipelineOutcome, PipelineResult, PipelineSummary,
    PullRequest, Record, RecordFilter,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::info;

/// 3ステージのレコードパイプライン
pub struct RecordPipeline<F: ?Sized> {
    filter: Arc<F>,
}

impl<F> RecordPipeline<F>
where
    F: RecordFilter + ?Sized + 'static,
{
    pub fn new(filter: Arc<F>) -> Self {
        Self { filter }
    }

    /// レコード列をパイプラインに流し、マージ済みの結果を返す
    pub async fn execute<C>(&self, records: Vec<Record>, config: &C) -> PipelineResult<PipelineOutcome>
    where
        C: PipelineConfig + ?Sized,
    {
        let worker_count = config.worker_count();
        let buffer_capacity = config.buffer_capacity();
        if worker_count == 0 {
            return Err(PipelineError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }
        if buffer_capacity == 0 {
            return Err(PipelineError::configuration(
                "バッファ容量は1以上である必要があります",
            ));
        }

        let started_at = Utc::now();
        let start_time = Instant::now();

        // プッシュは1スロットのみ。レコードを溜めるのはバッファステージのストアだけ
        let (push_tx, push_rx) = mpsc::channel::<Message>(1);
        let (pull_tx, pull_rx) = mpsc::channel::<PullRequest>(worker_count);
        let (merge_tx, merge_rx) = mpsc::channel::<Message>(worker_count);

        let buffer_handle = spawn_buffer_stage(buffer_capacity, push_rx, pull_rx);
        // 送信側はプール内のワーカーだけが保持する
        let worker_handles =
            spawn_worker_pool(worker_count, Arc::clone(&self.filter), pull_tx, merge_tx);
        let merge_handle = spawn_merge_stage(merge_rx, worker_count, config.merge_capacity_hint());
        let producer_handle = spawn_producer(records, push_tx);

        // マージ結果を待機
        let merged = merge_handle.await?;

        let sent = producer_handle.await?;
        let mut worker_results = Vec::with_capacity(worker_count);
        for handle in worker_handles {
            worker_results.push(handle.await?);
        }
        let buffer_stats = buffer_handle.await?;

        // 上流の失敗を優先して報告する
        let buffer_stats = buffer_stats?;
        let input_records = sent?;
        let mut dropped = 0;
        for result in worker_results {
            dropped += result?.dropped;
        }
        let records = merged?;

        let summary = PipelineSummary {
            started_at,
            input_records,
            survivors: records.len(),
            dropped,
            skipped_lines: 0,
            worker_count,
            buffer_high_water_mark: buffer_stats.high_water_mark,
            total_processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            input = summary.input_records,
            survivors = summary.survivors,
            dropped = summary.dropped,
            "pipeline finished"
        );

        Ok(PipelineOutcome { records, summary })
    }
}
