// Consumer - フィルタワーカープール
// 各ワーカーはバッファへのプル要求で1件ずつ受け取り、生存レコードをマージへ送る

use crate::core::{Message, PipelineError, PipelineResult, PullRequest, RecordFilter};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// ワーカー単位の実行統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub worker_id: usize,
    pub received: usize,
    pub forwarded: usize,
    pub dropped: usize,
}

/// 単一フィルタワーカー
pub fn spawn_worker<F>(
    worker_id: usize,
    filter: Arc<F>,
    pull_tx: mpsc::Sender<PullRequest>,
    merge_tx: mpsc::Sender<Message>,
) -> tokio::task::JoinHandle<PipelineResult<WorkerStats>>
where
    F: RecordFilter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let mut stats = WorkerStats {
            worker_id,
            ..WorkerStats::default()
        };

        loop {
            // プル要求を送り、自分宛ての応答を待つ
            let (request, reply_rx) = PullRequest::new(worker_id);
            pull_tx.send(request).await.map_err(|_| {
                PipelineError::channel(
                    format!("worker-{worker_id}"),
                    "プル要求チャンネルが閉じられました",
                )
            })?;

            let received = reply_rx.await.map_err(|_| {
                PipelineError::channel(
                    format!("worker-{worker_id}"),
                    "バッファが応答せずに終了しました",
                )
            })?;

            let record = match received {
                Message::Data(record) => record,
                Message::EndOfStream => break,
            };
            stats.received += 1;

            if filter.accepts(&record) {
                trace!(worker_id, id = record.id, "worker forwarding record");
                merge_tx.send(Message::Data(record)).await.map_err(|_| {
                    PipelineError::channel(
                        format!("worker-{worker_id}"),
                        "マージチャンネルが閉じられました",
                    )
                })?;
                stats.forwarded += 1;
            } else {
                trace!(worker_id, id = record.id, tag = %record.tag, "worker dropped record");
                stats.dropped += 1;
            }
        }

        // プル要求の送信側を先に手放し、バッファが終了できるようにする
        drop(pull_tx);

        merge_tx.send(Message::EndOfStream).await.map_err(|_| {
            PipelineError::channel(
                format!("worker-{worker_id}"),
                "終了シグナルを送信できません",
            )
        })?;

        debug!(
            worker_id,
            received = stats.received,
            forwarded = stats.forwarded,
            dropped = stats.dropped,
            "worker finished"
        );
        Ok(stats)
    })
}

/// Consumers: フィルタワーカープール
pub fn spawn_worker_pool<F>(
    worker_count: usize,
    filter: Arc<F>,
    pull_tx: mpsc::Sender<PullRequest>,
    merge_tx: mpsc::Sender<Message>,
) -> Vec<tokio::task::JoinHandle<PipelineResult<WorkerStats>>>
where
    F: RecordFilter + ?Sized + 'static,
{
    (0..worker_count)
        .map(|worker_id| {
            spawn_worker(
                worker_id,
                Arc::clone(&filter),
                pull_tx.clone(),
                merge_tx.clone(),
            )
        })
        .collect()
}
