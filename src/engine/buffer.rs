// Buffer - 有界バッファステージ
// ドライバーからのプッシュとワーカーからのプル要求を単一タスクで多重化

use crate::core::{Message, PipelineError, PipelineResult, PullRequest, Record};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 固定容量のLIFOストア
///
/// プルは常に「最後にプッシュされたレコード」を返す。入力順（FIFO）は保証しない。
#[derive(Debug)]
pub struct BoundedStore {
    records: Vec<Record>,
    capacity: usize,
    high_water_mark: usize,
}

impl BoundedStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
            high_water_mark: 0,
        }
    }

    /// レコードを積む。満杯の場合はレコードをそのまま返す
    pub fn push(&mut self, record: Record) -> Result<(), Record> {
        if self.is_full() {
            return Err(record);
        }
        self.records.push(record);
        self.high_water_mark = self.high_water_mark.max(self.records.len());
        Ok(())
    }

    /// 最も新しく積まれたレコードを取り出す
    pub fn pop_latest(&mut self) -> Option<Record> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// これまでに同時保持した最大件数
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }
}

/// バッファステージの実行統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferStats {
    pub accepted: usize,
    pub delivered: usize,
    pub end_signals_sent: usize,
    pub high_water_mark: usize,
}

enum BufferEvent {
    Push(Option<Message>),
    Pull(Option<PullRequest>),
}

/// Buffer: 有界バッファステージを起動
///
/// 全ワーカーがプル要求チャンネルを手放すまで終了シグナルを返し続ける
pub fn spawn_buffer_stage(
    capacity: usize,
    push_rx: mpsc::Receiver<Message>,
    pull_rx: mpsc::Receiver<PullRequest>,
) -> tokio::task::JoinHandle<PipelineResult<BufferStats>> {
    tokio::spawn(run_buffer_stage(capacity, push_rx, pull_rx))
}

async fn run_buffer_stage(
    capacity: usize,
    push_rx: mpsc::Receiver<Message>,
    mut pull_rx: mpsc::Receiver<PullRequest>,
) -> PipelineResult<BufferStats> {
    if capacity == 0 {
        return Err(PipelineError::configuration(
            "バッファ容量は1以上である必要があります",
        ));
    }

    let mut store = BoundedStore::new(capacity);
    // None = 入力終了（終了シグナル受信済み）
    let mut push_rx = Some(push_rx);
    let mut stats = BufferStats::default();

    loop {
        let event = match push_rx.as_mut() {
            // 空かつ入力継続中: プッシュのみ受け付ける。プル要求はチャンネル内で待機
            Some(rx) if store.is_empty() => BufferEvent::Push(rx.recv().await),
            // 中間状態: プッシュとプルの両方を待つ（優先順位なし）
            Some(rx) if !store.is_full() => {
                tokio::select! {
                    pushed = rx.recv() => BufferEvent::Push(pushed),
                    pulled = pull_rx.recv() => BufferEvent::Pull(pulled),
                }
            }
            // 満杯、または入力終了: プル要求のみ
            _ => BufferEvent::Pull(pull_rx.recv().await),
        };

        match event {
            BufferEvent::Push(Some(Message::Data(record))) => {
                let id = record.id;
                store.push(record).map_err(|_| {
                    PipelineError::internal(anyhow::anyhow!(
                        "満杯のバッファにプッシュされました (id: {id})"
                    ))
                })?;
                stats.accepted += 1;
                debug!(id, pending = store.len(), "buffer accepted record");
            }
            BufferEvent::Push(Some(Message::EndOfStream)) => {
                // 受信側を破棄して以降のプッシュを拒否する
                push_rx = None;
                debug!(pending = store.len(), "buffer input closed");
            }
            BufferEvent::Push(None) => {
                warn!("push channel closed without end-of-stream; treating input as exhausted");
                push_rx = None;
            }
            BufferEvent::Pull(Some(request)) => {
                let worker_id = request.worker_id;
                // ここに来るのは非空か入力終了のどちらか。空なら終了シグナルを返す
                let reply = match store.pop_latest() {
                    Some(record) => Message::Data(record),
                    None => Message::EndOfStream,
                };
                let is_end = reply.is_end_of_stream();

                match request.reply.send(reply) {
                    Ok(()) if is_end => {
                        stats.end_signals_sent += 1;
                        debug!(worker_id, "buffer answered with end-of-stream");
                    }
                    Ok(()) => stats.delivered += 1,
                    Err(Message::Data(record)) => {
                        // 要求元が消えた場合はレコードを戻す
                        warn!(worker_id, id = record.id, "requester vanished; record returned to buffer");
                        store.push(record).map_err(|_| {
                            PipelineError::internal(anyhow::anyhow!(
                                "返却レコードを格納できません"
                            ))
                        })?;
                    }
                    Err(Message::EndOfStream) => {
                        debug!(worker_id, "requester vanished before end-of-stream")
                    }
                }
            }
            BufferEvent::Pull(None) => break,
        }
    }

    stats.high_water_mark = store.high_water_mark();

    if !store.is_empty() {
        return Err(PipelineError::channel(
            "buffer",
            format!(
                "{} 件のレコードが未配信のまま全ワーカーが切断されました",
                store.len()
            ),
        ));
    }

    info!(
        accepted = stats.accepted,
        delivered = stats.delivered,
        end_signals = stats.end_signals_sent,
        high_water_mark = stats.high_water_mark,
        "buffer stage finished"
    );
    Ok(stats)
}
