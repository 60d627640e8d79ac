// Merge - 順序付きマージステージ
// 全ワーカーからの生存レコードを到着順に挿入ソートし、順位でIDを振り直す

use crate::core::{Message, PipelineError, PipelineResult, Record};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug)]
struct MergeEntry {
    /// 取り込み時のID（並び替えキー）
    key: i64,
    record: Record,
}

/// 挿入ソートによる結果バッファ
///
/// 各エントリは取り込み時のIDをキーとして保持し、`record.id` は常に
/// 現在の順位（0始まり）を表す。到着順序に関係なく最終的な並びはキー昇順になる。
#[derive(Debug, Default)]
pub struct MergeBuffer {
    entries: Vec<MergeEntry>,
}

impl MergeBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// レコードを挿入し、移動した要素と挿入した要素の順位を更新
    pub fn insert(&mut self, mut record: Record) {
        let key = record.id;
        let mut position = self.entries.len();

        // キーが大きい要素を右へずらしながら挿入位置を探す
        while position > 0 && self.entries[position - 1].key > key {
            position -= 1;
        }

        record.id = position as i64;
        self.entries.insert(position, MergeEntry { key, record });

        for (rank, entry) in self.entries.iter_mut().enumerate().skip(position + 1) {
            entry.record.id = rank as i64;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 現在の順位付きレコード列を参照
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.entries.into_iter().map(|entry| entry.record).collect()
    }
}

/// Merge: マージステージを起動
///
/// `expected_end_signals` 個の終了シグナルを受け取った時点で結果を一度だけ返す
pub fn spawn_merge_stage(
    inbound_rx: mpsc::Receiver<Message>,
    expected_end_signals: usize,
    capacity_hint: usize,
) -> tokio::task::JoinHandle<PipelineResult<Vec<Record>>> {
    tokio::spawn(run_merge_stage(
        inbound_rx,
        expected_end_signals,
        capacity_hint,
    ))
}

async fn run_merge_stage(
    mut inbound_rx: mpsc::Receiver<Message>,
    expected_end_signals: usize,
    capacity_hint: usize,
) -> PipelineResult<Vec<Record>> {
    let mut merged = MergeBuffer::with_capacity(capacity_hint);
    let mut end_signals = 0;

    while end_signals < expected_end_signals {
        match inbound_rx.recv().await {
            Some(Message::Data(record)) => {
                debug!(id = record.id, "merge received record");
                merged.insert(record);
            }
            Some(Message::EndOfStream) => {
                end_signals += 1;
                debug!(end_signals, expected_end_signals, "merge received end-of-stream");
            }
            None => {
                return Err(PipelineError::protocol_violation(
                    expected_end_signals,
                    end_signals,
                ));
            }
        }
    }

    info!(survivors = merged.len(), "merge stage finished");
    Ok(merged.into_records())
}
