// Producer - ドライバーからバッファステージへのレコード配信

use crate::core::{Message, PipelineError, PipelineResult, Record};
use tokio::sync::mpsc;
use tracing::debug;

/// Producer: 全レコードを送信し、最後に終了シグナルを1つ送る
///
/// バッファが満杯の間は送信がブロックされる
pub fn spawn_producer(
    records: Vec<Record>,
    push_tx: mpsc::Sender<Message>,
) -> tokio::task::JoinHandle<PipelineResult<usize>> {
    tokio::spawn(async move {
        let mut sent = 0;
        for record in records {
            push_tx.send(Message::Data(record)).await.map_err(|_| {
                PipelineError::channel("producer", "バッファステージが入力を受け付けません")
            })?;
            sent += 1;
        }

        push_tx.send(Message::EndOfStream).await.map_err(|_| {
            PipelineError::channel("producer", "終了シグナルを送信できません")
        })?;

        debug!(sent, "producer finished");
        Ok(sent)
    })
}
