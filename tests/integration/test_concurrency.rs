// 並行性の統合テスト - デッドロック・飢餓・容量上限の確認
use record_pipeline::{
    core::{Message, PipelineError, PullRequest, Record},
    engine::{spawn_buffer_stage, spawn_merge_stage, spawn_worker_pool, RecordPipeline},
    services::{DefaultPipelineConfig, DigitTagFilter},
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

fn records(count: i64) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let tag = if i % 4 == 0 { "0ab" } else { "ab0" };
            Record::new(i, i as f64, format!("r{i}"), tag)
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stress_many_records_many_workers() {
    let config = DefaultPipelineConfig::default()
        .with_worker_count(16)
        .with_buffer_capacity(10);
    let pipeline = RecordPipeline::new(Arc::new(DigitTagFilter));

    let outcome = timeout(Duration::from_secs(30), pipeline.execute(records(5000), &config))
        .await
        .expect("pipeline deadlocked")
        .unwrap();

    assert_eq!(outcome.summary.input_records, 5000);
    assert_eq!(outcome.summary.dropped, 1250);
    assert_eq!(outcome.records.len(), 3750);
    assert!(outcome.summary.buffer_high_water_mark <= 10);
    for (rank, record) in outcome.records.iter().enumerate() {
        assert_eq!(record.id, rank as i64);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_runs_are_deterministic() {
    let config = DefaultPipelineConfig::default();
    let pipeline = RecordPipeline::new(Arc::new(DigitTagFilter));

    let first = timeout(Duration::from_secs(10), pipeline.execute(records(300), &config))
        .await
        .unwrap()
        .unwrap();
    for _ in 0..5 {
        let next = timeout(Duration::from_secs(10), pipeline.execute(records(300), &config))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.records, first.records);
    }
}

#[tokio::test]
async fn test_pushes_beyond_capacity_block_until_pulled() {
    let (push_tx, push_rx) = mpsc::channel(1);
    let (pull_tx, pull_rx) = mpsc::channel::<PullRequest>(1);
    let _buffer = spawn_buffer_stage(10, push_rx, pull_rx);

    // ストア10件 + チャンネル内1件までは受け付ける
    for i in 0..11 {
        timeout(
            Duration::from_secs(1),
            push_tx.send(Message::Data(Record::new(i, 0.0, "r", "x"))),
        )
        .await
        .expect("push should not block yet")
        .unwrap();
    }

    let blocked = timeout(
        Duration::from_millis(200),
        push_tx.send(Message::Data(Record::new(11, 0.0, "r", "x"))),
    )
    .await;
    assert!(blocked.is_err());

    // 1件取り出すと押し込みが再開できる
    let (request, reply_rx) = PullRequest::new(0);
    pull_tx.send(request).await.unwrap();
    assert!(matches!(reply_rx.await.unwrap(), Message::Data(_)));

    timeout(
        Duration::from_secs(1),
        push_tx.send(Message::Data(Record::new(12, 0.0, "r", "x"))),
    )
    .await
    .expect("push should resume after a pull")
    .unwrap();
}

/// 押し込みが続いている最中でもプル要求に応答する
///
/// 満杯になってからしか応答しない実装では、最初に返るレコードは
/// 常に10件目（LIFOの先頭、id 9）になる
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pull_is_served_while_pushes_are_still_arriving() {
    let mut answered_before_full = 0;

    for _ in 0..20 {
        let (push_tx, push_rx) = mpsc::channel(1);
        let (pull_tx, pull_rx) = mpsc::channel::<PullRequest>(1);
        let buffer = spawn_buffer_stage(10, push_rx, pull_rx);

        // 最初のレコードより先にプル要求を待機させておく
        let (request, reply_rx) = PullRequest::new(0);
        pull_tx.send(request).await.unwrap();

        let pushed = Arc::new(AtomicUsize::new(0));
        let end_sent = Arc::new(AtomicBool::new(false));
        let producer = {
            let pushed = Arc::clone(&pushed);
            let end_sent = Arc::clone(&end_sent);
            tokio::spawn(async move {
                for i in 0..30 {
                    push_tx
                        .send(Message::Data(Record::new(i, 0.0, "r", "x")))
                        .await
                        .unwrap();
                    pushed.fetch_add(1, Ordering::SeqCst);
                }
                push_tx.send(Message::EndOfStream).await.unwrap();
                end_sent.store(true, Ordering::SeqCst);
            })
        };

        let first = timeout(Duration::from_secs(2), reply_rx)
            .await
            .expect("pull was never answered")
            .unwrap();
        assert!(!end_sent.load(Ordering::SeqCst));
        assert!(pushed.load(Ordering::SeqCst) < 30);

        match first {
            Message::Data(record) if record.id < 9 => answered_before_full += 1,
            Message::Data(_) => {}
            Message::EndOfStream => panic!("end-of-stream before any record"),
        }

        // 残りを排出して全タスクを終了させる
        loop {
            let (request, reply_rx) = PullRequest::new(0);
            pull_tx.send(request).await.unwrap();
            let reply = timeout(Duration::from_secs(2), reply_rx).await.unwrap().unwrap();
            if reply.is_end_of_stream() {
                break;
            }
        }
        drop(pull_tx);
        producer.await.unwrap();
        buffer.await.unwrap().unwrap();
    }

    assert!(
        answered_before_full > 0,
        "pulls were only served once the buffer was full"
    );
}

#[tokio::test]
async fn test_lifo_delivery_then_end_for_every_pull() {
    let (push_tx, push_rx) = mpsc::channel(1);
    let (pull_tx, pull_rx) = mpsc::channel::<PullRequest>(2);
    let buffer = spawn_buffer_stage(10, push_rx, pull_rx);

    for i in 1..=3 {
        push_tx.send(Message::Data(Record::new(i, 0.0, "r", "x"))).await.unwrap();
    }
    push_tx.send(Message::EndOfStream).await.unwrap();

    let mut delivered = Vec::new();
    for _ in 0..5 {
        let (request, reply_rx) = PullRequest::new(0);
        pull_tx.send(request).await.unwrap();
        delivered.push(timeout(Duration::from_secs(1), reply_rx).await.unwrap().unwrap());
    }
    drop(pull_tx);

    let ids: Vec<Option<i64>> = delivered
        .iter()
        .map(|m| match m {
            Message::Data(r) => Some(r.id),
            Message::EndOfStream => None,
        })
        .collect();
    assert_eq!(ids, vec![Some(3), Some(2), Some(1), None, None]);

    let stats = buffer.await.unwrap().unwrap();
    assert_eq!(stats.delivered, 3);
    assert_eq!(stats.end_signals_sent, 2);
}

#[tokio::test]
async fn test_merge_waits_for_every_worker_end_signal() {
    let (push_tx, push_rx) = mpsc::channel(1);
    let (pull_tx, pull_rx) = mpsc::channel(3);
    let (merge_tx, merge_rx) = mpsc::channel(3);

    let _buffer = spawn_buffer_stage(10, push_rx, pull_rx);
    let workers = spawn_worker_pool(3, Arc::new(DigitTagFilter), pull_tx, merge_tx);
    let merge = spawn_merge_stage(merge_rx, 3, 8);

    for record in records(8) {
        push_tx.send(Message::Data(record)).await.unwrap();
    }
    push_tx.send(Message::EndOfStream).await.unwrap();

    let merged = timeout(Duration::from_secs(5), merge)
        .await
        .expect("merge never finished")
        .unwrap()
        .unwrap();
    assert_eq!(merged.len(), 6);

    for worker in workers {
        worker.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_merge_reports_protocol_violation_when_worker_vanishes() {
    let (merge_tx, merge_rx) = mpsc::channel(3);
    let merge = spawn_merge_stage(merge_rx, 2, 4);

    merge_tx.send(Message::EndOfStream).await.unwrap();
    drop(merge_tx);

    let result = timeout(Duration::from_secs(1), merge).await.unwrap().unwrap();
    assert!(matches!(
        result,
        Err(PipelineError::ProtocolViolation {
            expected: 2,
            received: 1
        })
    ));
}
