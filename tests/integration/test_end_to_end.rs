// エンドツーエンドテスト - 入力ファイルからレポート出力まで
use record_pipeline::{
    engine::PipelineEngine,
    services::{DefaultPipelineConfig, DigitTagFilter, NoOpProgressReporter},
    Record,
};
use tempfile::TempDir;
use tokio::time::{timeout, Duration};

#[path = "../fixtures/mod.rs"]
mod fixtures;
use fixtures::{generate_lines, report_rows, write_input, SequenceTagGenerator};

fn engine_with_tags(
    tags: &[&str],
    config: DefaultPipelineConfig,
) -> PipelineEngine<SequenceTagGenerator, DigitTagFilter, DefaultPipelineConfig, NoOpProgressReporter>
{
    PipelineEngine::new(
        SequenceTagGenerator::new(tags),
        DigitTagFilter,
        config,
        NoOpProgressReporter::new(),
    )
}

#[tokio::test]
async fn test_three_record_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "Employees.txt", "1,100,A\n2,200,B\n3,50,C\n");
    let output = temp_dir.path().join("Results.txt");

    let engine = engine_with_tags(&["8xx", "x88", "y99"], DefaultPipelineConfig::default());
    let outcome = timeout(Duration::from_secs(10), engine.process_file(&input, &output))
        .await
        .expect("pipeline timed out")
        .unwrap();

    assert_eq!(
        outcome.records,
        vec![
            Record::new(0, 200.0, "B", "x88"),
            Record::new(1, 50.0, "C", "y99"),
        ]
    );

    let report = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        report,
        "ID  Salary  Name  Hash\n0   200.00  B     x88\n1   50.00   C     y99\n"
    );
}

#[tokio::test]
async fn test_empty_input_produces_header_only_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "Employees.txt", "");
    let output = temp_dir.path().join("Results.txt");

    let engine = engine_with_tags(&["abc"], DefaultPipelineConfig::default());
    let outcome = engine.process_file(&input, &output).await.unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.summary.input_records, 0);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "ID  Salary  Name  Hash\n"
    );
}

#[tokio::test]
async fn test_large_input_is_ranked_in_ingest_order() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "Employees.txt", &generate_lines(200));
    let output = temp_dir.path().join("Results.txt");

    // 3件に1件が数字始まりのタグで除外される
    let engine = engine_with_tags(&["a1", "b2", "3c"], DefaultPipelineConfig::default());
    let outcome = timeout(Duration::from_secs(10), engine.process_file(&input, &output))
        .await
        .expect("pipeline timed out")
        .unwrap();

    let expected_survivors = (0..200).filter(|i| i % 3 != 2).count();
    assert_eq!(outcome.summary.input_records, 200);
    assert_eq!(outcome.summary.survivors, expected_survivors);
    assert_eq!(outcome.summary.dropped, 200 - expected_survivors);

    let rows = report_rows(&std::fs::read_to_string(&output).unwrap());
    assert_eq!(rows.len(), expected_survivors);

    let mut previous_employee = None;
    for (rank, row) in rows.iter().enumerate() {
        assert_eq!(row[0], rank.to_string());
        assert!(!row[3].starts_with(|c: char| c.is_ascii_digit()));

        let employee: usize = row[2].trim_start_matches("employee").parse().unwrap();
        if let Some(previous) = previous_employee {
            assert!(employee > previous);
        }
        previous_employee = Some(employee);
    }
}

#[tokio::test]
async fn test_small_configuration_still_completes() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), "Employees.txt", &generate_lines(50));
    let output = temp_dir.path().join("Results.txt");

    let config = DefaultPipelineConfig::default()
        .with_worker_count(1)
        .with_buffer_capacity(1);
    let engine = engine_with_tags(&["z"], config);

    let outcome = timeout(Duration::from_secs(10), engine.process_file(&input, &output))
        .await
        .expect("pipeline timed out")
        .unwrap();

    assert_eq!(outcome.summary.survivors, 50);
    assert_eq!(outcome.summary.buffer_high_water_mark, 1);
    assert_eq!(outcome.summary.worker_count, 1);
}

#[tokio::test]
async fn test_names_are_kept_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        temp_dir.path(),
        "Employees.txt",
        " 7 , 12.5 ,Ada Lovelace\r\n8,3,Grace\n",
    );
    let output = temp_dir.path().join("Results.txt");

    let engine = engine_with_tags(&["q"], DefaultPipelineConfig::default());
    let outcome = engine.process_file(&input, &output).await.unwrap();

    assert_eq!(
        outcome.records,
        vec![
            Record::new(0, 12.5, "Ada Lovelace", "q"),
            Record::new(1, 3.0, "Grace", "q"),
        ]
    );
}
