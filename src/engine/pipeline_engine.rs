// PipelineEngine - 依存性注入によるレコードパイプラインエンジン
// 入力読み込みからパイプライン実行、レポート書き出しまでを束ねる

use super::pipeline::RecordPipeline;
use crate::{
    core::{
        PipelineConfig, PipelineOutcome, PipelineResult, ProgressReporter, Record, RecordFilter,
        TagGenerator,
    },
    services::{RecordReader, TabularReportWriter},
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 依存性注入によるレコードパイプラインエンジン
///
/// タグ生成器・フィルタ・設定・レポーターをコンストラクタで受け取り、
/// ステージ間で共有するものはArcで保持する。
pub struct PipelineEngine<G, F, C, R> {
    tag_generator: Arc<G>,
    filter: Arc<F>,
    config: Arc<C>,
    reporter: Arc<R>,
    writer: TabularReportWriter,
}

impl<G, F, C, R> PipelineEngine<G, F, C, R>
where
    G: TagGenerator + 'static,
    F: RecordFilter + 'static,
    C: PipelineConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(tag_generator: G, filter: F, config: C, reporter: R) -> Self {
        Self {
            tag_generator: Arc::new(tag_generator),
            filter: Arc::new(filter),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            writer: TabularReportWriter::new(),
        }
    }

    /// レポートの書式を差し替える
    pub fn with_writer(mut self, writer: TabularReportWriter) -> Self {
        self.writer = writer;
        self
    }

    /// 読み込み済みのレコード列をパイプラインに流す
    pub async fn process_records(&self, records: Vec<Record>) -> PipelineResult<PipelineOutcome> {
        self.run_pipeline(records, 0).await
    }

    /// 入力ファイルを読み込み、処理結果をレポートファイルへ書き出す
    ///
    /// 入力を開けない場合はパイプラインを起動せずに失敗する。
    /// 書き出しの失敗はパイプライン完了後に報告される。
    pub async fn process_file(&self, input: &Path, output: &Path) -> PipelineResult<PipelineOutcome> {
        let reader = RecordReader::new(Arc::clone(&self.tag_generator));
        let read = reader.read_path(input).await?;

        for skipped in &read.skipped {
            self.reporter
                .report_skipped_line(skipped.line_number, &skipped.reason)
                .await;
        }

        let outcome = self.run_pipeline(read.records, read.skipped.len()).await?;

        self.writer.write_to(output, &outcome.records).await?;
        info!(path = %output.display(), rows = outcome.records.len(), "report written");
        self.reporter.report_written(output).await;

        Ok(outcome)
    }

    async fn run_pipeline(
        &self,
        records: Vec<Record>,
        skipped_lines: usize,
    ) -> PipelineResult<PipelineOutcome> {
        self.reporter.report_started(records.len()).await;

        let pipeline = RecordPipeline::new(Arc::clone(&self.filter));
        let mut outcome = pipeline.execute(records, self.config.as_ref()).await?;
        outcome.summary.skipped_lines = skipped_lines;

        self.reporter.report_completed(&outcome.summary).await;
        Ok(outcome)
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}
