// 高レベル公開API
// PipelineEngineを簡単に使用できるようにするための便利な関数

use super::PipelineEngine;
use crate::{
    core::{
        PipelineConfig, PipelineOutcome, PipelineResult, ProgressReporter, Record, RecordFilter,
        TagGenerator,
    },
    services::{
        ConsoleProgressReporter, DefaultPipelineConfig, DigitTagFilter, NoOpProgressReporter,
        RandomTagGenerator,
    },
};
use std::path::Path;

/// 標準構成のエンジン型
pub type DefaultPipelineEngine<R> =
    PipelineEngine<RandomTagGenerator, DigitTagFilter, DefaultPipelineConfig, R>;

/// 設定済みPipelineEngineでファイルを処理
pub async fn process_file_with_engine<G, F, C, R>(
    input: &Path,
    output: &Path,
    engine: &PipelineEngine<G, F, C, R>,
) -> PipelineResult<PipelineOutcome>
where
    G: TagGenerator + 'static,
    F: RecordFilter + 'static,
    C: PipelineConfig,
    R: ProgressReporter + 'static,
{
    engine.process_file(input, output).await
}

/// 設定済みPipelineEngineでレコード列を処理
pub async fn process_records_with_engine<G, F, C, R>(
    records: Vec<Record>,
    engine: &PipelineEngine<G, F, C, R>,
) -> PipelineResult<PipelineOutcome>
where
    G: TagGenerator + 'static,
    F: RecordFilter + 'static,
    C: PipelineConfig,
    R: ProgressReporter + 'static,
{
    engine.process_records(records).await
}

/// 任意の設定からエンジンを作成
///
/// タグ生成器は設定の文字集合と長さから構築する。
/// `enable_progress_reporting` が偽ならコンソール出力を抑制する。
pub fn create_pipeline_engine_from_config(
    config: DefaultPipelineConfig,
) -> PipelineResult<DefaultPipelineEngine<ConsoleProgressReporter>> {
    config.validate()?;
    let tag_generator = RandomTagGenerator::new(&config.tag_alphabet(), config.tag_length())?;
    let reporter = if config.enable_progress_reporting() {
        ConsoleProgressReporter::new()
    } else {
        ConsoleProgressReporter::quiet()
    };

    Ok(PipelineEngine::new(
        tag_generator,
        DigitTagFilter,
        config,
        reporter,
    ))
}

/// デフォルト設定でのエンジン作成
pub fn create_default_pipeline_engine(
) -> PipelineResult<DefaultPipelineEngine<ConsoleProgressReporter>> {
    create_pipeline_engine_from_config(DefaultPipelineConfig::default())
}

/// 静音エンジン作成（テスト・ベンチマーク用）
pub fn create_quiet_pipeline_engine() -> PipelineResult<DefaultPipelineEngine<NoOpProgressReporter>> {
    let config = DefaultPipelineConfig::default().with_progress_reporting(false);
    let tag_generator = RandomTagGenerator::new(&config.tag_alphabet(), config.tag_length())?;

    Ok(PipelineEngine::new(
        tag_generator,
        DigitTagFilter,
        config,
        NoOpProgressReporter::new(),
    ))
}
