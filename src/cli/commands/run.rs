use crate::core::{PipelineError, PipelineSummary};
use crate::engine::{create_pipeline_engine_from_config, process_file_with_engine};
use crate::services::DefaultPipelineConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// run コマンドの引数一式
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config_file: Option<PathBuf>,
    pub quiet: bool,
}

/// 設定を解決する。ファイル指定がなければデフォルト値
fn resolve_pipeline_config(config_file: Option<&Path>, quiet: bool) -> Result<DefaultPipelineConfig> {
    let config = match config_file {
        Some(path) => DefaultPipelineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => DefaultPipelineConfig::default(),
    };

    Ok(if quiet {
        config.with_progress_reporting(false)
    } else {
        config
    })
}

/// 入力ファイルを処理してレポートを書き出す
pub async fn execute_run(config: RunConfig) -> Result<PipelineSummary> {
    let pipeline_config = resolve_pipeline_config(config.config_file.as_deref(), config.quiet)?;
    let engine = create_pipeline_engine_from_config(pipeline_config)?;

    let outcome = process_file_with_engine(&config.input, &config.output, &engine)
        .await
        .with_context(|| format!("Failed to process {}", config.input.display()))?;

    Ok(outcome.summary)
}

/// 致命的エラーを表示用に整形する
///
/// パイプラインのエラーであれば重要度と操作・対象・対処を付け加える
pub fn describe_error(error: &anyhow::Error) -> String {
    let mut message = format!("{error:#}");

    if let Some(pipeline_error) = error.downcast_ref::<PipelineError>() {
        let context = pipeline_error.context();
        message.push_str(&format!(
            "\n   - 重要度: {}\n   - 操作: {}",
            pipeline_error.severity().as_str(),
            context.operation
        ));
        if let Some(resource) = context.resource {
            message.push_str(&format!("\n   - 対象: {resource}"));
        }
        if let Some(suggestion) = context.suggestion {
            message.push_str(&format!("\n   - 対処: {suggestion}"));
        }
    }

    message
}
