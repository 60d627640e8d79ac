// 設定管理の具象実装

use crate::core::{PipelineConfig, PipelineError, PipelineResult};
use std::path::Path;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultPipelineConfig {
    worker_count: usize,
    buffer_capacity: usize,
    merge_capacity_hint: usize,
    tag_length: usize,
    tag_alphabet: String,
    enable_progress: bool,
}

impl DefaultPipelineConfig {
    pub const DEFAULT_WORKER_COUNT: usize = 5;
    pub const DEFAULT_BUFFER_CAPACITY: usize = 10;
    pub const DEFAULT_MERGE_CAPACITY: usize = 25;
    pub const DEFAULT_TAG_LENGTH: usize = 30;
    pub const DEFAULT_TAG_ALPHABET: &'static str = "896";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    pub fn with_merge_capacity_hint(mut self, merge_capacity_hint: usize) -> Self {
        self.merge_capacity_hint = merge_capacity_hint;
        self
    }

    pub fn with_tag_length(mut self, tag_length: usize) -> Self {
        self.tag_length = tag_length;
        self
    }

    pub fn with_tag_alphabet(mut self, tag_alphabet: impl Into<String>) -> Self {
        self.tag_alphabet = tag_alphabet.into();
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// JSONパラメータから設定を構築（未指定のキーはデフォルト値）
    pub fn from_json(parameters: &serde_json::Value) -> PipelineResult<Self> {
        if !parameters.is_object() {
            return Err(PipelineError::configuration(
                "設定はJSONオブジェクトである必要があります",
            ));
        }

        let usize_param = |key: &str, default: usize| -> PipelineResult<usize> {
            match parameters.get(key) {
                None => Ok(default),
                Some(value) => value.as_u64().map(|v| v as usize).ok_or_else(|| {
                    PipelineError::configuration(format!("{key} は0以上の整数である必要があります"))
                }),
            }
        };

        let defaults = Self::default();
        let tag_alphabet = match parameters.get("tag_alphabet") {
            None => defaults.tag_alphabet.clone(),
            Some(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| PipelineError::configuration("tag_alphabet は文字列である必要があります"))?,
        };
        let enable_progress = match parameters.get("enable_progress") {
            None => defaults.enable_progress,
            Some(value) => value.as_bool().ok_or_else(|| {
                PipelineError::configuration("enable_progress は真偽値である必要があります")
            })?,
        };

        let config = Self {
            worker_count: usize_param("worker_count", defaults.worker_count)?,
            buffer_capacity: usize_param("buffer_capacity", defaults.buffer_capacity)?,
            merge_capacity_hint: usize_param("merge_capacity_hint", defaults.merge_capacity_hint)?,
            tag_length: usize_param("tag_length", defaults.tag_length)?,
            tag_alphabet,
            enable_progress,
        };
        config.validate()?;
        Ok(config)
    }

    /// JSONファイルから設定を読み込む
    pub fn load_from_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::configuration(format!(
                "設定ファイルを読み込めません: {} ({e})",
                path.display()
            ))
        })?;
        let parameters: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            PipelineError::configuration(format!(
                "設定ファイルを解析できません: {} ({e})",
                path.display()
            ))
        })?;
        Self::from_json(&parameters)
    }

    /// 設定値の検証
    pub fn validate(&self) -> PipelineResult<()> {
        if self.worker_count == 0 {
            return Err(PipelineError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }
        if self.buffer_capacity == 0 {
            return Err(PipelineError::configuration(
                "バッファ容量は1以上である必要があります",
            ));
        }
        if self.tag_alphabet.is_empty() {
            return Err(PipelineError::configuration(
                "タグ文字集合は空にできません",
            ));
        }
        Ok(())
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: Self::DEFAULT_WORKER_COUNT,
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            merge_capacity_hint: Self::DEFAULT_MERGE_CAPACITY,
            tag_length: Self::DEFAULT_TAG_LENGTH,
            tag_alphabet: Self::DEFAULT_TAG_ALPHABET.to_string(),
            enable_progress: true,
        }
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    fn merge_capacity_hint(&self) -> usize {
        self.merge_capacity_hint
    }

    fn tag_length(&self) -> usize {
        self.tag_length
    }

    fn tag_alphabet(&self) -> String {
        self.tag_alphabet.clone()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
