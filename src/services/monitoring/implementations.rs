// 進捗監視の具象実装

use crate::core::{PipelineSummary, ProgressReporter};
use async_trait::async_trait;
use std::path::Path;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, total_records: usize) {
        if !self.quiet {
            println!("🚀 Starting pipeline with {total_records} records...");
        }
    }

    async fn report_skipped_line(&self, line_number: usize, reason: &str) {
        if !self.quiet {
            eprintln!("⚠️  Skipped line {line_number}: {reason}");
        }
    }

    async fn report_completed(&self, summary: &PipelineSummary) {
        if !self.quiet {
            println!(
                "✅ Completed! Survivors: {}, Dropped: {}, Skipped lines: {} ({} ms)",
                summary.survivors,
                summary.dropped,
                summary.skipped_lines,
                summary.total_processing_time_ms
            );
        }
    }

    async fn report_written(&self, path: &Path) {
        if !self.quiet {
            println!("📄 Record details have been written to {}", path.display());
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _total_records: usize) {}

    async fn report_skipped_line(&self, _line_number: usize, _reason: &str) {}

    async fn report_completed(&self, _summary: &PipelineSummary) {}

    async fn report_written(&self, _path: &Path) {}
}
