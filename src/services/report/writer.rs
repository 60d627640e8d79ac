// Writer - マージ結果を表形式のテキストレポートに整形

use crate::core::{PipelineError, PipelineResult, Record};
use std::path::Path;

const HEADER: [&str; 4] = ["ID", "Salary", "Name", "Hash"];

/// タブ区切りセルを空白で揃える表形式レポート
///
/// 各列の幅は最長セル + `padding`。最終列は揃えずそのまま出力する。
#[derive(Debug, Clone)]
pub struct TabularReportWriter {
    padding: usize,
}

impl Default for TabularReportWriter {
    fn default() -> Self {
        Self { padding: 2 }
    }
}

impl TabularReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    fn rows(records: &[Record]) -> Vec<[String; 4]> {
        let header = HEADER.map(str::to_string);
        std::iter::once(header)
            .chain(records.iter().map(|record| {
                [
                    record.id.to_string(),
                    format!("{:.2}", record.amount),
                    record.name.clone(),
                    record.tag.clone(),
                ]
            }))
            .collect()
    }

    /// レコード列を表形式の文字列に整形
    pub fn render(&self, records: &[Record]) -> String {
        let rows = Self::rows(records);

        let mut widths = [0usize; 3];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        for row in &rows {
            for (cell, width) in row.iter().zip(widths.iter()) {
                output.push_str(cell);
                let fill = width + self.padding - cell.chars().count();
                output.extend(std::iter::repeat(' ').take(fill));
            }
            output.push_str(&row[3]);
            output.push('\n');
        }
        output
    }

    /// レポートをファイルへ書き出す
    pub async fn write_to(&self, path: &Path, records: &[Record]) -> PipelineResult<()> {
        tokio::fs::write(path, self.render(records))
            .await
            .map_err(|e| PipelineError::report(path.display().to_string(), e))
    }
}
