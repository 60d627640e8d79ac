// Reader - 行指向テキストからレコードを読み込む
// 各行は `id,amount,name` の3フィールド。不正な行はスキップして継続する

use crate::core::{
    LineParseError, PipelineError, PipelineResult, Record, SkippedLine, TagGenerator,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// 読み込み結果
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedLine>,
}

/// 1行を `(id, amount, name)` に解析
///
/// 数値フィールドの前後の空白は許容し、名前はそのまま使う
pub fn parse_line(line: &str) -> Result<(i64, f64, String), LineParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 3 {
        return Err(LineParseError::FieldCount {
            found: fields.len(),
        });
    }

    let id = fields[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| LineParseError::InvalidId {
            value: fields[0].to_string(),
        })?;
    let amount = fields[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| LineParseError::InvalidAmount {
            value: fields[1].to_string(),
        })?;

    Ok((id, amount, fields[2].to_string()))
}

/// レコード読み込み器。タグは注入された生成器で付与する
pub struct RecordReader<G: ?Sized> {
    tag_generator: Arc<G>,
}

impl<G> RecordReader<G>
where
    G: TagGenerator + ?Sized,
{
    pub fn new(tag_generator: Arc<G>) -> Self {
        Self { tag_generator }
    }

    /// ファイルから読み込む。ファイルを開けない場合は致命的エラー
    ///
    /// 行ごとにUTF-8として解釈するため、不正なバイト列を含む行だけがスキップされる
    pub async fn read_path(&self, path: &Path) -> PipelineResult<ReadOutcome> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::input(path.display().to_string(), e))?;
        Ok(self.read_bytes(&content))
    }

    /// テキスト全体を解析
    pub fn read_str(&self, content: &str) -> ReadOutcome {
        self.read_bytes(content.as_bytes())
    }

    /// バイト列を行単位で解析
    pub fn read_bytes(&self, content: &[u8]) -> ReadOutcome {
        let mut outcome = ReadOutcome::default();

        for (index, raw_line) in content.split(|b| *b == b'\n').enumerate() {
            let line_number = index + 1;
            let raw_line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);

            let parsed = std::str::from_utf8(raw_line)
                .map_err(|e| LineParseError::InvalidEncoding {
                    valid_up_to: e.valid_up_to(),
                })
                .and_then(|line| {
                    if line.trim().is_empty() {
                        Ok(None)
                    } else {
                        parse_line(line).map(Some)
                    }
                });

            match parsed {
                Ok(None) => debug!(line_number, "skipping blank line"),
                Ok(Some((id, amount, name))) => {
                    let tag = self.tag_generator.generate();
                    outcome.records.push(Record::new(id, amount, name, tag));
                }
                Err(error) => {
                    warn!(line_number, %error, "skipping malformed line");
                    outcome.skipped.push(SkippedLine {
                        line_number,
                        reason: error.to_string(),
                    });
                }
            }
        }

        outcome
    }
}
