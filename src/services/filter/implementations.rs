// フィルタの具象実装

use crate::core::{Record, RecordFilter};

/// タグの先頭が10進数字のレコードを除外するフィルタ
#[derive(Debug, Default, Clone, Copy)]
pub struct DigitTagFilter;

impl RecordFilter for DigitTagFilter {
    fn accepts(&self, record: &Record) -> bool {
        !record.tag_starts_with_digit()
    }
}
