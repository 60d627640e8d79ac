// 入力機能
// テキストファイルの解析とタグ付与

pub mod reader;
pub mod tags;

// 公開API
pub use reader::{parse_line, ReadOutcome, RecordReader};
pub use tags::RandomTagGenerator;
