// フィルタ機能
// ワーカーが適用するレコード選別述語

pub mod implementations;

// 公開API
pub use implementations::DigitTagFilter;
